//! Player progression: XP wallet, ability unlocks and missions
//!
//! Sits outside the simulation. It learns about a run only through
//! telemetry counters and the run outcome.

use serde::{Deserialize, Serialize};

use crate::consts::SCORE_PER_XP;
use crate::error::ProgressError;
use crate::sim::{Catalog, Counters, RunOutcome, TelemetrySink, UnlockedSet};

/// XP and owned abilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub xp: u32,
    pub unlocked: UnlockedSet,
}

impl Progression {
    /// Fresh profile with every starter ability unlocked
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            xp: 0,
            unlocked: catalog.basic_ability_ids().map(str::to_string).collect(),
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Buy an ability. Returns the XP left afterwards.
    pub fn unlock(&mut self, id: &str, catalog: &Catalog) -> Result<u32, ProgressError> {
        let result = self.try_unlock(id, catalog);
        if let Err(e) = &result {
            log::warn!("Unlock rejected: {e}");
        }
        result
    }

    fn try_unlock(&mut self, id: &str, catalog: &Catalog) -> Result<u32, ProgressError> {
        let ability = catalog
            .ability(id)
            .ok_or_else(|| ProgressError::UnknownAbility(id.to_string()))?;
        if self.unlocked.contains(id) {
            return Err(ProgressError::AlreadyUnlocked(id.to_string()));
        }
        if ability.cost > self.xp {
            return Err(ProgressError::InsufficientXp {
                needed: ability.cost,
                available: self.xp,
            });
        }
        self.xp -= ability.cost;
        self.unlocked.insert(id.to_string());
        log::info!("Unlocked {id} for {} XP", ability.cost);
        Ok(self.xp)
    }

    /// Credit the XP a finished run earned
    pub fn award(&mut self, outcome: &RunOutcome) -> u32 {
        let earned = u32::try_from(outcome.score / SCORE_PER_XP).unwrap_or(u32::MAX);
        self.xp = self.xp.saturating_add(earned);
        earned
    }

    pub fn add_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(amount);
    }
}

/// Which counter a mission tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissionKind {
    Kills,
    Survive,
    Score,
    Jumps,
    SuperJumps,
    PowerUsage,
    NoDamageKills,
    NoDamageTime,
    ComboKills,
    SpeedKills,
}

impl MissionKind {
    pub fn value(self, counters: &Counters) -> u32 {
        match self {
            MissionKind::Kills => counters.kills,
            MissionKind::Survive => counters.survive_time,
            MissionKind::Score => u32::try_from(counters.score).unwrap_or(u32::MAX),
            MissionKind::Jumps => counters.jumps,
            MissionKind::SuperJumps => counters.super_jumps,
            MissionKind::PowerUsage => counters.power_usage,
            MissionKind::NoDamageKills => counters.no_damage_kills,
            MissionKind::NoDamageTime => counters.no_damage_time,
            MissionKind::ComboKills => counters.combo_kills,
            MissionKind::SpeedKills => counters.speed_kills,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: MissionKind,
    pub requirement: u32,
    /// XP granted on claim
    pub reward: u32,
    /// Best value seen so far
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub claimed: bool,
}

impl Mission {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.requirement
    }

    pub fn can_claim(&self) -> bool {
        self.is_complete() && !self.claimed
    }

    /// Progress as a 0-100 percentage
    pub fn percent(&self) -> u32 {
        if self.requirement == 0 {
            return 100;
        }
        ((self.progress as u64 * 100) / self.requirement as u64).min(100) as u32
    }
}

/// Mission list fed by run telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionBoard {
    pub missions: Vec<Mission>,
}

impl Default for MissionBoard {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MissionBoard {
    pub fn get(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// Grant a completed mission's reward into `progression`
    pub fn claim(&mut self, id: &str, progression: &mut Progression) -> Result<u32, ProgressError> {
        let result = self.try_claim(id, progression);
        if let Err(e) = &result {
            log::warn!("Claim rejected: {e}");
        }
        result
    }

    fn try_claim(&mut self, id: &str, progression: &mut Progression) -> Result<u32, ProgressError> {
        let mission = self
            .missions
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ProgressError::UnknownMission(id.to_string()))?;
        if mission.claimed {
            return Err(ProgressError::AlreadyClaimed(id.to_string()));
        }
        if !mission.is_complete() {
            return Err(ProgressError::MissionIncomplete {
                progress: mission.progress,
                requirement: mission.requirement,
            });
        }
        mission.claimed = true;
        progression.add_xp(mission.reward);
        log::info!("Mission {id} claimed for {} XP", mission.reward);
        Ok(mission.reward)
    }

    pub fn claimable(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter().filter(|m| m.can_claim())
    }

    pub fn builtin() -> Self {
        use MissionKind::*;

        let table: [(&str, &str, &str, MissionKind, u32, u32); 20] = [
            ("first-battle", "First Battle", "Defeat 5 enemies in one run", Kills, 5, 50),
            ("survivor", "Survivor", "Survive for 60 seconds", Survive, 60, 75),
            ("combo-master", "Combo Master", "Reach 500 points in one run", Score, 500, 100),
            ("jump-expert", "Jump Expert", "Jump 50 times in one run", Jumps, 50, 60),
            ("elite-warrior", "Elite Warrior", "Defeat 20 enemies in one run", Kills, 20, 150),
            ("endurance", "Endurance", "Survive for 120 seconds", Survive, 120, 120),
            ("high-scorer", "High Scorer", "Reach 1000 points in one run", Score, 1000, 200),
            ("sharpshooter", "Sharpshooter", "Defeat 10 enemies without taking damage", NoDamageKills, 10, 180),
            ("speedster", "Speedster", "Defeat 15 enemies within 60 seconds", SpeedKills, 15, 160),
            ("jump-master", "Jump Master", "Jump 100 times in one run", Jumps, 100, 90),
            ("untouchable", "Untouchable", "Survive 90 seconds without taking damage", NoDamageTime, 90, 250),
            ("destroyer", "Destroyer", "Defeat 50 enemies in one run", Kills, 50, 300),
            ("mega-scorer", "Mega Scorer", "Reach 2000 points in one run", Score, 2000, 350),
            ("marathon", "Marathon", "Survive for 180 seconds", Survive, 180, 200),
            ("power-user", "Power User", "Use special powers 20 times in one run", PowerUsage, 20, 140),
            ("combo-killer", "Combo Killer", "Defeat 5 enemies within 10 seconds", ComboKills, 5, 170),
            ("super-jumper", "Super Jumper", "Super jump 30 times in one run", SuperJumps, 30, 110),
            ("survivor-pro", "Survivor Pro", "Survive for 150 seconds", Survive, 150, 150),
            ("ultimate-warrior", "Ultimate Warrior", "Reach 3000 points in one run", Score, 3000, 500),
            ("legendary", "Legendary", "Defeat 100 enemies in one run", Kills, 100, 600),
        ];

        Self {
            missions: table
                .into_iter()
                .map(|(id, title, description, kind, requirement, reward)| Mission {
                    id: id.to_string(),
                    title: title.to_string(),
                    description: description.to_string(),
                    kind,
                    requirement,
                    reward,
                    progress: 0,
                    claimed: false,
                })
                .collect(),
        }
    }
}

impl TelemetrySink for MissionBoard {
    fn record(&mut self, counters: &Counters) {
        for mission in self.missions.iter_mut().filter(|m| !m.claimed) {
            mission.progress = mission.progress.max(mission.kind.value(counters));
        }
    }
}
