//! Static configuration: characters, levels and the ability table
//!
//! The builtin tables are the shipped roster. Hosts may replace them with
//! JSON of the same shape.

use serde::{Deserialize, Serialize};

use super::stats::{AbilityModifier, Capability, ModifierEffect};
use crate::error::ConfigError;

/// Immutable base stats of a playable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: String,
    pub name: String,
    /// Horizontal speed (units/tick)
    pub speed: f32,
    /// Jump impulse (units/tick)
    pub jump_power: f32,
    pub damage: f32,
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self {
            id: "nova-prime".to_string(),
            name: "Nova Prime".to_string(),
            speed: 3.5,
            jump_power: 15.0,
            damage: 10.0,
        }
    }
}

/// Difficulty level parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    /// Multiplier on hostile base speed
    pub enemy_speed: f32,
    /// Minimum time between spawns (ms)
    pub enemy_spawn_interval: f32,
    /// Live hostile cap
    pub max_enemies: usize,
    pub enemy_damage_multiplier: f32,
    pub enemy_health_multiplier: f32,
    pub waves: u32,
    pub enemies_per_wave: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            id: 0,
            name: "Default".to_string(),
            enemy_speed: 1.0,
            enemy_spawn_interval: 2000.0,
            max_enemies: 5,
            enemy_damage_multiplier: 1.0,
            enemy_health_multiplier: 1.0,
            waves: 3,
            enemies_per_wave: 10,
        }
    }
}

/// All static game data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub characters: Vec<CharacterProfile>,
    pub levels: Vec<LevelConfig>,
    /// Canonical application order for stat composition
    pub abilities: Vec<AbilityModifier>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        if catalog.characters.is_empty() {
            return Err(ConfigError::Invalid {
                field: "characters",
                reason: "catalog needs at least one character".to_string(),
            });
        }
        Ok(catalog)
    }

    pub fn character(&self, id: &str) -> Option<&CharacterProfile> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Character by id, or the default identity when unknown
    pub fn character_or_default(&self, id: Option<&str>) -> CharacterProfile {
        match id.and_then(|id| self.character(id)) {
            Some(c) => c.clone(),
            None => {
                log::warn!("Character {:?} not found, using default", id);
                CharacterProfile::default()
            }
        }
    }

    pub fn level(&self, id: u32) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Level by id, or default pacing when unknown
    pub fn level_or_default(&self, id: Option<u32>) -> LevelConfig {
        match id.and_then(|id| self.level(id)) {
            Some(l) => l.clone(),
            None => {
                log::warn!("Level {:?} not found, using default", id);
                LevelConfig::default()
            }
        }
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityModifier> {
        self.abilities.iter().find(|a| a.id == id)
    }

    /// Ids of the zero-cost starter abilities
    pub fn basic_ability_ids(&self) -> impl Iterator<Item = &str> {
        self.abilities
            .iter()
            .filter(|a| a.cost == 0)
            .map(|a| a.id.as_str())
    }

    /// The shipped roster
    pub fn builtin() -> Self {
        Self {
            characters: builtin_characters(),
            levels: builtin_levels(),
            abilities: builtin_abilities(),
        }
    }
}

fn character(id: &str, name: &str, speed: f32, jump_power: f32, damage: f32) -> CharacterProfile {
    CharacterProfile {
        id: id.to_string(),
        name: name.to_string(),
        speed,
        jump_power,
        damage,
    }
}

fn builtin_characters() -> Vec<CharacterProfile> {
    vec![
        character("nova-prime", "Nova Prime", 3.5, 15.0, 10.0),
        character("shadow-blade", "Shadow Blade", 5.0, 16.0, 15.0),
        character("titan-core", "Titan Core", 2.0, 12.0, 20.0),
        character("cyber-phoenix", "Cyber Phoenix", 4.0, 18.0, 12.0),
        character("quantum-knight", "Quantum Knight", 3.5, 14.0, 14.0),
        character("neon-striker", "Neon Striker", 5.5, 15.0, 11.0),
        character("steel-guardian", "Steel Guardian", 3.0, 13.0, 18.0),
        character("plasma-hunter", "Plasma Hunter", 4.0, 17.0, 13.0),
        character("omega-sentinel", "Omega Sentinel", 3.5, 15.0, 16.0),
        character("volt-reaper", "Volt Reaper", 5.0, 16.0, 14.0),
    ]
}

#[allow(clippy::too_many_arguments)]
fn level(
    id: u32,
    name: &str,
    enemy_speed: f32,
    enemy_spawn_interval: f32,
    max_enemies: usize,
    enemy_damage_multiplier: f32,
    enemy_health_multiplier: f32,
    waves: u32,
    enemies_per_wave: u32,
) -> LevelConfig {
    LevelConfig {
        id,
        name: name.to_string(),
        enemy_speed,
        enemy_spawn_interval,
        max_enemies,
        enemy_damage_multiplier,
        enemy_health_multiplier,
        waves,
        enemies_per_wave,
    }
}

fn builtin_levels() -> Vec<LevelConfig> {
    vec![
        level(1, "Beginner", 0.5, 3000.0, 3, 0.7, 0.8, 3, 10),
        level(2, "Easy", 0.7, 2500.0, 4, 0.85, 0.9, 4, 12),
        level(3, "Normal", 1.0, 2000.0, 5, 1.0, 1.0, 5, 15),
        level(4, "Hard", 1.3, 1500.0, 6, 1.2, 1.2, 6, 18),
        level(5, "Very Hard", 1.5, 1200.0, 7, 1.4, 1.4, 7, 20),
        level(6, "Extreme", 1.8, 1000.0, 8, 1.6, 1.6, 8, 25),
        level(7, "Nightmare", 2.2, 800.0, 10, 2.0, 2.0, 10, 30),
    ]
}

fn ability(id: &str, target: &str, cost: u32, effect: ModifierEffect) -> AbilityModifier {
    AbilityModifier {
        id: id.to_string(),
        target_character: target.to_string(),
        cost,
        effect,
    }
}

fn builtin_abilities() -> Vec<AbilityModifier> {
    use Capability::*;

    let none = ModifierEffect::default;
    let speed = |m: f32| ModifierEffect {
        speed_mult: m,
        ..ModifierEffect::default()
    };
    let damage = |m: f32| ModifierEffect {
        damage_mult: m,
        ..ModifierEffect::default()
    };
    let flag = |c: Capability| ModifierEffect::default().with_capability(c);

    vec![
        ability("basic-nova", "nova-prime", 0, none()),
        ability("speed-boost-nova", "nova-prime", 50, speed(1.5)),
        ability(
            "super-jump-nova",
            "nova-prime",
            75,
            ModifierEffect {
                jump_mult: 1.4,
                ..ModifierEffect::default()
            },
        ),
        ability("basic-shadow", "shadow-blade", 0, none()),
        ability("blade-fury", "shadow-blade", 100, damage(2.0)),
        ability("shadow-dash", "shadow-blade", 80, speed(1.8)),
        ability("basic-titan", "titan-core", 0, none()),
        ability(
            "titan-shield",
            "titan-core",
            120,
            ModifierEffect {
                damage_reduction: Some(0.5),
                ..ModifierEffect::default()
            },
        ),
        ability("ground-slam", "titan-core", 100, flag(GroundSlam)),
        ability("basic-phoenix", "cyber-phoenix", 0, none()),
        ability("phoenix-fire", "cyber-phoenix", 90, flag(PhoenixFire)),
        ability(
            "air-dash",
            "cyber-phoenix",
            110,
            ModifierEffect {
                max_jumps: Some(4),
                ..ModifierEffect::default()
            },
        ),
        ability("basic-quantum", "quantum-knight", 0, none()),
        ability("quantum-phase", "quantum-knight", 150, flag(QuantumPhase)),
        ability(
            "energy-wave",
            "quantum-knight",
            130,
            damage(1.3).with_capability(EnergyWave),
        ),
        ability("basic-neon", "neon-striker", 0, none()),
        ability("neon-speed", "neon-striker", 70, speed(1.7)),
        ability("light-trail", "neon-striker", 85, flag(LightTrail)),
        ability("basic-steel", "steel-guardian", 0, none()),
        ability(
            "steel-armor",
            "steel-guardian",
            140,
            ModifierEffect {
                damage_reduction: Some(0.6),
                ..ModifierEffect::default()
            },
        ),
        ability(
            "counter-strike",
            "steel-guardian",
            110,
            ModifierEffect {
                damage_reflection: Some(0.3),
                ..ModifierEffect::default()
            },
        ),
        ability("basic-plasma", "plasma-hunter", 0, none()),
        ability("plasma-beam", "plasma-hunter", 95, flag(PlasmaBeam)),
        ability("hunter-mark", "plasma-hunter", 105, damage(1.4)),
        ability("basic-omega", "omega-sentinel", 0, none()),
        ability(
            "omega-protocol",
            "omega-sentinel",
            200,
            ModifierEffect {
                speed_mult: 1.3,
                jump_mult: 1.3,
                damage_mult: 1.3,
                ..ModifierEffect::default()
            },
        ),
        // Accuracy upgrade: projectiles already fly straight, so no stat change
        ability("target-lock", "omega-sentinel", 120, none()),
        ability("basic-volt", "volt-reaper", 0, none()),
        ability(
            "volt-surge",
            "volt-reaper",
            115,
            damage(1.5).with_capability(VoltSurge),
        ),
        ability("chain-lightning", "volt-reaper", 135, flag(ChainLightning)),
    ]
}
