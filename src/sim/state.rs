//! Simulation context
//!
//! Everything run-scoped lives in [`GameState`] and is passed by reference
//! into each component; there is no ambient global state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ability::EventQueue;
use super::catalog::LevelConfig;
use super::entity::{Avatar, Hostile, HostileKind, Particle, ParticleKind, Projectile};
use super::stats::StatProfile;
use super::telemetry::RunStats;
use super::wave::WaveState;
use crate::consts::*;
use crate::settings::Settings;

const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Final wave cleared
    Victory,
    /// Avatar health reached zero
    Defeat,
}

/// Final result handed to the outcome callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub victory: bool,
    pub score: u64,
}

/// Play area geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// y of the ground line
    pub ground_y: f32,
}

impl Arena {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.arena_width,
            height: settings.arena_height,
            ground_y: settings.arena_height - settings.ground_margin,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            ground_y: ARENA_HEIGHT - GROUND_MARGIN,
        }
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay draws (hostile kinds)
    pub rng: Pcg32,
    /// Cosmetic draws only, so particle settings never shift `rng`
    pub fx_rng: Pcg32,
    pub phase: GamePhase,
    pub arena: Arena,
    pub gravity: f32,
    pub level: LevelConfig,
    pub avatar: Avatar,
    /// Live hostiles in spawn order
    pub hostiles: Vec<Hostile>,
    pub projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    pub waves: WaveState,
    pub stats: RunStats,
    pub score: u64,
    /// Simulated time since run start (ms)
    pub time_ms: f64,
    /// Delayed effects keyed by simulated time
    pub scheduled: EventQueue,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, settings: &Settings, level: LevelConfig, profile: StatProfile) -> Self {
        let arena = Arena::from_settings(settings);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            phase: GamePhase::Playing,
            arena,
            gravity: settings.gravity,
            waves: WaveState::new(&level),
            level,
            avatar: Avatar::new(profile, arena.ground_y),
            hostiles: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            max_particles: settings.max_particles(),
            stats: RunStats::default(),
            score: 0,
            time_ms: 0.0,
            scheduled: EventQueue::default(),
            next_id: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// `Some` once the run has ended
    pub fn outcome(&self) -> Option<RunOutcome> {
        match self.phase {
            GamePhase::Playing => None,
            GamePhase::Victory => Some(RunOutcome {
                victory: true,
                score: self.score,
            }),
            GamePhase::Defeat => Some(RunOutcome {
                victory: false,
                score: self.score,
            }),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a hostile of a random kind just past the right edge
    pub fn spawn_hostile(&mut self) {
        let kind = HostileKind::ALL[self.rng.random_range(0..HostileKind::ALL.len())];
        self.spawn_hostile_kind(kind);
    }

    pub fn spawn_hostile_kind(&mut self, kind: HostileKind) {
        let id = self.next_entity_id();
        let pos = Vec2::new(
            self.arena.width + HOSTILE_SPAWN_OFFSET,
            self.arena.ground_y - HOSTILE_HEIGHT,
        );
        let hostile = Hostile::spawn(
            id,
            kind,
            pos,
            self.level.enemy_speed,
            self.level.enemy_health_multiplier,
            self.level.enemy_damage_multiplier,
        );
        log::debug!("Spawned {:?} hostile #{id}", kind);
        self.hostiles.push(hostile);
    }

    /// Fire a projectile of `damage` from `pos` (rightward)
    pub fn spawn_projectile(&mut self, pos: Vec2, damage: f32) {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::new(id, pos, 1.0, damage));
    }

    /// Emit `count` particles around `origin`, `jitter` spreading the origin
    pub fn burst(&mut self, origin: Vec2, kind: ParticleKind, count: usize, jitter: f32) {
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                return;
            }
            let offset = if jitter > 0.0 {
                Vec2::new(
                    self.fx_rng.random_range(-jitter..jitter),
                    self.fx_rng.random_range(-jitter..jitter),
                )
            } else {
                Vec2::ZERO
            };
            let (angle, speed, hue) = match kind {
                ParticleKind::Explosion => (
                    self.fx_rng.random_range(0.0..360.0),
                    self.fx_rng.random_range(2.0..8.0),
                    self.fx_rng.random_range(0.0..60.0),
                ),
                ParticleKind::Fire => (
                    self.fx_rng.random_range(200.0..340.0),
                    self.fx_rng.random_range(1.0..4.0),
                    self.fx_rng.random_range(0.0..40.0),
                ),
                ParticleKind::Lightning => (
                    self.fx_rng.random_range(0.0..360.0),
                    self.fx_rng.random_range(4.0..10.0),
                    self.fx_rng.random_range(180.0..220.0),
                ),
                ParticleKind::WaveBanner => (
                    self.fx_rng.random_range(0.0..360.0),
                    self.fx_rng.random_range(1.0..6.0),
                    180.0,
                ),
            };
            let size = self.fx_rng.random_range(2.0..6.0);
            self.particles
                .push(Particle::new(origin + offset, angle, speed, kind, hue, size));
        }
    }

    pub fn explosion(&mut self, origin: Vec2) {
        self.burst(origin, ParticleKind::Explosion, 20, 0.0);
    }

    pub fn fire_burst(&mut self, origin: Vec2) {
        self.burst(origin, ParticleKind::Fire, 10, 0.0);
    }

    pub fn lightning_burst(&mut self, origin: Vec2) {
        self.burst(origin, ParticleKind::Lightning, 15, 0.0);
    }

    pub fn wave_banner(&mut self) {
        let center = self.arena.center();
        self.burst(center, ParticleKind::WaveBanner, 50, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::CharacterProfile;

    fn state() -> GameState {
        GameState::new(
            7,
            &Settings::default(),
            LevelConfig::default(),
            StatProfile::base(&CharacterProfile::default()),
        )
    }

    #[test]
    fn test_new_run_layout() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.arena.ground_y, ARENA_HEIGHT - GROUND_MARGIN);
        assert_eq!(state.avatar.pos, Vec2::new(AVATAR_START_X, state.arena.ground_y - AVATAR_HEIGHT));
        assert_eq!(state.avatar.health, AVATAR_MAX_HEALTH);
        assert_eq!(state.waves.current_wave, 1);
        assert!(state.outcome().is_none());
    }

    #[test]
    fn test_spawned_hostile_rests_on_ground() {
        let mut state = state();
        state.spawn_hostile();
        let h = &state.hostiles[0];
        assert_eq!(h.pos.x, ARENA_WIDTH + HOSTILE_SPAWN_OFFSET);
        assert_eq!(h.pos.y + h.size.y, state.arena.ground_y);
    }

    #[test]
    fn test_same_seed_same_kinds() {
        let mut a = state();
        let mut b = state();
        for _ in 0..20 {
            a.spawn_hostile();
            b.spawn_hostile();
        }
        let kinds_a: Vec<_> = a.hostiles.iter().map(|h| h.kind).collect();
        let kinds_b: Vec<_> = b.hostiles.iter().map(|h| h.kind).collect();
        assert_eq!(kinds_a, kinds_b);
    }

    #[test]
    fn test_particle_cap() {
        let mut state = state();
        state.max_particles = 30;
        state.explosion(Vec2::ZERO);
        state.explosion(Vec2::ZERO);
        assert_eq!(state.particles.len(), 30);

        state.max_particles = 0;
        state.particles.clear();
        state.wave_banner();
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particles_leave_gameplay_rng_alone() {
        let mut state = state();
        let before = state.rng.clone();
        state.explosion(Vec2::ZERO);
        state.wave_banner();
        assert!(!state.particles.is_empty());
        assert_eq!(state.rng, before);
    }
}
