//! Cyber Arena - a side-on arena brawler simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, stats, waves, combat)
//! - `clock`: Fixed-cadence frame driver
//! - `session`: Run lifecycle wiring the clock, simulation and collaborators
//! - `renderer`: Read-only render snapshot consumed by the host
//! - `platform`: Keyboard/touch input mapping
//! - `progress`: XP, ability unlocks and missions fed by telemetry
//! - `settings`: Engine configuration

pub mod clock;
pub mod error;
pub mod platform;
pub mod progress;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use clock::SimulationClock;
pub use error::{ConfigError, ProgressError};
pub use session::{FrameStatus, Loadout, Session};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TARGET_FPS: u32 = 120;

    /// Arena defaults
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Ground sits this far above the bottom edge
    pub const GROUND_MARGIN: f32 = 100.0;
    /// Downward acceleration (units/tick²)
    pub const GRAVITY: f32 = 0.6;

    /// Avatar defaults
    pub const AVATAR_WIDTH: f32 = 60.0;
    pub const AVATAR_HEIGHT: f32 = 80.0;
    pub const AVATAR_START_X: f32 = 200.0;
    pub const AVATAR_MAX_HEALTH: f32 = 100.0;
    pub const BASE_MAX_JUMPS: u8 = 3;

    /// Action cooldowns (ms)
    pub const ATTACK_DELAY_MS: f32 = 300.0;
    pub const SUPER_JUMP_DELAY_MS: f32 = 3000.0;
    pub const SPECIAL_POWER_DELAY_MS: f32 = 5000.0;

    /// Hostile geometry
    pub const HOSTILE_WIDTH: f32 = 50.0;
    pub const HOSTILE_HEIGHT: f32 = 60.0;
    /// Hostiles enter this far past the right edge
    pub const HOSTILE_SPAWN_OFFSET: f32 = 50.0;
    /// Hostiles left of this x have escaped
    pub const HOSTILE_ESCAPE_X: f32 = -100.0;

    /// Projectile defaults
    pub const PROJECTILE_WIDTH: f32 = 15.0;
    pub const PROJECTILE_HEIGHT: f32 = 8.0;
    pub const PROJECTILE_SPEED: f32 = 12.0;

    /// Particle life lost per tick
    pub const PARTICLE_DECAY: f32 = 0.02;

    /// Wave pacing
    pub const WAVE_COOLDOWN_MS: f32 = 3000.0;

    /// Streak windows (ms)
    pub const COMBO_WINDOW_MS: f32 = 10_000.0;
    pub const SPEED_WINDOW_MS: f32 = 60_000.0;

    /// Score per kill
    pub const KILL_SCORE: u64 = 50;
    /// Score points per XP point awarded at run end
    pub const SCORE_PER_XP: u64 = 10;
}
