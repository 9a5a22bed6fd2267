//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives through `tick`'s elapsed argument
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod ability;
pub mod catalog;
pub mod collision;
pub mod entity;
pub mod state;
pub mod stats;
pub mod telemetry;
pub mod tick;
pub mod wave;

pub use ability::{Availability, EventQueue, ScheduledEffect};
pub use catalog::{Catalog, CharacterProfile, LevelConfig};
pub use collision::{ResolveReport, resolve};
pub use entity::{Aabb, Avatar, Hostile, HostileKind, Particle, ParticleKind, Projectile};
pub use state::{Arena, GamePhase, GameState, RunOutcome};
pub use stats::{AbilityModifier, Capability, CapabilitySet, ModifierEffect, StatProfile, UnlockedSet, compose};
pub use telemetry::{Counters, LastCounters, NullTelemetry, RunStats, TelemetrySink};
pub use tick::{TickInput, tick};
pub use wave::{WavePhase, WaveState, WaveTick, WaveTransition};
