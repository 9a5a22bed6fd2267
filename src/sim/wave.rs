//! Wave scheduler
//!
//! `Spawning -> Cooldown -> Spawning -> ... -> Complete`. Completion is
//! evaluated at the start of each scheduler step, before spawning.

use serde::{Deserialize, Serialize};

use super::catalog::LevelConfig;
use crate::consts::WAVE_COOLDOWN_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    Spawning,
    /// Rest between waves; nothing spawns
    Cooldown,
    /// Final wave cleared (terminal)
    Complete,
}

/// Notable scheduler transitions reported by [`WaveState::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTransition {
    /// A wave was cleared and the cooldown for `next_wave` started
    Cleared { next_wave: u32 },
    /// Cooldown ran out, spawning resumed
    Resumed,
    /// The final wave was cleared
    Complete,
}

/// Result of one scheduler step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveTick {
    /// Caller should spawn one hostile
    pub spawn: bool,
    pub transition: Option<WaveTransition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    /// 1-based
    pub current_wave: u32,
    pub total_waves: u32,
    pub enemies_per_wave: u32,
    pub spawned_in_wave: u32,
    pub killed_in_wave: u32,
    pub cooldown_remaining_ms: f32,
    pub spawn_timer_ms: f32,
    pub phase: WavePhase,
}

impl WaveState {
    pub fn new(level: &LevelConfig) -> Self {
        Self {
            current_wave: 1,
            total_waves: level.waves.max(1),
            enemies_per_wave: level.enemies_per_wave,
            spawned_in_wave: 0,
            killed_in_wave: 0,
            cooldown_remaining_ms: 0.0,
            spawn_timer_ms: 0.0,
            phase: WavePhase::Spawning,
        }
    }

    pub fn in_cooldown(&self) -> bool {
        self.phase == WavePhase::Cooldown
    }

    pub fn is_complete(&self) -> bool {
        self.phase == WavePhase::Complete
    }

    /// Advance the scheduler by `elapsed_ms` with `live` hostiles on the field
    pub fn update(&mut self, elapsed_ms: f32, live: usize, level: &LevelConfig) -> WaveTick {
        let mut out = WaveTick::default();

        match self.phase {
            WavePhase::Complete => return out,
            WavePhase::Cooldown => {
                self.cooldown_remaining_ms -= elapsed_ms;
                if self.cooldown_remaining_ms > 0.0 {
                    return out;
                }
                self.cooldown_remaining_ms = 0.0;
                self.phase = WavePhase::Spawning;
                out.transition = Some(WaveTransition::Resumed);
            }
            WavePhase::Spawning => {}
        }

        if self.killed_in_wave >= self.enemies_per_wave {
            if self.current_wave >= self.total_waves {
                self.phase = WavePhase::Complete;
                log::info!("Final wave {} cleared", self.current_wave);
                out.transition = Some(WaveTransition::Complete);
                return out;
            }
            self.current_wave += 1;
            self.spawned_in_wave = 0;
            self.killed_in_wave = 0;
            self.cooldown_remaining_ms = WAVE_COOLDOWN_MS;
            self.phase = WavePhase::Cooldown;
            log::info!("Wave cleared, wave {} of {} next", self.current_wave, self.total_waves);
            out.transition = Some(WaveTransition::Cleared {
                next_wave: self.current_wave,
            });
            return out;
        }

        if self.spawned_in_wave < self.enemies_per_wave {
            self.spawn_timer_ms += elapsed_ms;
            if self.spawn_timer_ms >= level.enemy_spawn_interval && live < level.max_enemies {
                self.spawn_timer_ms = 0.0;
                self.spawned_in_wave += 1;
                out.spawn = true;
            }
        }

        out
    }

    /// Count a kill toward the current wave
    pub fn record_kill(&mut self) {
        if self.killed_in_wave < self.enemies_per_wave {
            self.killed_in_wave += 1;
        }
    }

    /// Give back the spawn slot of a hostile that left without dying
    pub fn release_slot(&mut self) {
        self.spawned_in_wave = self.spawned_in_wave.saturating_sub(1);
    }
}
