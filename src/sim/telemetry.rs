//! Run statistics and the telemetry seam
//!
//! `RunStats` is reset at run start and only grows during a run, apart from
//! the windowed streaks which expire. A snapshot of named counters is pushed
//! to a [`TelemetrySink`] after every tick; the sink decides what a counter
//! is worth.

use serde::{Deserialize, Serialize};

use crate::consts::{COMBO_WINDOW_MS, SPEED_WINDOW_MS};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub kills: u32,
    pub survive_time_ms: f64,
    pub jumps: u32,
    pub super_jumps: u32,
    pub power_usage: u32,
    pub no_damage_kills: u32,
    pub no_damage_time_ms: f64,
    pub combo_kills: u32,
    pub combo_timer_ms: f32,
    pub speed_kills: u32,
    pub speed_kill_timer_ms: f32,
    /// Avatar has taken contact damage at least once this run
    pub damaged: bool,
}

impl RunStats {
    /// Advance the time-based counters and expire streak windows
    pub fn advance(&mut self, elapsed_ms: f32) {
        self.survive_time_ms += elapsed_ms as f64;

        if self.combo_timer_ms > 0.0 {
            self.combo_timer_ms -= elapsed_ms;
            if self.combo_timer_ms <= 0.0 {
                self.combo_kills = 0;
            }
        }

        if self.speed_kill_timer_ms > 0.0 {
            self.speed_kill_timer_ms -= elapsed_ms;
        } else {
            self.speed_kills = 0;
        }

        if !self.damaged {
            self.no_damage_time_ms += elapsed_ms as f64;
        }
    }

    pub fn record_kill(&mut self) {
        self.kills += 1;
        self.no_damage_kills += 1;
        self.combo_kills += 1;
        self.combo_timer_ms = COMBO_WINDOW_MS;
        self.speed_kills += 1;
        if self.speed_kill_timer_ms <= 0.0 {
            self.speed_kill_timer_ms = SPEED_WINDOW_MS;
        }
    }

    /// Avatar touched a hostile: no-damage streaks end
    pub fn record_contact(&mut self) {
        self.damaged = true;
        self.no_damage_kills = 0;
        self.no_damage_time_ms = 0.0;
    }

    pub fn counters(&self, score: u64) -> Counters {
        Counters {
            kills: self.kills,
            survive_time: (self.survive_time_ms / 1000.0) as u32,
            jumps: self.jumps,
            super_jumps: self.super_jumps,
            power_usage: self.power_usage,
            no_damage_kills: self.no_damage_kills,
            no_damage_time: (self.no_damage_time_ms / 1000.0) as u32,
            combo_kills: self.combo_kills,
            speed_kills: self.speed_kills,
            score,
        }
    }
}

/// Named counters pushed to telemetry (times in whole seconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub kills: u32,
    pub survive_time: u32,
    pub jumps: u32,
    pub super_jumps: u32,
    pub power_usage: u32,
    pub no_damage_kills: u32,
    pub no_damage_time: u32,
    pub combo_kills: u32,
    pub speed_kills: u32,
    pub score: u64,
}

/// Receives progress counters once per tick
pub trait TelemetrySink {
    fn record(&mut self, counters: &Counters);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn record(&mut self, _counters: &Counters) {}
}

/// Keeps the last snapshot (useful for hosts that poll)
#[derive(Debug, Default, Clone)]
pub struct LastCounters(pub Option<Counters>);

impl TelemetrySink for LastCounters {
    fn record(&mut self, counters: &Counters) {
        self.0 = Some(*counters);
    }
}
