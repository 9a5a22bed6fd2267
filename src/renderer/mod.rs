//! Render consumption surface
//!
//! The core builds a read-only [`Frame`] after every update and hands it to
//! the host's [`Render`] implementation. Drawing technology is the host's
//! business.

use crate::sim::{Arena, Avatar, GamePhase, GameState, Hostile, Particle, Projectile, WaveState};

/// Borrowed snapshot of everything drawable
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub arena: &'a Arena,
    pub phase: GamePhase,
    pub avatar: &'a Avatar,
    pub hostiles: &'a [Hostile],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    pub waves: &'a WaveState,
    pub score: u64,
    pub time_ms: f64,
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            arena: &state.arena,
            phase: state.phase,
            avatar: &state.avatar,
            hostiles: &state.hostiles,
            projectiles: &state.projectiles,
            particles: &state.particles,
            waves: &state.waves,
            score: state.score,
            time_ms: state.time_ms,
        }
    }

    /// Avatar health as a 0-1 fraction (health bar)
    pub fn health_fraction(&self) -> f32 {
        if self.avatar.max_health <= 0.0 {
            0.0
        } else {
            self.avatar.health / self.avatar.max_health
        }
    }
}

/// Host drawing hook, called once per update
pub trait Render {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Render for NullRenderer {
    fn render(&mut self, _frame: &Frame<'_>) {}
}

/// Counts frames and logs a one-line summary now and then
#[derive(Debug, Default, Clone)]
pub struct LogRenderer {
    pub frames: u64,
    /// Log every N frames (0 = never)
    pub every: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self { frames: 0, every }
    }
}

impl Render for LogRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;
        if self.every > 0 && self.frames % self.every == 0 {
            log::info!(
                "t={:.1}s wave {}/{} hp {:.0}% hostiles {} shots {} score {}",
                frame.time_ms / 1000.0,
                frame.waves.current_wave,
                frame.waves.total_waves,
                frame.health_fraction() * 100.0,
                frame.hostiles.len(),
                frame.projectiles.len(),
                frame.score,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{CharacterProfile, LevelConfig, StatProfile};

    #[test]
    fn test_frame_reflects_state() {
        let mut state = GameState::new(
            1,
            &Settings::default(),
            LevelConfig::default(),
            StatProfile::base(&CharacterProfile::default()),
        );
        state.avatar.health = 25.0;
        state.spawn_hostile();
        let frame = Frame::capture(&state);
        assert_eq!(frame.hostiles.len(), 1);
        assert_eq!(frame.health_fraction(), 0.25);
        assert_eq!(frame.waves.current_wave, 1);

        let mut renderer = LogRenderer::new(0);
        renderer.render(&frame);
        assert_eq!(renderer.frames, 1);
    }
}
