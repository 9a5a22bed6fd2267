//! Run lifecycle
//!
//! A [`Session`] owns the clock, the run state and the collaborators around
//! it (input, telemetry, outcome callback, renderer). The host drives it by
//! calling [`Session::frame`] from its frame callback.

use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::platform::{HostInput, InputMapper};
use crate::renderer::{Frame, Render};
use crate::settings::Settings;
use crate::sim::{Catalog, GameState, RunOutcome, TelemetrySink, UnlockedSet, compose, tick};

/// Character, level and abilities selected for the next run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    /// None or unknown falls back to the default character
    pub character_id: Option<String>,
    /// None or unknown falls back to default pacing
    pub level_id: Option<u32>,
    pub unlocked: UnlockedSet,
}

/// What one host callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Clock not running
    Stopped,
    /// Less than a frame has passed
    Waiting,
    /// One update and render ran
    Ticked,
    /// This update ended the run
    Ended(RunOutcome),
}

pub type OutcomeCallback = Box<dyn FnMut(RunOutcome)>;

pub struct Session<T: TelemetrySink> {
    settings: Settings,
    catalog: Catalog,
    loadout: Loadout,
    clock: SimulationClock,
    state: Option<GameState>,
    input: InputMapper,
    telemetry: T,
    on_outcome: Option<OutcomeCallback>,
    runs: u32,
}

impl<T: TelemetrySink> Session<T> {
    pub fn new(settings: Settings, catalog: Catalog, loadout: Loadout, telemetry: T) -> Self {
        Self {
            clock: SimulationClock::new(settings.target_fps),
            settings,
            catalog,
            loadout,
            state: None,
            input: InputMapper::default(),
            telemetry,
            on_outcome: None,
            runs: 0,
        }
    }

    /// Called once per run with the final result
    pub fn with_outcome_callback(mut self, callback: impl FnMut(RunOutcome) + 'static) -> Self {
        self.on_outcome = Some(Box::new(callback));
        self
    }

    /// Start a fresh run at host time `now_ms`.
    ///
    /// All run-scoped state (waves, stats, entities, avatar, pending effects,
    /// input) is rebuilt from the loadout.
    pub fn start(&mut self, now_ms: f64) {
        let character = self
            .catalog
            .character_or_default(self.loadout.character_id.as_deref());
        let level = self.catalog.level_or_default(self.loadout.level_id);
        let profile = compose(&character, &self.loadout.unlocked, &self.catalog);
        let seed = self.settings.seed.unwrap_or_else(rand::random);

        log::info!(
            "Run {} started: {} on level '{}' ({} waves), seed {seed}",
            self.runs + 1,
            character.name,
            level.name,
            level.waves,
        );
        log::debug!("Stat profile: {:?}", profile);

        self.state = Some(GameState::new(seed, &self.settings, level, profile));
        self.input.reset();
        self.clock.start(now_ms);
        self.runs += 1;
    }

    /// Stop processing frames. Pending delayed effects never fire.
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn handle_input(&mut self, event: &HostInput) {
        self.input.handle(event);
    }

    pub fn input_mut(&mut self) -> &mut InputMapper {
        &mut self.input
    }

    /// Loadout for the next `start`
    pub fn set_loadout(&mut self, loadout: Loadout) {
        self.loadout = loadout;
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    /// Replace the unlocked set. A live avatar gets a freshly composed profile.
    pub fn set_unlocked(&mut self, unlocked: UnlockedSet) {
        self.loadout.unlocked = unlocked;
        if let Some(state) = self.state.as_mut().filter(|s| s.is_running()) {
            let character = self
                .catalog
                .character_or_default(self.loadout.character_id.as_deref());
            let profile = compose(&character, &self.loadout.unlocked, &self.catalog);
            state.avatar.apply_profile(profile);
        }
    }

    /// Host frame callback
    pub fn frame(&mut self, now_ms: f64, renderer: &mut impl Render) -> FrameStatus {
        let Some(elapsed) = self.clock.advance(now_ms) else {
            return if self.clock.is_running() {
                FrameStatus::Waiting
            } else {
                FrameStatus::Stopped
            };
        };
        let Some(state) = self.state.as_mut() else {
            self.clock.pause();
            return FrameStatus::Stopped;
        };

        let input = self.input.take();
        tick(state, &input, elapsed as f32);
        self.telemetry.record(&state.stats.counters(state.score));
        renderer.render(&Frame::capture(state));

        match state.outcome() {
            Some(outcome) => {
                self.clock.pause();
                log::info!(
                    "Run ended: {} with score {}",
                    if outcome.victory { "victory" } else { "defeat" },
                    outcome.score
                );
                if let Some(callback) = self.on_outcome.as_mut() {
                    callback(outcome);
                }
                FrameStatus::Ended(outcome)
            }
            None => FrameStatus::Ticked,
        }
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }
}
