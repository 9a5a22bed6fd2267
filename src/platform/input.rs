//! Host input mapping
//!
//! Keyboard and touch events only set or clear flags here; the next tick
//! reads them. Keyboard and touch feed the same command surface.

use std::collections::HashSet;

use crate::sim::TickInput;

/// In-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Held
    MoveLeft,
    MoveRight,

    // One-shot
    Jump,
    SuperJump,
    Attack,
    SpecialPower,
}

impl Action {
    pub fn is_held(self) -> bool {
        matches!(self, Action::MoveLeft | Action::MoveRight)
    }
}

/// On-screen touch controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
    SuperJump,
    Attack,
    Power,
}

/// Raw event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInput {
    /// Key name as the host reports it (`"a"`, `"ArrowLeft"`, `" "`, `"Shift"`)
    KeyDown(String),
    KeyUp(String),
    TouchStart(TouchButton),
    TouchEnd(TouchButton),
}

/// Where an action came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputSource {
    Key(String),
    Touch(TouchButton),
}

impl InputSource {
    /// Keyboard source; names are matched case-insensitively
    pub fn key(name: &str) -> Self {
        Self::Key(normalize_key(name))
    }

    pub fn touch(button: TouchButton) -> Self {
        Self::Touch(button)
    }
}

fn normalize_key(name: &str) -> String {
    match name {
        " " | "Space" | "space" | "Spacebar" => " ".to_string(),
        other => other.to_lowercase(),
    }
}

/// Default keyboard and touch bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        // Movement
        (InputSource::key("a"), Action::MoveLeft),
        (InputSource::key("ArrowLeft"), Action::MoveLeft),
        (InputSource::key("d"), Action::MoveRight),
        (InputSource::key("ArrowRight"), Action::MoveRight),
        // Actions
        (InputSource::key(" "), Action::Jump),
        (InputSource::key("Shift"), Action::SuperJump),
        (InputSource::key("x"), Action::Attack),
        (InputSource::key("c"), Action::SpecialPower),
        (InputSource::key("e"), Action::SpecialPower),
        // Touch
        (InputSource::touch(TouchButton::Left), Action::MoveLeft),
        (InputSource::touch(TouchButton::Right), Action::MoveRight),
        (InputSource::touch(TouchButton::Jump), Action::Jump),
        (InputSource::touch(TouchButton::SuperJump), Action::SuperJump),
        (InputSource::touch(TouchButton::Attack), Action::Attack),
        (InputSource::touch(TouchButton::Power), Action::SpecialPower),
    ]
}

/// Turns host events into per-tick commands
#[derive(Debug, Clone)]
pub struct InputMapper {
    bindings: Vec<(InputSource, Action)>,
    /// Sources currently held down that map to a held action
    held: HashSet<InputSource>,
    /// One-shot commands waiting for the next tick
    pending: TickInput,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(default_bindings())
    }
}

impl InputMapper {
    pub fn new(bindings: Vec<(InputSource, Action)>) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pending: TickInput::default(),
        }
    }

    fn action_for(&self, source: &InputSource) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, a)| *a)
    }

    pub fn handle(&mut self, event: &HostInput) {
        let (source, pressed) = match event {
            HostInput::KeyDown(k) => (InputSource::key(k), true),
            HostInput::KeyUp(k) => (InputSource::key(k), false),
            HostInput::TouchStart(b) => (InputSource::touch(*b), true),
            HostInput::TouchEnd(b) => (InputSource::touch(*b), false),
        };
        let Some(action) = self.action_for(&source) else {
            return;
        };

        if action.is_held() {
            if pressed {
                self.held.insert(source);
            } else {
                self.held.remove(&source);
            }
            return;
        }

        if pressed {
            match action {
                Action::Jump => self.pending.jump = true,
                Action::SuperJump => self.pending.super_jump = true,
                Action::Attack => self.pending.attack = true,
                Action::SpecialPower => self.pending.special = true,
                Action::MoveLeft | Action::MoveRight => {}
            }
        }
    }

    fn is_held(&self, action: Action) -> bool {
        self.held.iter().any(|s| self.action_for(s) == Some(action))
    }

    /// Commands for the upcoming tick
    pub fn peek(&self) -> TickInput {
        TickInput {
            move_left: self.is_held(Action::MoveLeft),
            move_right: self.is_held(Action::MoveRight),
            ..self.pending.clone()
        }
    }

    /// Commands for the upcoming tick; one-shots are cleared
    pub fn take(&mut self) -> TickInput {
        let input = self.peek();
        self.pending.clear_commands();
        input
    }

    /// Release everything (focus loss, run restart)
    pub fn reset(&mut self) {
        self.held.clear();
        self.pending = TickInput::default();
    }
}
