//! Platform abstraction layer
//!
//! Handles host input events (keyboard, touch). Time arrives through
//! [`crate::SimulationClock`].

pub mod input;

pub use input::{Action, HostInput, InputMapper, InputSource, TouchButton, default_bindings};
