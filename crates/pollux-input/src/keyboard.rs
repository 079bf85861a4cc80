//! Keyboard state as seen by the game loop.
//!
//! Keys are identified by their physical key name (`"KeyW"`, `"Space"`,
//! `"ArrowUp"`), so WASD movement works identically regardless of layout.
//! Any string the host reports is accepted.

use crate::button::ButtonState;
use std::collections::HashSet;

/// Per-tick keyboard state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    keys: ButtonState<String>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys held as of the last tick.
    #[must_use]
    pub fn pressed(&self) -> &HashSet<String> {
        self.keys.pressed()
    }

    /// Keys that went down during the last tick.
    #[must_use]
    pub fn just_pressed(&self) -> &HashSet<String> {
        self.keys.just_pressed()
    }

    /// Keys that went up during the last tick.
    #[must_use]
    pub fn just_released(&self) -> &HashSet<String> {
        self.keys.just_released()
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, code: &str) -> bool {
        self.keys.is_pressed(code)
    }

    /// Returns `true` only during the tick the key transitioned to pressed.
    #[must_use]
    pub fn is_just_pressed(&self, code: &str) -> bool {
        self.keys.is_just_pressed(code)
    }

    /// Returns `true` only during the tick the key transitioned to released.
    #[must_use]
    pub fn is_just_released(&self, code: &str) -> bool {
        self.keys.is_just_released(code)
    }

    pub(crate) fn advance(&mut self, held: HashSet<String>) -> bool {
        self.keys.advance(held)
    }
}
