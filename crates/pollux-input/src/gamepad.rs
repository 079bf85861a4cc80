//! Pull-based gamepad state.
//!
//! Gamepad backends do not push events; instead the tracker polls a
//! [`GamepadSource`] once per tick. The snapshot's button indices follow the
//! standard gamepad layout and are resolved to names through the consumer's
//! [`ButtonMap`] at poll time, so a map edit takes effect on the next tick.

use crate::button::ButtonState;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::trace;

/// Number of physical buttons in the standard layout.
pub const BUTTON_COUNT: usize = 17;

/// Logical names of the standard layout, one per physical button index.
pub const DEFAULT_BUTTON_NAMES: [&str; BUTTON_COUNT] = [
    "A", "B", "X", "Y", "LB", "RB", "LT", "RT", "Start", "Menu", "LS", "RS", "Up", "Down",
    "Left", "Right", "Home",
];

/// Errors produced when editing a [`ButtonMap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ButtonMapError {
    /// Index past the last physical button.
    #[error("button index {index} out of range (layout has 17 buttons)")]
    IndexOutOfRange { index: usize },

    /// A replacement map did not have exactly [`BUTTON_COUNT`] names.
    #[error("button map needs 17 names, got {len}")]
    WrongLength { len: usize },
}

/// Ordered mapping from physical button index to logical button name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ButtonMap([String; BUTTON_COUNT]);

impl Default for ButtonMap {
    fn default() -> Self {
        Self(DEFAULT_BUTTON_NAMES.map(str::to_string))
    }
}

impl ButtonMap {
    /// Name for a physical button, if the index is in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Rename a single physical button.
    pub fn set(&mut self, index: usize, name: impl Into<String>) -> Result<(), ButtonMapError> {
        let slot = self
            .0
            .get_mut(index)
            .ok_or(ButtonMapError::IndexOutOfRange { index })?;
        *slot = name.into();
        Ok(())
    }

    /// First physical index mapped to `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    /// All names in physical order.
    #[must_use]
    pub fn names(&self) -> &[String; BUTTON_COUNT] {
        &self.0
    }
}

impl From<[String; BUTTON_COUNT]> for ButtonMap {
    fn from(names: [String; BUTTON_COUNT]) -> Self {
        Self(names)
    }
}

impl TryFrom<Vec<String>> for ButtonMap {
    type Error = ButtonMapError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        <[String; BUTTON_COUNT]>::try_from(names)
            .map(Self)
            .map_err(|names| ButtonMapError::WrongLength { len: names.len() })
    }
}

impl From<ButtonMap> for Vec<String> {
    fn from(map: ButtonMap) -> Self {
        map.0.into()
    }
}

/// Stick axes, each clamped to `[-1, 1]`.
///
/// Order is `[left_x, left_y, right_x, right_y]`; y is positive downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Axes([f32; 4]);

impl Axes {
    pub const LEFT_X: usize = 0;
    pub const LEFT_Y: usize = 1;
    pub const RIGHT_X: usize = 2;
    pub const RIGHT_Y: usize = 3;

    /// Build from raw values, clamping each to `[-1, 1]`. NaN reads as zero.
    #[must_use]
    pub fn new(raw: [f32; 4]) -> Self {
        Self(raw.map(|v| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }))
    }

    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0
    }

    #[must_use]
    pub fn left_stick(&self) -> Vec2 {
        Vec2::new(self.0[Self::LEFT_X], self.0[Self::LEFT_Y])
    }

    #[must_use]
    pub fn right_stick(&self) -> Vec2 {
        Vec2::new(self.0[Self::RIGHT_X], self.0[Self::RIGHT_Y])
    }

    /// Largest per-component change between two readings.
    fn max_difference(&self, other: &Self) -> f32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

/// One poll of a connected gamepad, in standard layout order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadSnapshot {
    /// Pressed flag per physical button index.
    pub buttons: Vec<bool>,
    /// Raw axis values; the first four are the two sticks.
    pub axes: Vec<f32>,
}

impl GamepadSnapshot {
    /// Snapshot with the given physical indices pressed and sticks centred.
    #[must_use]
    pub fn with_pressed(indices: &[usize]) -> Self {
        let mut buttons = vec![false; BUTTON_COUNT];
        for &index in indices {
            if let Some(slot) = buttons.get_mut(index) {
                *slot = true;
            }
        }
        Self {
            buttons,
            axes: vec![0.0; 4],
        }
    }
}

/// Pull-based source of gamepad snapshots.
pub trait GamepadSource {
    /// Current state of the active gamepad, or `None` if none is connected.
    fn poll(&mut self) -> Option<GamepadSnapshot>;
}

/// Source for hosts without gamepad support: always disconnected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGamepad;

impl GamepadSource for NoGamepad {
    fn poll(&mut self) -> Option<GamepadSnapshot> {
        None
    }
}

/// Gamepad source driven by the caller, for tests and replays.
///
/// Clones share the same slot, so one clone can be handed to the tracker
/// while another scripts what the next poll returns.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGamepad {
    slot: Rc<RefCell<Option<GamepadSnapshot>>>,
}

impl ScriptedGamepad {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what subsequent polls return.
    pub fn set(&self, snapshot: Option<GamepadSnapshot>) {
        *self.slot.borrow_mut() = snapshot;
    }

    /// Shorthand for `set(None)`.
    pub fn disconnect(&self) {
        self.set(None);
    }
}

impl GamepadSource for ScriptedGamepad {
    fn poll(&mut self) -> Option<GamepadSnapshot> {
        self.slot.borrow().clone()
    }
}

/// Apply deadzone filtering with rescaling.
///
/// If `|raw| < deadzone`, returns `0.0`.
/// Otherwise rescales from `[deadzone, 1.0]` to `[0.0, 1.0]`, preserving sign.
pub(crate) fn apply_deadzone(raw: f32, deadzone: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    let abs = raw.abs();
    if abs < deadzone {
        return 0.0;
    }
    let scale = 1.0 / (1.0 - deadzone);
    let rescaled = (abs - deadzone) * scale;
    rescaled.min(1.0).copysign(raw)
}

/// Per-tick gamepad state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    buttons: ButtonState<String>,
    button_map: ButtonMap,
    axes: Axes,
    connected: bool,
    just_connected: bool,
    just_disconnected: bool,
}

impl GamepadState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical buttons held as of the last tick.
    #[must_use]
    pub fn pressed(&self) -> &HashSet<String> {
        self.buttons.pressed()
    }

    /// Logical buttons that went down during the last tick.
    #[must_use]
    pub fn just_pressed(&self) -> &HashSet<String> {
        self.buttons.just_pressed()
    }

    /// Logical buttons that went up during the last tick.
    #[must_use]
    pub fn just_released(&self) -> &HashSet<String> {
        self.buttons.just_released()
    }

    #[must_use]
    pub fn is_pressed(&self, name: &str) -> bool {
        self.buttons.is_pressed(name)
    }

    #[must_use]
    pub fn is_just_pressed(&self, name: &str) -> bool {
        self.buttons.is_just_pressed(name)
    }

    #[must_use]
    pub fn axes(&self) -> Axes {
        self.axes
    }

    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// `true` only on the tick a gamepad appeared.
    #[must_use]
    pub fn just_connected(&self) -> bool {
        self.just_connected
    }

    /// `true` only on the tick the gamepad went away.
    #[must_use]
    pub fn just_disconnected(&self) -> bool {
        self.just_disconnected
    }

    #[must_use]
    pub fn button_map(&self) -> &ButtonMap {
        &self.button_map
    }

    /// Edit the button map in place. Applies from the next tick.
    pub fn button_map_mut(&mut self) -> &mut ButtonMap {
        &mut self.button_map
    }

    /// Replace the whole button map. Applies from the next tick.
    pub fn set_button_map(&mut self, map: ButtonMap) {
        self.button_map = map;
    }

    /// Fold one poll result into the state.
    ///
    /// Returns `true` when the pad showed activity: a newly pressed button or
    /// an axis moving further than `activity_threshold` since the last poll.
    pub(crate) fn apply_poll(
        &mut self,
        snapshot: Option<GamepadSnapshot>,
        deadzone: f32,
        activity_threshold: f32,
    ) -> bool {
        let was_connected = self.connected;
        let active = match snapshot {
            Some(snapshot) => {
                let held = self.resolve_buttons(&snapshot.buttons);
                let newly_pressed = self.buttons.advance(held);

                let mut raw = [0.0; 4];
                for (slot, value) in raw.iter_mut().zip(&snapshot.axes) {
                    *slot = apply_deadzone(*value, deadzone);
                }
                let axes = Axes::new(raw);
                let moved = axes.max_difference(&self.axes) > activity_threshold;
                self.axes = axes;
                self.connected = true;
                newly_pressed || moved
            }
            None => {
                self.buttons = ButtonState::new();
                self.axes = Axes::default();
                self.connected = false;
                false
            }
        };
        self.just_connected = !was_connected && self.connected;
        self.just_disconnected = was_connected && !self.connected;
        active
    }

    fn resolve_buttons(&self, pressed: &[bool]) -> HashSet<String> {
        pressed
            .iter()
            .enumerate()
            .filter(|(_, down)| **down)
            .filter_map(|(index, _)| {
                let name = self.button_map.get(index);
                if name.is_none() {
                    trace!(index, "ignoring gamepad button outside the standard layout");
                }
                name.map(str::to_string)
            })
            .collect()
    }
}
