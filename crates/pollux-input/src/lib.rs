//! Frame-synchronous input polling: keyboard, mouse, and gamepad state
//! normalised once per game-loop tick.
//!
//! Hosts push raw events into an [`EventQueue`]; [`InputTracker::update`]
//! folds them into `pressed` / `just_pressed` sets, viewport-relative cursor
//! coordinates, and polled gamepad axes and connection flags.

mod button;
mod error;
mod event;
mod gamepad;
mod keyboard;
mod mouse;
mod tracker;

#[cfg(feature = "gilrs")]
pub mod gilrs_source;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;
#[cfg(feature = "winit")]
pub mod winit_events;

pub use button::ButtonState;
pub use error::InputError;
pub use event::{Device, EventQueue, InputEvent, MouseButton};
pub use gamepad::{
    Axes, BUTTON_COUNT, ButtonMap, ButtonMapError, DEFAULT_BUTTON_NAMES, GamepadSnapshot,
    GamepadSource, GamepadState, NoGamepad, ScriptedGamepad,
};
pub use keyboard::KeyboardState;
pub use mouse::{MouseState, Viewport, ViewportRect};
pub use tracker::{InputTracker, TrackerSettings};
