//! Native gamepad polling through [`gilrs`].
//!
//! [`GilrsSource`] reports the first connected gamepad in the standard
//! 17-button layout. It sticks to that pad until it disconnects, then falls
//! over to whichever pad gilrs lists next.

use crate::error::InputError;
use crate::gamepad::{BUTTON_COUNT, GamepadSnapshot, GamepadSource};
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use tracing::{debug, info};

/// gilrs buttons in standard-layout index order.
pub const STANDARD_BUTTONS: [Button; BUTTON_COUNT] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// Gamepad source backed by the platform gamepad API.
pub struct GilrsSource {
    gilrs: Gilrs,
    active: Option<GamepadId>,
}

impl GilrsSource {
    /// Start the gilrs backend.
    pub fn new() -> Result<Self, InputError> {
        let gilrs = Gilrs::new().map_err(|e| InputError::GamepadBackend(e.to_string()))?;
        Ok(Self {
            gilrs,
            active: None,
        })
    }
}

impl GamepadSource for GilrsSource {
    fn poll(&mut self) -> Option<GamepadSnapshot> {
        // gilrs only refreshes cached pad state while its events are drained.
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => debug!(id = ?event.id, "gamepad attached"),
                EventType::Disconnected => {
                    debug!(id = ?event.id, "gamepad detached");
                    if self.active == Some(event.id) {
                        self.active = None;
                    }
                }
                _ => {}
            }
        }

        let pad = match self.active.and_then(|id| self.gilrs.connected_gamepad(id)) {
            Some(pad) => pad,
            None => {
                let (id, pad) = self.gilrs.gamepads().find(|(_, pad)| pad.is_connected())?;
                info!(name = pad.name(), "using gamepad");
                self.active = Some(id);
                pad
            }
        };

        let buttons = STANDARD_BUTTONS
            .iter()
            .map(|button| pad.is_pressed(*button))
            .collect();
        // gilrs reports y up-positive; the standard layout is down-positive.
        let axes = vec![
            pad.value(Axis::LeftStickX),
            -pad.value(Axis::LeftStickY),
            pad.value(Axis::RightStickX),
            -pad.value(Axis::RightStickY),
        ];
        Some(GamepadSnapshot { buttons, axes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::DEFAULT_BUTTON_NAMES;

    #[test]
    fn test_standard_order_matches_default_names() {
        let expected = [
            (Button::South, "A"),
            (Button::East, "B"),
            (Button::West, "X"),
            (Button::North, "Y"),
            (Button::LeftTrigger, "LB"),
            (Button::RightTrigger2, "RT"),
            (Button::Start, "Menu"),
            (Button::DPadLeft, "Left"),
            (Button::Mode, "Home"),
        ];
        for (button, name) in expected {
            let index = STANDARD_BUTTONS
                .iter()
                .position(|b| *b == button)
                .unwrap();
            assert_eq!(DEFAULT_BUTTON_NAMES[index], name, "{button:?}");
        }
    }

    #[test]
    fn test_standard_buttons_unique() {
        for (i, a) in STANDARD_BUTTONS.iter().enumerate() {
            for b in &STANDARD_BUTTONS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
