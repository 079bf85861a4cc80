//! Browser host bindings (wasm32 + `web` feature).
//!
//! [`WebBindings`] registers keyboard and mouse listeners on the global
//! window and forwards them into an [`EventQueue`]; the listeners are removed
//! when the bindings are dropped. [`ElementViewport`] measures an element
//! with `getBoundingClientRect`, and [`NavigatorGamepads`] polls
//! `navigator.getGamepads()`.

use crate::error::InputError;
use crate::event::{EventQueue, InputEvent, MouseButton};
use crate::gamepad::{GamepadSnapshot, GamepadSource};
use crate::mouse::{Viewport, ViewportRect};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, MouseEvent};

type Listener = Closure<dyn FnMut(Event)>;

/// Live browser event listeners feeding one [`EventQueue`].
pub struct WebBindings {
    target: EventTarget,
    listeners: Vec<(&'static str, Listener)>,
}

impl WebBindings {
    /// Register listeners on the global `window`.
    pub fn attach(queue: &EventQueue) -> Result<Self, InputError> {
        let window =
            web_sys::window().ok_or_else(|| InputError::Web("no global window".to_string()))?;
        let mut bindings = Self {
            target: window.into(),
            listeners: Vec::new(),
        };
        bindings.listen("keydown", queue, |event| {
            let event = event.dyn_into::<KeyboardEvent>().ok()?;
            Some(InputEvent::KeyDown {
                code: event.code(),
                repeat: event.repeat(),
            })
        })?;
        bindings.listen("keyup", queue, |event| {
            let event = event.dyn_into::<KeyboardEvent>().ok()?;
            Some(InputEvent::KeyUp { code: event.code() })
        })?;
        bindings.listen("mousedown", queue, |event| {
            mouse_button(event).map(InputEvent::MouseDown)
        })?;
        bindings.listen("mouseup", queue, |event| {
            mouse_button(event).map(InputEvent::MouseUp)
        })?;
        bindings.listen("mousemove", queue, |event| {
            let event = event.dyn_into::<MouseEvent>().ok()?;
            Some(InputEvent::MouseMove {
                x: f64::from(event.client_x()),
                y: f64::from(event.client_y()),
            })
        })?;
        debug!(count = bindings.listeners.len(), "browser input listeners attached");
        Ok(bindings)
    }

    fn listen(
        &mut self,
        name: &'static str,
        queue: &EventQueue,
        translate: fn(Event) -> Option<InputEvent>,
    ) -> Result<(), InputError> {
        let queue = queue.clone();
        let listener = Listener::new(move |event: Event| {
            if let Some(input) = translate(event) {
                queue.push(input);
            }
        });
        self.target
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            .map_err(|e| InputError::Web(format!("{name}: {e:?}")))?;
        self.listeners.push((name, listener));
        Ok(())
    }
}

impl Drop for WebBindings {
    fn drop(&mut self) {
        for (name, listener) in &self.listeners {
            let _ = self
                .target
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

fn mouse_button(event: Event) -> Option<MouseButton> {
    let event = event.dyn_into::<MouseEvent>().ok()?;
    u16::try_from(event.button()).ok().map(MouseButton)
}

/// Viewport backed by a DOM element's bounding box.
pub struct ElementViewport(pub Element);

impl Viewport for ElementViewport {
    fn bounding_rect(&self) -> ViewportRect {
        let rect = self.0.get_bounding_client_rect();
        ViewportRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    }
}

/// Polls the first connected pad from `navigator.getGamepads()`.
pub struct NavigatorGamepads {
    navigator: web_sys::Navigator,
}

impl NavigatorGamepads {
    pub fn new() -> Result<Self, InputError> {
        let window =
            web_sys::window().ok_or_else(|| InputError::Web("no global window".to_string()))?;
        Ok(Self {
            navigator: window.navigator(),
        })
    }
}

impl GamepadSource for NavigatorGamepads {
    fn poll(&mut self) -> Option<GamepadSnapshot> {
        let pads = self.navigator.get_gamepads().ok()?;
        let pad = pads
            .iter()
            .filter_map(|value| value.dyn_into::<web_sys::Gamepad>().ok())
            .find(web_sys::Gamepad::connected)?;
        let buttons = pad
            .buttons()
            .iter()
            .map(|value| {
                value
                    .dyn_into::<web_sys::GamepadButton>()
                    .is_ok_and(|button| button.pressed())
            })
            .collect();
        let axes = pad
            .axes()
            .iter()
            .map(|value| value.as_f64().unwrap_or(0.0) as f32)
            .collect();
        Some(GamepadSnapshot { buttons, axes })
    }
}
