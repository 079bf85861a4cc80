//! Raw host events and the queue that buffers them between ticks.
//!
//! Host event handlers never touch tracker state directly. They hold an
//! [`EventQueue`] handle and append [`InputEvent`]s to it; the tracker drains
//! the queue in arrival order inside [`InputTracker::update`].
//!
//! [`InputTracker::update`]: crate::InputTracker::update

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Integer mouse button code as reported by the host.
///
/// Codes outside the five named constants are kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MouseButton(pub u16);

impl MouseButton {
    /// Primary button.
    pub const LEFT: Self = Self(0);
    /// Wheel button.
    pub const MIDDLE: Self = Self(1);
    /// Secondary button.
    pub const RIGHT: Self = Self(2);
    /// Browser "back" side button.
    pub const BACK: Self = Self(3);
    /// Browser "forward" side button.
    pub const FORWARD: Self = Self(4);
}

/// Device class an input originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Keyboard,
    Mouse,
    Gamepad,
}

/// A raw event pushed by a host adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key went down. `code` is the physical key name, e.g. `"KeyA"`.
    KeyDown { code: String, repeat: bool },
    /// A key went up.
    KeyUp { code: String },
    /// A mouse button went down.
    MouseDown(MouseButton),
    /// A mouse button went up.
    MouseUp(MouseButton),
    /// The cursor moved to `(x, y)` in host ("screen") coordinates.
    MouseMove { x: f64, y: f64 },
}

impl InputEvent {
    /// The device class that produced this event.
    #[must_use]
    pub fn device(&self) -> Device {
        match self {
            Self::KeyDown { .. } | Self::KeyUp { .. } => Device::Keyboard,
            Self::MouseDown(_) | Self::MouseUp(_) | Self::MouseMove { .. } => Device::Mouse,
        }
    }
}

type Buffer = RefCell<VecDeque<InputEvent>>;

/// Tracker-owned side of the queue. Dropping it detaches every handle.
#[derive(Debug, Default)]
pub(crate) struct RawQueue {
    events: Rc<Buffer>,
}

impl RawQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn handle(&self) -> EventQueue {
        EventQueue {
            inner: Rc::downgrade(&self.events),
        }
    }

    /// Take every buffered event, oldest first.
    pub(crate) fn drain(&self) -> VecDeque<InputEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub(crate) fn len(&self) -> usize {
        self.events.borrow().len()
    }
}

/// Cloneable, single-threaded handle that host event handlers push into.
///
/// A handle becomes detached when the tracker is re-initialised or dropped;
/// pushes to a detached handle are discarded.
#[derive(Debug, Clone)]
pub struct EventQueue {
    inner: Weak<Buffer>,
}

impl EventQueue {
    /// Append an event. Returns `false` if the handle is detached.
    pub fn push(&self, event: InputEvent) -> bool {
        match self.inner.upgrade() {
            Some(buffer) => {
                buffer.borrow_mut().push_back(event);
                true
            }
            None => {
                debug!(?event, "dropping event pushed to a detached input queue");
                false
            }
        }
    }

    /// Whether the owning tracker still reads from this handle.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Push a non-repeat [`InputEvent::KeyDown`].
    pub fn key_down(&self, code: impl Into<String>) -> bool {
        self.push(InputEvent::KeyDown {
            code: code.into(),
            repeat: false,
        })
    }

    /// Push an [`InputEvent::KeyUp`].
    pub fn key_up(&self, code: impl Into<String>) -> bool {
        self.push(InputEvent::KeyUp { code: code.into() })
    }

    /// Push an [`InputEvent::MouseDown`].
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.push(InputEvent::MouseDown(button))
    }

    /// Push an [`InputEvent::MouseUp`].
    pub fn mouse_up(&self, button: MouseButton) -> bool {
        self.push(InputEvent::MouseUp(button))
    }

    /// Push an [`InputEvent::MouseMove`].
    pub fn mouse_move(&self, x: f64, y: f64) -> bool {
        self.push(InputEvent::MouseMove { x, y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drain_in_arrival_order() {
        let queue = RawQueue::new();
        let handle = queue.handle();
        handle.key_down("KeyA");
        handle.mouse_down(MouseButton::RIGHT);
        handle.key_up("KeyA");

        let drained: Vec<_> = queue.drain().into_iter().collect();
        assert_eq!(
            drained,
            vec![
                InputEvent::KeyDown {
                    code: "KeyA".to_string(),
                    repeat: false
                },
                InputEvent::MouseDown(MouseButton::RIGHT),
                InputEvent::KeyUp {
                    code: "KeyA".to_string()
                },
            ]
        );
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_cloned_handles_share_buffer() {
        let queue = RawQueue::new();
        let a = queue.handle();
        let b = a.clone();
        a.key_down("KeyW");
        b.mouse_move(1.0, 2.0);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_handle_detaches_when_queue_dropped() {
        let queue = RawQueue::new();
        let handle = queue.handle();
        assert!(handle.is_attached());
        drop(queue);
        assert!(!handle.is_attached());
        assert!(!handle.key_down("Space"));
    }

    #[test]
    fn test_event_device_class() {
        assert_eq!(
            InputEvent::KeyUp {
                code: "Escape".to_string()
            }
            .device(),
            Device::Keyboard
        );
        assert_eq!(
            InputEvent::MouseMove { x: 0.0, y: 0.0 }.device(),
            Device::Mouse
        );
        assert_eq!(InputEvent::MouseUp(MouseButton::BACK).device(), Device::Mouse);
    }
}
