//! The frame-synchronous input tracker.
//!
//! [`InputTracker`] owns the keyboard, mouse and gamepad state read by the
//! game loop. Host event handlers append to the [`EventQueue`] returned by
//! [`init`](InputTracker::init); once per iteration the loop calls
//! [`update`](InputTracker::update), which is the only place public state
//! changes.
//!
//! # Usage
//!
//! ```
//! use pollux_input::{InputTracker, ViewportRect};
//!
//! let mut input = InputTracker::default();
//! let queue = input.init(Some(Box::new(ViewportRect::new(50.0, 50.0, 640.0, 480.0))));
//!
//! queue.key_down("KeyA");
//! queue.mouse_move(278.0, 332.0);
//! input.update();
//!
//! assert!(input.keyboard().is_just_pressed("KeyA"));
//! assert_eq!((input.mouse().x(), input.mouse().y()), (228.0, 282.0));
//! ```

use crate::button::ButtonAccumulator;
use crate::error::InputError;
use crate::event::{Device, EventQueue, InputEvent, MouseButton, RawQueue};
use crate::gamepad::{GamepadSource, GamepadState, NoGamepad};
use crate::keyboard::KeyboardState;
use crate::mouse::{MouseState, Viewport, to_viewport_space};
use glam::Vec2;
use tracing::{debug, info, trace, warn};

/// Tunables applied during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    /// Stick deadzone in `[0.0, 0.99]`.
    pub gamepad_deadzone: f32,
    /// Minimum per-tick axis movement that counts as gamepad activity.
    pub activity_threshold: f32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            gamepad_deadzone: 0.0,
            activity_threshold: 0.1,
        }
    }
}

impl TrackerSettings {
    /// Clamp values into their valid ranges. Non-finite values fall back
    /// to the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let gamepad_deadzone = if self.gamepad_deadzone.is_finite() {
            self.gamepad_deadzone.clamp(0.0, 0.99)
        } else {
            defaults.gamepad_deadzone
        };
        let activity_threshold = if self.activity_threshold.is_finite() {
            self.activity_threshold.max(0.0)
        } else {
            defaults.activity_threshold
        };
        Self {
            gamepad_deadzone,
            activity_threshold,
        }
    }
}

/// Raw per-device accumulation between ticks.
#[derive(Debug, Default)]
struct RawInput {
    keys: ButtonAccumulator<String>,
    mouse_buttons: ButtonAccumulator<MouseButton>,
    cursor: Option<Vec2>,
}

impl RawInput {
    fn apply(&mut self, event: InputEvent) {
        match event {
            // Auto-repeat never creates a press on its own.
            InputEvent::KeyDown { repeat: true, .. } => {}
            InputEvent::KeyDown { code, .. } => self.keys.press(code),
            InputEvent::KeyUp { code } => self.keys.release(&code),
            InputEvent::MouseDown(button) => self.mouse_buttons.press(button),
            InputEvent::MouseUp(button) => self.mouse_buttons.release(&button),
            InputEvent::MouseMove { x, y } => self.cursor = Some(Vec2::new(x as f32, y as f32)),
        }
    }

    fn release_all(&mut self) {
        self.keys.clear();
        self.mouse_buttons.clear();
    }
}

/// Owns all device state and advances it once per tick.
pub struct InputTracker {
    keyboard: KeyboardState,
    mouse: MouseState,
    gamepad: GamepadState,
    last_active_device: Device,
    viewport: Option<Box<dyn Viewport>>,
    queue: Option<RawQueue>,
    raw: RawInput,
    gamepads: Box<dyn GamepadSource>,
    settings: TrackerSettings,
    tick: u64,
    warned_uninitialized: bool,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new(NoGamepad)
    }
}

impl std::fmt::Debug for InputTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputTracker")
            .field("tick", &self.tick)
            .field("initialized", &self.queue.is_some())
            .field("last_active_device", &self.last_active_device)
            .field("keyboard", &self.keyboard)
            .field("mouse", &self.mouse)
            .field("gamepad", &self.gamepad)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl InputTracker {
    /// Create a tracker that polls `gamepads` every tick.
    ///
    /// All state starts at defaults: nothing pressed, cursor at the origin,
    /// gamepad disconnected.
    pub fn new(gamepads: impl GamepadSource + 'static) -> Self {
        Self {
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            gamepad: GamepadState::new(),
            last_active_device: Device::default(),
            viewport: None,
            queue: None,
            raw: RawInput::default(),
            gamepads: Box::new(gamepads),
            settings: TrackerSettings::default(),
            tick: 0,
            warned_uninitialized: false,
        }
    }

    /// Bind event delivery and set the viewport used for mouse coordinates.
    ///
    /// Returns the handle host event handlers push into. Calling `init` again
    /// replaces the previous binding: its handles detach, events still
    /// buffered in it are discarded, and keys held through it read as
    /// released on the next tick.
    pub fn init(&mut self, viewport: Option<Box<dyn Viewport>>) -> EventQueue {
        if let Some(previous) = self.queue.take() {
            debug!(
                discarded = previous.len(),
                "re-initialising input tracker, previous event queue detached"
            );
            self.raw.release_all();
        }
        let queue = RawQueue::new();
        let handle = queue.handle();
        self.queue = Some(queue);
        self.viewport = viewport;
        info!(
            has_viewport = self.viewport.is_some(),
            "input tracker initialised"
        );
        handle
    }

    /// Whether [`init`](Self::init) has been called.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.queue.is_some()
    }

    /// Another handle to the current event queue, if initialised.
    #[must_use]
    pub fn event_queue(&self) -> Option<EventQueue> {
        self.queue.as_ref().map(RawQueue::handle)
    }

    /// Replace the viewport without touching the event binding.
    pub fn set_viewport(&mut self, viewport: Option<Box<dyn Viewport>>) {
        self.viewport = viewport;
    }

    /// Reconcile everything that happened since the previous tick.
    ///
    /// Call exactly once per game-loop iteration, before reading state.
    /// Before `init` this still polls the gamepad and logs a warning once.
    pub fn update(&mut self) {
        if self.queue.is_none() && !self.warned_uninitialized {
            warn!("input tracker updated before init; keyboard and mouse stay idle");
            self.warned_uninitialized = true;
        }
        self.reconcile();
    }

    /// Like [`update`](Self::update) but refuses to run before `init`.
    pub fn try_update(&mut self) -> Result<(), InputError> {
        if self.queue.is_none() {
            return Err(InputError::NotInitialized);
        }
        self.reconcile();
        Ok(())
    }

    fn reconcile(&mut self) {
        self.tick += 1;

        // 1. Drain raw events in arrival order.
        let events = self
            .queue
            .as_ref()
            .map(RawQueue::drain)
            .unwrap_or_default();
        let mut latest = events.back().map(InputEvent::device);
        trace!(tick = self.tick, events = events.len(), "draining input queue");
        for event in events {
            self.raw.apply(event);
        }

        // 2-3. Promote raw held sets; releases fall out of `pressed`.
        self.keyboard.advance(self.raw.keys.snapshot());
        self.mouse.advance_buttons(self.raw.mouse_buttons.snapshot());
        let (position, inside) = match self.raw.cursor {
            Some(raw) => to_viewport_space(raw, self.viewport.as_deref()),
            None => (self.mouse.position(), self.mouse.is_inside_viewport()),
        };
        self.mouse.advance_position(position, inside);

        // 4. Poll the gamepad.
        let snapshot = self.gamepads.poll();
        let gamepad_active = self.gamepad.apply_poll(
            snapshot,
            self.settings.gamepad_deadzone,
            self.settings.activity_threshold,
        );
        if self.gamepad.just_connected() {
            info!("gamepad connected");
        } else if self.gamepad.just_disconnected() {
            info!("gamepad disconnected");
        }
        if gamepad_active {
            latest = Some(Device::Gamepad);
        }

        // 5. Record the device that spoke last.
        if let Some(device) = latest
            && device != self.last_active_device
        {
            debug!(from = ?self.last_active_device, to = ?device, "active input device changed");
            self.last_active_device = device;
        }

        debug_assert!(self.keyboard.just_pressed().is_subset(self.keyboard.pressed()));
        debug_assert!(self.mouse.just_pressed().is_subset(self.mouse.pressed()));
        debug_assert!(self.gamepad.just_pressed().is_subset(self.gamepad.pressed()));
    }

    /// Device class that produced the most recent input.
    #[must_use]
    pub fn last_active_device(&self) -> Device {
        self.last_active_device
    }

    #[must_use]
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    #[must_use]
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    #[must_use]
    pub fn gamepad(&self) -> &GamepadState {
        &self.gamepad
    }

    /// Mutable gamepad access, for editing the button map.
    pub fn gamepad_mut(&mut self) -> &mut GamepadState {
        &mut self.gamepad
    }

    /// Number of completed ticks.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn settings(&self) -> TrackerSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: TrackerSettings) {
        self.settings = settings.sanitized();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::{GamepadSnapshot, ScriptedGamepad};
    use crate::mouse::ViewportRect;

    fn keys(tracker: &InputTracker) -> (Vec<&str>, Vec<&str>) {
        let mut pressed: Vec<_> = tracker.keyboard().pressed().iter().map(String::as_str).collect();
        let mut just: Vec<_> = tracker
            .keyboard()
            .just_pressed()
            .iter()
            .map(String::as_str)
            .collect();
        pressed.sort_unstable();
        just.sort_unstable();
        (pressed, just)
    }

    #[test]
    fn test_defaults_before_update() {
        let mut tracker = InputTracker::default();
        let _queue = tracker.init(None);
        assert!(tracker.keyboard().pressed().is_empty());
        assert!(tracker.mouse().pressed().is_empty());
        assert_eq!(tracker.mouse().position(), Vec2::ZERO);
        assert!(!tracker.gamepad().connected());
        assert_eq!(tracker.last_active_device(), Device::Keyboard);
    }

    #[test]
    fn test_events_invisible_until_update() {
        let mut tracker = InputTracker::default();
        let queue = tracker.init(None);
        queue.key_down("KeyA");
        assert!(!tracker.keyboard().is_pressed("KeyA"));
        tracker.update();
        assert!(tracker.keyboard().is_pressed("KeyA"));
    }

    #[test]
    fn test_key_lifecycle_over_three_ticks() {
        let mut tracker = InputTracker::default();
        let queue = tracker.init(None);

        queue.key_down("A");
        queue.key_down("B");
        tracker.update();
        assert_eq!(keys(&tracker), (vec!["A", "B"], vec!["A", "B"]));

        tracker.update();
        assert_eq!(keys(&tracker), (vec!["A", "B"], vec![]));

        queue.key_up("A");
        tracker.update();
        assert_eq!(keys(&tracker), (vec!["B"], vec![]));
        assert!(tracker.keyboard().is_just_released("A"));
    }

    #[test]
    fn test_sub_tick_press_release_is_lost() {
        let mut tracker = InputTracker::default();
        let queue = tracker.init(None);
        queue.key_down("Space");
        queue.key_up("Space");
        tracker.update();
        assert!(!tracker.keyboard().is_pressed("Space"));
        assert!(!tracker.keyboard().is_just_pressed("Space"));
    }

    #[test]
    fn test_repeat_does_not_press() {
        let mut tracker = InputTracker::default();
        let queue = tracker.init(None);
        queue.push(InputEvent::KeyDown {
            code: "KeyW".to_string(),
            repeat: true,
        });
        tracker.update();
        assert!(!tracker.keyboard().is_pressed("KeyW"));

        queue.key_down("KeyW");
        tracker.update();
        queue.push(InputEvent::KeyDown {
            code: "KeyW".to_string(),
            repeat: true,
        });
        tracker.update();
        assert!(tracker.keyboard().is_pressed("KeyW"));
        assert!(!tracker.keyboard().is_just_pressed("KeyW"));
    }

    #[test]
    fn test_mouse_relative_to_viewport() {
        let mut tracker = InputTracker::default();
        let queue = tracker.init(Some(Box::new(ViewportRect::new(50.0, 50.0, 800.0, 600.0))));
        queue.mouse_move(278.0, 332.0);
        queue.mouse_down(MouseButton::LEFT);
        tracker.update();
        assert_eq!(tracker.mouse().x(), 228.0);
        assert_eq!(tracker.mouse().y(), 282.0);
        assert!(tracker.mouse().is_just_pressed(MouseButton::LEFT));
        assert_eq!(tracker.last_active_device(), Device::Mouse);
    }

    #[test]
    fn test_last_active_device_follows_latest_event() {
        let mut tracker = InputTracker::default();
        let queue = tracker.init(None);
        queue.mouse_move(1.0, 1.0);
        queue.key_down("KeyE");
        tracker.update();
        assert_eq!(tracker.last_active_device(), Device::Keyboard);

        queue.mouse_down(MouseButton::RIGHT);
        tracker.update();
        assert_eq!(tracker.last_active_device(), Device::Mouse);

        // Quiet tick keeps the previous value.
        tracker.update();
        assert_eq!(tracker.last_active_device(), Device::Mouse);
    }

    #[test]
    fn test_gamepad_activity_marks_active_device() {
        let script = ScriptedGamepad::new();
        let mut tracker = InputTracker::new(script.clone());
        let queue = tracker.init(None);

        queue.key_down("KeyA");
        script.set(Some(GamepadSnapshot::with_pressed(&[0])));
        tracker.update();
        assert_eq!(tracker.last_active_device(), Device::Gamepad);

        queue.key_up("KeyA");
        tracker.update();
        assert_eq!(tracker.last_active_device(), Device::Keyboard);
    }

    #[test]
    fn test_reinit_replaces_binding() {
        let mut tracker = InputTracker::default();
        let first = tracker.init(None);
        first.key_down("KeyA");
        tracker.update();
        assert!(tracker.keyboard().is_pressed("KeyA"));

        first.key_down("KeyB");
        let second = tracker.init(None);
        assert!(!first.is_attached());
        assert!(!first.key_down("KeyC"));
        second.key_down("KeyD");
        tracker.update();

        assert!(!tracker.keyboard().is_pressed("KeyA"));
        assert!(!tracker.keyboard().is_pressed("KeyB"));
        assert!(!tracker.keyboard().is_pressed("KeyC"));
        assert!(tracker.keyboard().is_just_pressed("KeyD"));
    }

    #[test]
    fn test_update_before_init() {
        let script = ScriptedGamepad::new();
        script.set(Some(GamepadSnapshot::default()));
        let mut tracker = InputTracker::new(script);
        tracker.update();
        assert!(tracker.gamepad().connected());
        assert_eq!(tracker.tick(), 1);
    }

    #[test]
    fn test_try_update_requires_init() {
        let mut tracker = InputTracker::default();
        assert!(matches!(tracker.try_update(), Err(InputError::NotInitialized)));
        let _queue = tracker.init(None);
        assert!(tracker.try_update().is_ok());
    }

    #[test]
    fn test_settings_sanitized() {
        let settings = TrackerSettings {
            gamepad_deadzone: 2.0,
            activity_threshold: -1.0,
        }
        .sanitized();
        assert_eq!(settings.gamepad_deadzone, 0.99);
        assert_eq!(settings.activity_threshold, 0.0);

        let settings = TrackerSettings {
            gamepad_deadzone: f32::NAN,
            activity_threshold: f32::INFINITY,
        }
        .sanitized();
        assert_eq!(settings, TrackerSettings::default());
    }

    #[test]
    fn test_nan_deadzone_leaves_centred_sticks_at_rest() {
        let script = ScriptedGamepad::new();
        let mut tracker = InputTracker::new(script.clone());
        let _queue = tracker.init(None);
        tracker.set_settings(TrackerSettings {
            gamepad_deadzone: f32::NAN,
            activity_threshold: f32::NAN,
        });
        assert_eq!(tracker.settings().gamepad_deadzone, 0.0);

        script.set(Some(GamepadSnapshot::with_pressed(&[])));
        tracker.update();
        assert_eq!(tracker.gamepad().axes().as_array(), [0.0; 4]);
        assert_eq!(tracker.last_active_device(), Device::Keyboard);
    }
}
