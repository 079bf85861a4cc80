//! Mouse state and viewport-relative cursor coordinates.
//!
//! Hosts report cursor positions in their own ("screen") coordinate space.
//! When the tracker is given a [`Viewport`], positions are translated so that
//! `(0, 0)` is the viewport's top-left corner.

use crate::button::ButtonState;
use crate::event::MouseButton;
use glam::Vec2;
use std::collections::HashSet;

/// Screen-space rectangle of a viewport element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Whether a viewport-relative point lies inside the rectangle.
    #[must_use]
    pub fn contains_local(&self, point: Vec2) -> bool {
        (0.0..self.width).contains(&point.x) && (0.0..self.height).contains(&point.y)
    }
}

/// Reference element used to compute relative mouse coordinates.
///
/// Queried once per tick, so a viewport that moves (scrolling page, resized
/// window) is picked up without re-initialising the tracker.
pub trait Viewport {
    /// Current screen-space bounding box.
    fn bounding_rect(&self) -> ViewportRect;
}

impl Viewport for ViewportRect {
    fn bounding_rect(&self) -> ViewportRect {
        *self
    }
}

impl<F: Fn() -> ViewportRect> Viewport for F {
    fn bounding_rect(&self) -> ViewportRect {
        self()
    }
}

/// Per-tick mouse state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseState {
    buttons: ButtonState<MouseButton>,
    position: Vec2,
    delta: Vec2,
    inside_viewport: bool,
}

impl MouseState {
    /// Creates a new `MouseState` at the origin with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons held as of the last tick.
    #[must_use]
    pub fn pressed(&self) -> &HashSet<MouseButton> {
        self.buttons.pressed()
    }

    /// Buttons that went down during the last tick.
    #[must_use]
    pub fn just_pressed(&self) -> &HashSet<MouseButton> {
        self.buttons.just_pressed()
    }

    /// Buttons that went up during the last tick.
    #[must_use]
    pub fn just_released(&self) -> &HashSet<MouseButton> {
        self.buttons.just_released()
    }

    #[must_use]
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons.is_pressed(&button)
    }

    #[must_use]
    pub fn is_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons.is_just_pressed(&button)
    }

    #[must_use]
    pub fn is_just_released(&self, button: MouseButton) -> bool {
        self.buttons.is_just_released(&button)
    }

    /// Cursor x, relative to the viewport if one is configured.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    /// Cursor y, relative to the viewport if one is configured.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Cursor movement over the last tick.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Whether the cursor was inside the viewport at the last tick.
    ///
    /// Always `true` once the cursor has moved when no viewport is configured.
    #[must_use]
    pub fn is_inside_viewport(&self) -> bool {
        self.inside_viewport
    }

    pub(crate) fn advance_buttons(&mut self, held: HashSet<MouseButton>) -> bool {
        self.buttons.advance(held)
    }

    pub(crate) fn advance_position(&mut self, position: Vec2, inside_viewport: bool) {
        self.delta = position - self.position;
        self.position = position;
        self.inside_viewport = inside_viewport;
    }
}

/// Translate a raw host cursor position into viewport space.
///
/// Returns the local position and whether it falls inside the viewport.
pub(crate) fn to_viewport_space(raw: Vec2, viewport: Option<&dyn Viewport>) -> (Vec2, bool) {
    match viewport {
        Some(viewport) => {
            let rect = viewport.bounding_rect();
            let local = raw - rect.origin();
            (local, rect.contains_local(local))
        }
        None => (raw, true),
    }
}
