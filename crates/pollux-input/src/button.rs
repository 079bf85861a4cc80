//! Held/just-pressed edge detection shared by every button-like device.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

/// Public per-tick state of a set of buttons identified by `K`.
///
/// After every tick `just_pressed ⊆ pressed` and `just_released ∩ pressed = ∅`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState<K: Eq + Hash> {
    pressed: HashSet<K>,
    just_pressed: HashSet<K>,
    just_released: HashSet<K>,
}

impl<K: Eq + Hash> Default for ButtonState<K> {
    fn default() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> ButtonState<K> {
    /// Empty state: nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons held as of the last tick.
    #[must_use]
    pub fn pressed(&self) -> &HashSet<K> {
        &self.pressed
    }

    /// Buttons that became held during the last tick.
    #[must_use]
    pub fn just_pressed(&self) -> &HashSet<K> {
        &self.just_pressed
    }

    /// Buttons that stopped being held during the last tick.
    #[must_use]
    pub fn just_released(&self) -> &HashSet<K> {
        &self.just_released
    }

    /// Returns `true` while `key` is held.
    pub fn is_pressed<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.pressed.contains(key)
    }

    /// Returns `true` only on the tick `key` transitioned to held.
    pub fn is_just_pressed<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.just_pressed.contains(key)
    }

    /// Returns `true` only on the tick `key` transitioned to released.
    pub fn is_just_released<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.just_released.contains(key)
    }

    /// Replace the held set with `now` and recompute both edge sets.
    ///
    /// Returns `true` if at least one button became newly held.
    pub(crate) fn advance(&mut self, now: HashSet<K>) -> bool {
        self.just_pressed = now.difference(&self.pressed).cloned().collect();
        self.just_released = self.pressed.difference(&now).cloned().collect();
        self.pressed = now;
        !self.just_pressed.is_empty()
    }
}

/// Raw held set rebuilt from host events between ticks.
///
/// Only the net result of a tick's events is visible: a press and release of
/// the same button inside one tick leaves no trace.
#[derive(Debug, Clone)]
pub(crate) struct ButtonAccumulator<K: Eq + Hash> {
    held: HashSet<K>,
}

impl<K: Eq + Hash> Default for ButtonAccumulator<K> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> ButtonAccumulator<K> {
    pub(crate) fn press(&mut self, key: K) {
        self.held.insert(key);
    }

    pub(crate) fn release(&mut self, key: &K) {
        self.held.remove(key);
    }

    pub(crate) fn snapshot(&self) -> HashSet<K> {
        self.held.clone()
    }

    pub(crate) fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| (*k).to_string()).collect()
    }

    #[test]
    fn test_initial_state_empty() {
        let state: ButtonState<String> = ButtonState::new();
        assert!(state.pressed().is_empty());
        assert!(state.just_pressed().is_empty());
        assert!(!state.is_pressed("KeyA"));
    }

    #[test]
    fn test_just_pressed_lasts_one_advance() {
        let mut state = ButtonState::new();
        assert!(state.advance(set(&["A"])));
        assert!(state.is_pressed("A"));
        assert!(state.is_just_pressed("A"));

        assert!(!state.advance(set(&["A"])));
        assert!(state.is_pressed("A"));
        assert!(!state.is_just_pressed("A"));
    }

    #[test]
    fn test_release_reported_once() {
        let mut state = ButtonState::new();
        state.advance(set(&["A", "B"]));
        state.advance(set(&["B"]));
        assert!(state.is_just_released("A"));
        assert!(!state.is_pressed("A"));
        state.advance(set(&["B"]));
        assert!(!state.is_just_released("A"));
    }

    #[test]
    fn test_just_pressed_is_subset_of_pressed() {
        let mut state = ButtonState::new();
        for held in [set(&["A"]), set(&["A", "B"]), set(&["C"]), set(&[])] {
            state.advance(held);
            assert!(state.just_pressed().is_subset(state.pressed()));
            assert!(state.just_released().is_disjoint(state.pressed()));
        }
    }

    #[test]
    fn test_accumulator_nets_out_press_release() {
        let mut acc = ButtonAccumulator::default();
        acc.press("KeyQ".to_string());
        acc.release(&"KeyQ".to_string());
        acc.press("KeyE".to_string());
        assert_eq!(acc.snapshot(), set(&["KeyE"]));
        acc.clear();
        assert!(acc.snapshot().is_empty());
    }
}
