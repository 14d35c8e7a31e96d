// Clickmap Button Store
// Per-button classification state, one slot per button index

use crate::button::BUTTON_SLOTS;
use crate::{Button, ModifierSet, Timestamp};

/// Transient classification state for one button.
///
/// Release bookkeeping survives across press cycles so a following press
/// can be recognized as part of a double click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// A press is recorded and has not been released yet
    pub pressed: bool,
    /// Timestamp of the current (or last) press; doubles as the hold-check guard
    pub press_time: Option<Timestamp>,
    /// Timestamp of the last release
    pub last_release_time: Option<Timestamp>,
    /// Presses in the current multi-click run
    pub pending_click_count: u32,
    /// Modifiers captured when the button went down
    pub modifiers_at_press: ModifierSet,
    /// A Hold was dispatched for the current press
    pub held: bool,
}

impl ButtonState {
    /// Whether `guard` still identifies the active press
    pub fn is_current_press(&self, guard: Timestamp) -> bool {
        self.pressed && self.press_time == Some(guard)
    }
}

/// Fixed-size store of button states, indexed by button index.
///
/// Confined to the event-processing context; nothing here is shared.
#[derive(Debug)]
pub struct ButtonStore {
    slots: [Option<ButtonState>; BUTTON_SLOTS],
}

impl ButtonStore {
    pub fn new() -> Self {
        Self {
            slots: [None; BUTTON_SLOTS],
        }
    }

    pub fn get(&self, button: Button) -> Option<&ButtonState> {
        self.slots.get(button.index() as usize)?.as_ref()
    }

    /// Mutable state for `button`, created on first use
    pub fn get_or_create(&mut self, button: Button) -> Option<&mut ButtonState> {
        self.slots
            .get_mut(button.index() as usize)
            .map(|slot| slot.get_or_insert_with(ButtonState::default))
    }

    pub fn get_mut(&mut self, button: Button) -> Option<&mut ButtonState> {
        self.slots.get_mut(button.index() as usize)?.as_mut()
    }

    /// Number of buttons that have a slot allocated
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buttons with a press currently recorded
    pub fn pressed_buttons(&self) -> Vec<Button> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Some(state) if state.pressed))
            .filter_map(|(i, _)| Button::from_index(i as u16))
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots = [None; BUTTON_SLOTS];
    }
}

impl Default for ButtonStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_created_lazily() {
        let mut store = ButtonStore::new();
        assert!(store.is_empty());
        assert!(store.get(Button::Middle).is_none());

        store.get_or_create(Button::Middle).unwrap().pressed = true;
        assert_eq!(store.len(), 1);
        assert!(store.get(Button::Middle).unwrap().pressed);
        assert_eq!(store.pressed_buttons(), vec![Button::Middle]);
    }

    #[test]
    fn test_guard_matches_only_active_press() {
        let t = Timestamp::from_millis(10);
        let mut state = ButtonState {
            pressed: true,
            press_time: Some(t),
            ..ButtonState::default()
        };
        assert!(state.is_current_press(t));
        assert!(!state.is_current_press(Timestamp::from_millis(11)));
        state.pressed = false;
        assert!(!state.is_current_press(t));
    }

    #[test]
    fn test_out_of_range_auxiliary_has_no_slot() {
        let mut store = ButtonStore::new();
        assert!(store.get_or_create(Button::Auxiliary(200)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = ButtonStore::new();
        store.get_or_create(Button::Auxiliary(3));
        store.get_or_create(Button::Auxiliary(4));
        store.clear();
        assert!(store.is_empty());
    }
}
