// Clickmap Input Layer - Raw Events
// Button transitions delivered by the event source and the verdict returned for each

use std::fmt;

use crate::{Button, ModifierSet, Timestamp};

/// Direction of a raw button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Down,
    Up,
}

impl Transition {
    pub fn from_is_down(is_down: bool) -> Self {
        if is_down {
            Transition::Down
        } else {
            Transition::Up
        }
    }

    /// evdev key value: 1 press, 0 release. Repeats (2) are not transitions.
    pub fn from_key_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Transition::Down),
            0 => Some(Transition::Up),
            _ => None,
        }
    }
}

/// One raw button transition from the global input filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Raw button index as reported by the source; may be out of range
    pub button_index: u16,
    pub transition: Transition,
    pub modifiers: ModifierSet,
    pub timestamp: Timestamp,
}

impl RawEvent {
    /// Build from the event source's wire shape
    pub fn new(button_index: u16, is_down: bool, modifier_mask: u8, timestamp: Timestamp) -> Self {
        Self {
            button_index,
            transition: Transition::from_is_down(is_down),
            modifiers: ModifierSet::from_mask(modifier_mask),
            timestamp,
        }
    }

    pub fn down(button: Button, modifiers: ModifierSet, timestamp: Timestamp) -> Self {
        Self {
            button_index: u16::from(button.index()),
            transition: Transition::Down,
            modifiers,
            timestamp,
        }
    }

    pub fn up(button: Button, modifiers: ModifierSet, timestamp: Timestamp) -> Self {
        Self {
            button_index: u16::from(button.index()),
            transition: Transition::Up,
            modifiers,
            timestamp,
        }
    }

    /// The button this event refers to, if the index is in range
    pub fn button(&self) -> Option<Button> {
        Button::from_index(self.button_index)
    }

    pub fn is_down(&self) -> bool {
        self.transition == Transition::Down
    }
}

impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.transition {
            Transition::Down => "down",
            Transition::Up => "up",
        };
        write!(f, "button#{} {} @{}", self.button_index, dir, self.timestamp)
    }
}

/// What the event source should do with the original event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Forward the event unchanged
    Passthrough,
    /// Swallow the event
    Suppress,
    /// Forward a different event instead. Reserved; nothing produces it yet.
    Replace(RawEvent),
}

impl Verdict {
    pub fn is_suppress(&self) -> bool {
        matches!(self, Verdict::Suppress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_from_key_value() {
        assert_eq!(Transition::from_key_value(1), Some(Transition::Down));
        assert_eq!(Transition::from_key_value(0), Some(Transition::Up));
        assert_eq!(Transition::from_key_value(2), None);
    }

    #[test]
    fn test_raw_event_from_wire_shape() {
        let event = RawEvent::new(3, true, 0b0101, Timestamp::from_millis(10));
        assert_eq!(event.button(), Some(Button::Auxiliary(3)));
        assert!(event.is_down());
        assert_eq!(event.modifiers, ModifierSet::SHIFT | ModifierSet::OPTION);
    }

    #[test]
    fn test_out_of_range_index_has_no_button() {
        let event = RawEvent::new(99, false, 0, Timestamp::ZERO);
        assert_eq!(event.button(), None);
    }
}
