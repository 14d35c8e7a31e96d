// Clickmap Buttons
// Pointer button identifiers and raw index conversion

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Number of per-button state slots. Indices at or above this are not buttons.
pub const BUTTON_SLOTS: usize = 32;

/// First auxiliary button index (after left, right and middle).
pub const FIRST_AUXILIARY: u8 = 3;

/// A physical pointer button.
///
/// Indices follow the usual pointer numbering: 0 is left, 1 is right,
/// 2 is middle and everything from 3 up is an auxiliary button
/// (3 is usually "back", 4 "forward").
///
/// Buttons compare by index. `Auxiliary(n)` with `n` below
/// [`FIRST_AUXILIARY`] is the same button as the named variant.
#[derive(Debug, Clone, Copy)]
pub enum Button {
    Left,
    Right,
    Middle,
    Auxiliary(u8),
}

impl Button {
    /// Convert a raw event-source index into a Button.
    ///
    /// Returns `None` for indices that have no state slot.
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(Button::Left),
            1 => Some(Button::Right),
            2 => Some(Button::Middle),
            n if (n as usize) < BUTTON_SLOTS => Some(Button::Auxiliary(n as u8)),
            _ => None,
        }
    }

    /// Raw index of this button.
    pub fn index(self) -> u8 {
        match self {
            Button::Left => 0,
            Button::Right => 1,
            Button::Middle => 2,
            Button::Auxiliary(n) => n,
        }
    }

    /// Auxiliary button `n`, if `n` is an auxiliary index with a state slot
    pub fn auxiliary(n: u8) -> Option<Self> {
        if n < FIRST_AUXILIARY || usize::from(n) >= BUTTON_SLOTS {
            return None;
        }
        Some(Button::Auxiliary(n))
    }

    /// Same button in its named form (`Auxiliary(1)` becomes `Right`)
    pub fn canonical(self) -> Self {
        match self {
            Button::Auxiliary(n) if n < FIRST_AUXILIARY => match n {
                0 => Button::Left,
                1 => Button::Right,
                _ => Button::Middle,
            },
            other => other,
        }
    }

    /// Left and right are owned by the OS and never classified.
    pub fn is_classified(self) -> bool {
        self.index() > 1
    }
}

impl PartialEq for Button {
    fn eq(&self, other: &Self) -> bool {
        self.index() == other.index()
    }
}

impl Eq for Button {}

impl Hash for Button {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index().hash(state);
    }
}

impl PartialOrd for Button {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Button {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl TryFrom<u8> for Button {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Button::from_index(u16::from(index))
            .ok_or_else(|| format!("button index {} out of range", index))
    }
}

impl From<Button> for u8 {
    fn from(button: Button) -> Self {
        button.index()
    }
}

impl serde::Serialize for Button {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

impl<'de> serde::Deserialize<'de> for Button {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        Button::try_from(index).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Button::Left => write!(f, "left"),
            Button::Right => write!(f, "right"),
            Button::Middle => write!(f, "middle"),
            Button::Auxiliary(n) => write!(f, "button{}", n),
        }
    }
}
