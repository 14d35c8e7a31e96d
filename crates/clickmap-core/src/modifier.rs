// Clickmap Modifier Sets
// Keyboard modifiers held while a pointer button is pressed

use std::fmt;
use std::str::FromStr;

bitflags::bitflags! {
    /// Set of keyboard modifiers.
    ///
    /// Equality is exact-set: `SHIFT | CONTROL` never matches `SHIFT`.
    /// The bit values are the persisted bitmask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierSet: u8 {
        const SHIFT   = 1 << 0;
        const CONTROL = 1 << 1;
        const OPTION  = 1 << 2;
        const COMMAND = 1 << 3;
    }
}

impl Default for ModifierSet {
    fn default() -> Self {
        ModifierSet::empty()
    }
}

/// Modifier key codes (Linux input-event-codes.h) and the flag each sets.
const MODIFIER_KEY_CODES: &[(u16, ModifierSet)] = &[
    (29, ModifierSet::CONTROL),  // L_CONTROL
    (97, ModifierSet::CONTROL),  // R_CONTROL
    (56, ModifierSet::OPTION),   // L_ALT
    (100, ModifierSet::OPTION),  // R_ALT
    (42, ModifierSet::SHIFT),    // L_SHIFT
    (54, ModifierSet::SHIFT),    // R_SHIFT
    (125, ModifierSet::COMMAND), // L_META
    (126, ModifierSet::COMMAND), // R_META
];

/// Name aliases accepted when parsing, mapped to their flag.
const ALIASES: &[(&str, ModifierSet)] = &[
    ("shift", ModifierSet::SHIFT),
    ("ctrl", ModifierSet::CONTROL),
    ("control", ModifierSet::CONTROL),
    ("c", ModifierSet::CONTROL),
    ("alt", ModifierSet::OPTION),
    ("opt", ModifierSet::OPTION),
    ("option", ModifierSet::OPTION),
    ("cmd", ModifierSet::COMMAND),
    ("command", ModifierSet::COMMAND),
    ("super", ModifierSet::COMMAND),
    ("meta", ModifierSet::COMMAND),
    ("win", ModifierSet::COMMAND),
];

/// Error returned when a modifier name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown modifier '{0}'")]
pub struct ModifierError(pub String);

impl ModifierSet {
    /// Flag for a single modifier key code, if it is one.
    pub fn from_key_code(code: u16) -> Option<Self> {
        MODIFIER_KEY_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, m)| *m)
    }

    /// Collapse a set of held key codes into the modifiers they represent.
    pub fn from_held_keys(codes: impl IntoIterator<Item = u16>) -> Self {
        codes
            .into_iter()
            .filter_map(Self::from_key_code)
            .fold(ModifierSet::empty(), |acc, m| acc | m)
    }

    /// Left-hand key code used when synthesizing this modifier.
    ///
    /// Only meaningful for single-flag sets.
    pub fn primary_key_code(self) -> Option<u16> {
        MODIFIER_KEY_CODES
            .iter()
            .find(|(_, m)| *m == self)
            .map(|(c, _)| *c)
    }

    /// Key codes to press, in a stable order, to produce this set.
    pub fn key_codes(self) -> smallvec::SmallVec<[u16; 4]> {
        self.iter().filter_map(|m| m.primary_key_code()).collect()
    }

    /// Build from a persisted bitmask, dropping unknown bits.
    pub fn from_mask(mask: u8) -> Self {
        ModifierSet::from_bits_truncate(mask)
    }
}

impl FromStr for ModifierSet {
    type Err = ModifierError;

    /// Parse names joined by `+`, e.g. `"Ctrl+Shift"`. An empty string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = ModifierSet::empty();
        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            let lower = part.to_ascii_lowercase();
            let flag = ALIASES
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, m)| *m)
                .ok_or_else(|| ModifierError(part.to_string()))?;
            set |= flag;
        }
        Ok(set)
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .iter()
            .map(|m| {
                if m == ModifierSet::SHIFT {
                    "Shift"
                } else if m == ModifierSet::CONTROL {
                    "Ctrl"
                } else if m == ModifierSet::OPTION {
                    "Alt"
                } else {
                    "Cmd"
                }
            })
            .collect();
        write!(f, "{}", names.join("+"))
    }
}

impl serde::Serialize for ModifierSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> serde::Deserialize<'de> for ModifierSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(ModifierSet::from_mask)
    }
}
