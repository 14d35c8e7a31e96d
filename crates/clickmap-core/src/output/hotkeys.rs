// Clickmap System Hotkeys
// Well-known system hotkey ids and the key chords that stand in for them

use crate::ModifierSet;

/// Key code for the "back" navigation key (KEY_BACK)
pub const KEY_BACK: u16 = 158;
/// Key code for the "forward" navigation key (KEY_FORWARD)
pub const KEY_FORWARD: u16 = 159;

/// Symbolic hotkey ids with a desktop equivalent: (id, key code, modifiers).
///
/// Ids follow the numbering used by exported mapping files; the chords are
/// the common GNOME/KDE defaults.
const SYSTEM_HOTKEYS: &[(u32, u16, ModifierSet)] = &[
    (32, 125, ModifierSet::empty()),    // overview: tap Super
    (36, 32, ModifierSet::COMMAND),     // show desktop: Super+D
    (64, 60, ModifierSet::OPTION),      // run dialog / search: Alt+F2
    (79, 105, ModifierSet::CONTROL.union(ModifierSet::COMMAND)), // workspace left
    (81, 106, ModifierSet::CONTROL.union(ModifierSet::COMMAND)), // workspace right
    (160, 30, ModifierSet::COMMAND),    // app grid: Super+A
];

/// A key press with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub key_code: u16,
    pub modifiers: ModifierSet,
}

/// Chord standing in for a system hotkey id
pub fn system_hotkey_chord(id: u32) -> Option<Chord> {
    SYSTEM_HOTKEYS
        .iter()
        .find(|(hotkey, _, _)| *hotkey == id)
        .map(|(_, key_code, modifiers)| Chord {
            key_code: *key_code,
            modifiers: *modifiers,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hotkey() {
        assert_eq!(
            system_hotkey_chord(36),
            Some(Chord {
                key_code: 32,
                modifiers: ModifierSet::COMMAND
            })
        );
        let right = system_hotkey_chord(81).unwrap();
        assert_eq!(right.modifiers, ModifierSet::CONTROL | ModifierSet::COMMAND);
    }

    #[test]
    fn test_unknown_hotkey() {
        assert_eq!(system_hotkey_chord(9999), None);
    }
}
