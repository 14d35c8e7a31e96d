// Clickmap Input Layer - Device Detection
// Device capability analysis, pointer detection and button code mapping

use std::collections::HashSet;

use crate::Button;

/// First evdev button code (BTN_LEFT)
pub const BTN_LEFT: u16 = 0x110;
/// Last evdev mouse button code we map (BTN_TASK and the unnamed codes after it)
pub const BTN_LAST: u16 = 0x11f;

/// Device capabilities extracted from an evdev device
#[derive(Debug, Clone, Default)]
pub struct DeviceCapabilities {
    /// Whether the device supports EV_KEY events
    pub has_ev_key: bool,
    /// Whether the device reports relative X motion
    pub has_rel_x: bool,
    /// List of supported key codes (EV_KEY capability codes)
    pub supported_keys: Vec<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, has_rel_x: bool, supported_keys: Vec<u16>) -> Self {
        Self {
            has_ev_key,
            has_rel_x,
            supported_keys,
        }
    }

    pub fn supports_key(&self, key_code: u16) -> bool {
        self.supported_keys.contains(&key_code)
    }

    /// Create a HashSet from supported keys for O(1) lookups
    pub fn key_set(&self) -> HashSet<u16> {
        self.supported_keys.iter().copied().collect()
    }
}

// QWERTY row key codes: Q, W, E, R, T, Y
const QWERTY_CODES: &[u16] = &[16, 17, 18, 19, 20, 21];

// Representative A-Z and SPACE codes for keyboard detection
const A_Z_SPACE_CODES: &[u16] = &[57, 30, 44]; // SPACE, A, Z

/// A pointer is anything that moves relatively and has a left button.
pub fn is_pointer(capabilities: &DeviceCapabilities) -> bool {
    capabilities.has_ev_key && capabilities.has_rel_x && capabilities.supports_key(BTN_LEFT)
}

/// Keyboards are queried for modifier state, never grabbed.
///
/// A device is considered a keyboard if it supports EV_KEY and has the
/// QWERTY row plus A, Z and SPACE.
pub fn is_keyboard(capabilities: &DeviceCapabilities) -> bool {
    if !capabilities.has_ev_key {
        return false;
    }
    let key_set = capabilities.key_set();
    let qwerty_present = QWERTY_CODES.iter().all(|code| key_set.contains(code));
    let az_present = A_Z_SPACE_CODES.iter().all(|code| key_set.contains(code));
    qwerty_present && az_present
}

/// Virtual devices are created by clickmap itself and must never be grabbed,
/// or forwarded events would loop back in.
pub fn is_virtual_device(name: &str, prefix: &str) -> bool {
    name.contains(prefix)
}

/// Map an evdev key code to a raw button index
pub fn button_index_from_code(code: u16) -> Option<u16> {
    (BTN_LEFT..=BTN_LAST).contains(&code).then(|| code - BTN_LEFT)
}

/// evdev key code for a button, if it has one
pub fn button_code(button: Button) -> Option<u16> {
    let code = BTN_LEFT + u16::from(button.index());
    (code <= BTN_LAST).then_some(code)
}
