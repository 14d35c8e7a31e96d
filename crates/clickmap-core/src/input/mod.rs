// Clickmap Input Layer
// Raw pointer events, device detection and filtering logic

mod device;
mod event;
mod filter;

pub use device::{
    button_code, button_index_from_code, is_keyboard, is_pointer, is_virtual_device,
    DeviceCapabilities, BTN_LAST, BTN_LEFT,
};
pub use event::{RawEvent, Transition, Verdict};
pub use filter::matches_device_filter;
