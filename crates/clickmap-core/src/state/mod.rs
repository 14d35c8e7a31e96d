// Clickmap State
// Per-button classifier state

mod buttons;

pub use buttons::{ButtonState, ButtonStore};
