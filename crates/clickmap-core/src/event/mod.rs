// Clickmap Event Handling
// Serialized engine plus the evdev pointer event source

mod engine;
#[cfg(feature = "pure-rust")]
pub mod r#loop;

pub use engine::Engine;
#[cfg(feature = "pure-rust")]
pub use evdev::InputEvent;
#[cfg(feature = "pure-rust")]
pub use r#loop::{
    raw_button_event, DeviceInfo, EventSource, EventSourceError, EventSourceResult, PolledBatch,
};
