// Clickmap Output Layer
// Action effectors, the effector queue and the virtual pointer

pub mod hotkeys;
pub mod process;
mod queue;

#[cfg(feature = "pure-rust")]
mod uinput;

pub use queue::{ActionEffector, ActionSink, EffectorError, EffectorQueue, LogEffector};

#[cfg(feature = "pure-rust")]
pub use uinput::{UInputEffector, VirtualPointer, VIRTUAL_DEVICE_PREFIX};
