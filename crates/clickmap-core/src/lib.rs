// Clickmap Core Library
// Pointer button classification, dispatch and action plumbing

pub mod action;
pub mod button;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod input;
pub mod mapping;
pub mod modifier;
pub mod output;
pub mod state;
pub mod time;
pub mod trigger;

pub use action::{Action, SwipeDirection};
pub use button::Button;
pub use classify::{ClassifierConfig, ClickClassifier, HoldCheck, HoldScheduler, Outcome};
pub use config::{
    ConfigError, ConfigReloader, ConfigSnapshot, ConfigStore, FileConfigStore, MemoryConfigStore,
};
pub use dispatch::{DispatchSnapshot, DispatchTable};
pub use event::Engine;
pub use input::{RawEvent, Transition, Verdict};
pub use mapping::{Mapping, MappingList};
pub use modifier::{ModifierError, ModifierSet};
pub use output::{ActionEffector, ActionSink, EffectorError, EffectorQueue, LogEffector};
pub use time::Timestamp;
pub use trigger::{ClickKind, Trigger};

#[cfg(feature = "pure-rust")]
pub use event::{EventSource, EventSourceError};
#[cfg(feature = "pure-rust")]
pub use output::{UInputEffector, VirtualPointer};
