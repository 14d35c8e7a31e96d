// Clickmap Config
// Persisted mappings, config stores and live reloading

mod error;
mod file;
pub mod persisted;
mod reload;
mod store;

pub use error::ConfigError;
pub use file::{FileConfigStore, DEFAULT_WATCH_INTERVAL_MS};
pub use persisted::{default_config_content, PersistedConfig, CURRENT_VERSION};
pub use reload::ConfigReloader;
pub use store::{
    ChangeListener, ConfigSnapshot, ConfigStore, ListenerSet, MemoryConfigStore, Subscription,
};
