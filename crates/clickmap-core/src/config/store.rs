// Clickmap Config Store
// Store abstraction, change subscriptions and the in-memory store

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::ConfigError;
use crate::MappingList;

/// Everything the dispatch table is built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub mappings: MappingList,
    pub enabled: bool,
}

impl ConfigSnapshot {
    pub fn new(mappings: MappingList, enabled: bool) -> Self {
        Self { mappings, enabled }
    }
}

/// Called whenever the stored configuration may have changed.
///
/// Listeners should call [`ConfigStore::load`] themselves; notifications
/// carry no payload and may be spurious.
pub type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// Owner of the persisted mappings and global enabled flag
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<ConfigSnapshot, ConfigError>;

    /// Register for change notifications until the returned
    /// [`Subscription`] is dropped.
    fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, ConfigError>;
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn Fn() + Send + Sync>)>,
}

/// Listener registry shared by store implementations
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: ChangeListener) -> Subscription {
        let mut registry = self.inner.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push((id, Arc::from(listener)));
        Subscription {
            registry: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Run every listener. The registry lock is not held while they run.
    pub fn notify(&self) {
        let listeners: Vec<_> = self
            .inner
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle to a registered listener; dropping it unsubscribes
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// In-memory store. `set` replaces the snapshot and notifies synchronously.
pub struct MemoryConfigStore {
    current: Mutex<Result<ConfigSnapshot, String>>,
    listeners: ListenerSet,
}

impl MemoryConfigStore {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            current: Mutex::new(Ok(snapshot)),
            listeners: ListenerSet::new(),
        }
    }

    pub fn set(&self, snapshot: ConfigSnapshot) {
        *self.current.lock() = Ok(snapshot);
        self.listeners.notify();
    }

    /// Make subsequent loads fail as if the stored data were unreadable
    pub fn set_corrupt(&self, message: impl Into<String>) {
        *self.current.lock() = Err(message.into());
        self.listeners.notify();
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new(ConfigSnapshot::default())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<ConfigSnapshot, ConfigError> {
        self.current.lock().clone().map_err(ConfigError::TomlParse)
    }

    fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, ConfigError> {
        Ok(self.listeners.add(listener))
    }
}
