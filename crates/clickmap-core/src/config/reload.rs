// Clickmap Config Reloader
// Publishes config store changes into the dispatch table

use parking_lot::Mutex;
use std::sync::Arc;

use super::store::{ConfigStore, Subscription};
use super::ConfigError;
use crate::{DispatchTable, MappingList};

/// Load and publish under `serial`, so a slow load can never be
/// published over a newer one.
fn reload_from(
    serial: &Mutex<()>,
    store: &dyn ConfigStore,
    table: &DispatchTable,
) -> Result<u64, ConfigError> {
    let _serial = serial.lock();
    match store.load() {
        Ok(snapshot) => Ok(table.reload(snapshot.mappings, snapshot.enabled)),
        Err(e) => {
            log::warn!("config reload failed, keeping previous mappings: {}", e);
            Err(e)
        }
    }
}

/// Keeps a [`DispatchTable`] in sync with a [`ConfigStore`].
///
/// A failed reload leaves the last successfully loaded table in place.
pub struct ConfigReloader {
    store: Arc<dyn ConfigStore>,
    table: Arc<DispatchTable>,
    serial: Arc<Mutex<()>>,
    _subscription: Subscription,
}

impl ConfigReloader {
    /// Load once and subscribe to changes.
    ///
    /// If the initial load fails the table is set empty and disabled, so
    /// every button passes through until a valid config appears.
    pub fn attach(
        store: Arc<dyn ConfigStore>,
        table: Arc<DispatchTable>,
    ) -> Result<Self, ConfigError> {
        let serial = Arc::new(Mutex::new(()));
        if let Err(e) = reload_from(&serial, store.as_ref(), &table) {
            log::warn!("starting with an empty, disabled mapping table: {}", e);
            table.reload(MappingList::new(), false);
        }

        let weak_store = Arc::downgrade(&store);
        let listener_table = Arc::clone(&table);
        let listener_serial = Arc::clone(&serial);
        let subscription = store.subscribe(Box::new(move || {
            if let Some(store) = weak_store.upgrade() {
                if let Err(e) = reload_from(&listener_serial, store.as_ref(), &listener_table) {
                    log::debug!("change notification not applied: {}", e);
                }
            }
        }))?;

        Ok(Self {
            store,
            table,
            serial,
            _subscription: subscription,
        })
    }

    /// Reload now. Returns the new table generation.
    pub fn reload(&self) -> Result<u64, ConfigError> {
        reload_from(&self.serial, self.store.as_ref(), &self.table)
    }

    pub fn table(&self) -> &Arc<DispatchTable> {
        &self.table
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChangeListener, ConfigSnapshot, ListenerSet, MemoryConfigStore};
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::thread;
    use std::time::Duration;
    use crate::{Action, Button, ClickKind, Mapping, Trigger};

    fn snapshot_with(action: Action) -> ConfigSnapshot {
        let mappings = vec![Mapping::new(
            "m",
            Trigger::plain(Button::Middle, ClickKind::Click),
            action,
        )]
        .into_iter()
        .collect();
        ConfigSnapshot::new(mappings, true)
    }

    #[test]
    fn test_attach_loads_and_follows_changes() {
        let initial = snapshot_with(Action::SystemHotkey { id: 1 });
        let store = Arc::new(MemoryConfigStore::new(initial));
        let table = Arc::new(DispatchTable::default());
        let _reloader = ConfigReloader::attach(store.clone(), Arc::clone(&table)).unwrap();

        let trigger = Trigger::plain(Button::Middle, ClickKind::Click);
        assert_eq!(table.lookup(&trigger).unwrap().action, Action::SystemHotkey { id: 1 });

        store.set(snapshot_with(Action::SystemHotkey { id: 2 }));
        assert_eq!(table.lookup(&trigger).unwrap().action, Action::SystemHotkey { id: 2 });
    }

    #[test]
    fn test_failed_reload_keeps_last_known_good() {
        let store = Arc::new(MemoryConfigStore::new(snapshot_with(Action::NoOp)));
        let table = Arc::new(DispatchTable::default());
        let reloader = ConfigReloader::attach(store.clone(), Arc::clone(&table)).unwrap();
        let generation = table.generation();

        store.set_corrupt("bad file");
        assert!(reloader.reload().is_err());
        assert_eq!(table.generation(), generation);
        assert!(table.is_enabled());
        assert_eq!(table.snapshot().mappings().len(), 1);
    }

    #[test]
    fn test_failed_initial_load_disables_table() {
        let store = Arc::new(MemoryConfigStore::default());
        store.set_corrupt("unreadable");
        let table = Arc::new(DispatchTable::new(crate::DispatchSnapshot::new(
            MappingList::new(),
            true,
        )));
        let _reloader = ConfigReloader::attach(store, Arc::clone(&table)).unwrap();
        assert!(!table.is_enabled());
        assert!(table.snapshot().mappings().is_empty());
    }

    #[test]
    fn test_dropping_reloader_unsubscribes() {
        let store = Arc::new(MemoryConfigStore::default());
        let table = Arc::new(DispatchTable::default());
        let reloader = ConfigReloader::attach(store.clone(), table).unwrap();
        assert_eq!(store.subscriber_count(), 1);
        drop(reloader);
        assert_eq!(store.subscriber_count(), 0);
    }

    /// Store whose loads can be made slow; each load returns its own number
    #[derive(Default)]
    struct SlowStore {
        loads: AtomicU32,
        slow_next: AtomicBool,
        listeners: ListenerSet,
    }

    impl ConfigStore for SlowStore {
        fn load(&self) -> Result<ConfigSnapshot, ConfigError> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
            if self.slow_next.swap(false, Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(100));
            }
            Ok(snapshot_with(Action::SystemHotkey { id: n }))
        }

        fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, ConfigError> {
            Ok(self.listeners.add(listener))
        }
    }

    #[test]
    fn test_overlapping_reloads_publish_in_load_order() {
        let store = Arc::new(SlowStore::default());
        let table = Arc::new(DispatchTable::default());
        let reloader = ConfigReloader::attach(store.clone(), Arc::clone(&table)).unwrap();

        store.slow_next.store(true, Ordering::SeqCst);
        thread::scope(|scope| {
            scope.spawn(|| reloader.reload().unwrap());
            thread::sleep(Duration::from_millis(20));
            reloader.reload().unwrap();
        });

        let trigger = Trigger::plain(Button::Middle, ClickKind::Click);
        let action = table.lookup(&trigger).unwrap().action;
        assert_eq!(action, Action::SystemHotkey { id: store.loads.load(Ordering::SeqCst) });
        assert_eq!(table.generation(), 3);
    }
}
