// Clickmap Dispatch Table
// Live, swappable trigger→mapping snapshot shared with the config side

use parking_lot::RwLock;
use std::sync::Arc;

use crate::mapping::MappingList;
use crate::{Mapping, Trigger};

/// One immutable view of the table.
///
/// Lookups hold an `Arc` to a snapshot for their whole duration, so a
/// reload can never be observed half-applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSnapshot {
    mappings: MappingList,
    enabled: bool,
    generation: u64,
}

impl DispatchSnapshot {
    pub fn new(mappings: MappingList, enabled: bool) -> Self {
        Self {
            mappings,
            enabled,
            generation: 0,
        }
    }

    /// Empty and disabled: every event passes through
    pub fn disabled() -> Self {
        Self::new(MappingList::new(), false)
    }

    /// Global enabled flag
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn mappings(&self) -> &MappingList {
        &self.mappings
    }

    /// Number of reloads that preceded this snapshot
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// First enabled mapping whose trigger equals `trigger`
    pub fn lookup(&self, trigger: &Trigger) -> Option<&Mapping> {
        self.mappings.find(trigger)
    }
}

/// The shared table. Written rarely (config reloads), read on every event.
#[derive(Debug)]
pub struct DispatchTable {
    current: RwLock<Arc<DispatchSnapshot>>,
}

impl DispatchTable {
    pub fn new(initial: DispatchSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Capture the current snapshot. The lock is held only to clone the `Arc`.
    pub fn snapshot(&self) -> Arc<DispatchSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn lookup(&self, trigger: &Trigger) -> Option<Mapping> {
        self.snapshot().lookup(trigger).cloned()
    }

    pub fn is_enabled(&self) -> bool {
        self.current.read().enabled
    }

    /// Replace the whole table and return the new generation.
    ///
    /// Generations are assigned under the write lock, so they increase in
    /// publication order.
    pub fn reload(&self, mappings: MappingList, enabled: bool) -> u64 {
        let count = mappings.len();
        let generation = {
            let mut current = self.current.write();
            let generation = current.generation + 1;
            *current = Arc::new(DispatchSnapshot {
                mappings,
                enabled,
                generation,
            });
            generation
        };
        log::info!(
            "dispatch table reloaded: generation={} mappings={} enabled={}",
            generation,
            count,
            enabled
        );
        generation
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new(DispatchSnapshot::disabled())
    }
}
