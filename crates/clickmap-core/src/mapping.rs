// Clickmap Mappings
// A trigger bound to an action, plus the ordered mapping list

use indexmap::IndexMap;
use std::fmt;

use crate::{Action, Trigger};

/// A single trigger→action binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: String,
    pub trigger: Trigger,
    pub action: Action,
    pub enabled: bool,
}

impl Mapping {
    /// Create an enabled mapping
    pub fn new(id: impl Into<String>, trigger: Trigger, action: Action) -> Self {
        Self {
            id: id.into(),
            trigger,
            action,
            enabled: true,
        }
    }

    /// Builder-style enabled toggle
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether this mapping answers a lookup for `trigger`
    pub fn matches(&self, trigger: &Trigger) -> bool {
        self.enabled && self.trigger == *trigger
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.id, self.trigger, self.action)?;
        if !self.enabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}

/// Mappings in insertion order, indexed by id.
///
/// Order is significant: the first enabled mapping for a trigger wins.
/// Ids are unique; inserting a duplicate id keeps the original entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingList {
    entries: IndexMap<String, Mapping>,
}

impl MappingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping. Returns false (and changes nothing) if its id is taken.
    pub fn push(&mut self, mapping: Mapping) -> bool {
        if self.entries.contains_key(&mapping.id) {
            return false;
        }
        self.entries.insert(mapping.id.clone(), mapping);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Mapping> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enabled mappings only
    pub fn enabled_count(&self) -> usize {
        self.entries.values().filter(|m| m.enabled).count()
    }

    /// Iterate in table order
    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.entries.values()
    }

    /// First enabled mapping with an exactly equal trigger
    pub fn find(&self, trigger: &Trigger) -> Option<&Mapping> {
        self.entries.values().find(|m| m.matches(trigger))
    }
}

impl FromIterator<Mapping> for MappingList {
    fn from_iter<I: IntoIterator<Item = Mapping>>(iter: I) -> Self {
        let mut list = MappingList::new();
        for mapping in iter {
            list.push(mapping);
        }
        list
    }
}
