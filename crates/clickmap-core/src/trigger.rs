use std::fmt;

use crate::{Button, ModifierSet};

/// The semantic gesture one press/settle cycle resolves to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ClickKind {
    Click,
    DoubleClick,
    Hold,
}

/// Dispatch key: a button, the gesture it settled into and the exact
/// modifier set held at press time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trigger {
    pub button: Button,
    pub kind: ClickKind,
    pub modifiers: ModifierSet,
}

impl Trigger {
    pub fn new(button: Button, kind: ClickKind, modifiers: ModifierSet) -> Self {
        Self {
            button,
            kind,
            modifiers,
        }
    }

    /// Trigger with no modifiers held
    pub fn plain(button: Button, kind: ClickKind) -> Self {
        Self::new(button, kind, ModifierSet::empty())
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{} {}", self.button, self.kind)
        } else {
            write!(f, "{}+{} {}", self.modifiers, self.button, self.kind)
        }
    }
}
