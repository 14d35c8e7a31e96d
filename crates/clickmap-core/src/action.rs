use std::fmt;

use crate::{Button, ModifierSet};

/// Direction for back/forward navigation
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
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SwipeDirection {
    Back,
    Forward,
}

/// What a mapping does when its trigger fires.
///
/// This is a closed set; the effector matches on it exhaustively.
/// Persisted with an internal `kind` tag and the payload alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    /// A system-level shortcut identified by number
    SystemHotkey { id: u32 },
    /// A single key press with modifiers
    KeySequence {
        key_code: u16,
        #[serde(default)]
        modifiers: ModifierSet,
    },
    /// A synthetic click of another button
    SimulateClick { button: Button },
    /// Back/forward navigation
    SwipeNavigate { direction: SwipeDirection },
    /// Launch an application by desktop id or path
    LaunchApp { identifier: String },
    /// Run a shell command
    RunCommand { command: String },
    NoOp,
}

impl Action {
    /// Short tag name, matching the persisted `kind`
    pub fn kind_name(&self) -> &'static str {
        match self {
            Action::SystemHotkey { .. } => "systemHotkey",
            Action::KeySequence { .. } => "keySequence",
            Action::SimulateClick { .. } => "simulateClick",
            Action::SwipeNavigate { .. } => "swipeNavigate",
            Action::LaunchApp { .. } => "launchApp",
            Action::RunCommand { .. } => "runCommand",
            Action::NoOp => "noOp",
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SystemHotkey { id } => write!(f, "systemHotkey({})", id),
            Action::KeySequence { key_code, modifiers } if modifiers.is_empty() => {
                write!(f, "keySequence({})", key_code)
            }
            Action::KeySequence { key_code, modifiers } => {
                write!(f, "keySequence({}+{})", modifiers, key_code)
            }
            Action::SimulateClick { button } => write!(f, "simulateClick({})", button),
            Action::SwipeNavigate { direction } => write!(f, "swipeNavigate({})", direction),
            Action::LaunchApp { identifier } => write!(f, "launchApp({})", identifier),
            Action::RunCommand { command } => write!(f, "runCommand({})", command),
            Action::NoOp => write!(f, "noOp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Wrapper {
        action: Action,
    }

    #[test]
    fn test_action_kind_names() {
        assert_eq!(Action::NoOp.kind_name(), "noOp");
        assert_eq!(
            Action::SwipeNavigate { direction: SwipeDirection::Back }.kind_name(),
            "swipeNavigate"
        );
        assert!(Action::NoOp.is_noop());
    }

    #[test]
    fn test_action_from_toml() {
        let parsed: Wrapper = toml::from_str(
            r#"action = { kind = "keySequence", keyCode = 30, modifiers = 3 }"#,
        )
        .unwrap();
        assert_eq!(
            parsed.action,
            Action::KeySequence {
                key_code: 30,
                modifiers: ModifierSet::SHIFT | ModifierSet::CONTROL,
            }
        );

        let parsed: Wrapper =
            toml::from_str(r#"action = { kind = "swipeNavigate", direction = "forward" }"#)
                .unwrap();
        assert_eq!(parsed.action, Action::SwipeNavigate { direction: SwipeDirection::Forward });

        let parsed: Wrapper = toml::from_str(r#"action = { kind = "noOp" }"#).unwrap();
        assert_eq!(parsed.action, Action::NoOp);
    }

    #[test]
    fn test_unknown_action_kind_rejected() {
        let parsed: Result<Wrapper, _> = toml::from_str(r#"action = { kind = "teleport" }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_action_display() {
        let action = Action::KeySequence {
            key_code: 30,
            modifiers: ModifierSet::CONTROL,
        };
        assert_eq!(action.to_string(), "keySequence(Ctrl+30)");
        let click = Action::SimulateClick {
            button: Button::Middle,
        };
        assert_eq!(click.to_string(), "simulateClick(middle)");
    }
}
