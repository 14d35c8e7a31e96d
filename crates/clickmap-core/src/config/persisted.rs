// Clickmap Persisted Config
// On-disk TOML shape of the mapping list and its validation on load

use serde::{Deserialize, Serialize};

use super::{ConfigError, ConfigSnapshot};
use crate::{Action, Button, ClickKind, Mapping, MappingList, ModifierSet, Trigger};

/// Newest config file version this build understands
pub const CURRENT_VERSION: u32 = 1;

fn current_version() -> u32 {
    CURRENT_VERSION
}

fn default_true() -> bool {
    true
}

/// Root TOML table.
///
/// Scalar fields come before `mappings` so the serializer emits them
/// ahead of the `[[mappings]]` tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfig {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    #[serde(default)]
    pub mappings: Vec<PersistedMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedMapping {
    pub id: String,
    #[serde(default = "default_true")]
    pub is_enabled: bool,
    pub trigger: PersistedTrigger,
    pub action: Action,
}

/// Trigger as stored: raw button index, click type and modifier bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTrigger {
    pub button: u8,
    pub click_type: ClickKind,
    #[serde(default)]
    pub modifiers: u8,
}

impl PersistedConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the persisted form of a live snapshot
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
        let mappings = snapshot
            .mappings
            .iter()
            .map(|mapping| PersistedMapping {
                id: mapping.id.clone(),
                is_enabled: mapping.enabled,
                trigger: PersistedTrigger {
                    button: mapping.trigger.button.index(),
                    click_type: mapping.trigger.kind,
                    modifiers: mapping.trigger.modifiers.bits(),
                },
                action: mapping.action.clone(),
            })
            .collect();
        Self {
            version: CURRENT_VERSION,
            is_enabled: snapshot.enabled,
            mappings,
        }
    }

    /// Validate into a live snapshot.
    ///
    /// Entries bound to left/right or to out-of-range buttons are skipped,
    /// as are later entries reusing an id. Unknown modifier bits are dropped.
    pub fn into_snapshot(self) -> Result<ConfigSnapshot, ConfigError> {
        if self.version > CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_VERSION,
            });
        }

        let mut mappings = MappingList::new();
        for entry in self.mappings {
            let button = match Button::try_from(entry.trigger.button) {
                Ok(button) if button.is_classified() => button,
                Ok(button) => {
                    log::warn!(
                        "mapping '{}': {} button cannot be remapped, skipping",
                        entry.id,
                        button
                    );
                    continue;
                }
                Err(e) => {
                    log::warn!("mapping '{}': {}, skipping", entry.id, e);
                    continue;
                }
            };
            let trigger = Trigger::new(
                button,
                entry.trigger.click_type,
                ModifierSet::from_mask(entry.trigger.modifiers),
            );
            let mapping =
                Mapping::new(entry.id, trigger, entry.action).with_enabled(entry.is_enabled);
            let id = mapping.id.clone();
            if !mappings.push(mapping) {
                log::warn!("duplicate mapping id '{}', keeping the first", id);
            }
        }

        Ok(ConfigSnapshot {
            mappings,
            enabled: self.is_enabled,
        })
    }
}

/// Content written by `clickmap --init-config`
pub fn default_config_content() -> &'static str {
    r#"# Clickmap mappings
# Place this file at: ~/.config/clickmap/mappings.toml
#
# trigger.button:    2 = middle, 3 and up = extra buttons (0/1 are never remapped)
# trigger.clickType: "click", "doubleClick" or "hold"
# trigger.modifiers: bitmask, shift = 1, control = 2, option/alt = 4, command/super = 8
# action.kind:       systemHotkey, keySequence, simulateClick, swipeNavigate,
#                    launchApp, runCommand, noOp

version = 1
isEnabled = true

[[mappings]]
id = "back"
isEnabled = true

[mappings.trigger]
button = 3
clickType = "click"
modifiers = 0

[mappings.action]
kind = "swipeNavigate"
direction = "back"

[[mappings]]
id = "forward"
isEnabled = true

[mappings.trigger]
button = 4
clickType = "click"
modifiers = 0

[mappings.action]
kind = "swipeNavigate"
direction = "forward"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SwipeDirection;

    #[test]
    fn test_default_config_parses() {
        let snapshot = PersistedConfig::from_toml(default_config_content())
            .unwrap()
            .into_snapshot()
            .unwrap();
        assert!(snapshot.enabled);
        assert_eq!(snapshot.mappings.len(), 2);

        let back = snapshot.mappings.get("back").unwrap();
        assert_eq!(back.trigger, Trigger::plain(Button::Auxiliary(3), ClickKind::Click));
        assert_eq!(
            back.action,
            Action::SwipeNavigate {
                direction: SwipeDirection::Back
            }
        );
    }

    #[test]
    fn test_left_and_out_of_range_buttons_are_skipped() {
        let toml = r#"
[[mappings]]
id = "left"
trigger = { button = 0, clickType = "click" }
action = { kind = "noOp" }

[[mappings]]
id = "huge"
trigger = { button = 200, clickType = "click" }
action = { kind = "noOp" }

[[mappings]]
id = "middle"
trigger = { button = 2, clickType = "hold", modifiers = 3 }
action = { kind = "systemHotkey", id = 32 }
"#;
        let snapshot = PersistedConfig::from_toml(toml).unwrap().into_snapshot().unwrap();
        assert_eq!(snapshot.mappings.len(), 1);
        let middle = snapshot.mappings.get("middle").unwrap();
        assert_eq!(middle.trigger.modifiers, ModifierSet::SHIFT | ModifierSet::CONTROL);
        assert_eq!(middle.trigger.kind, ClickKind::Hold);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let toml = r#"
[[mappings]]
id = "dup"
trigger = { button = 3, clickType = "click" }
action = { kind = "systemHotkey", id = 1 }

[[mappings]]
id = "dup"
trigger = { button = 4, clickType = "click" }
action = { kind = "systemHotkey", id = 2 }
"#;
        let snapshot = PersistedConfig::from_toml(toml).unwrap().into_snapshot().unwrap();
        assert_eq!(snapshot.mappings.len(), 1);
        assert_eq!(
            snapshot.mappings.get("dup").unwrap().action,
            Action::SystemHotkey { id: 1 }
        );
    }

    #[test]
    fn test_unknown_modifier_bits_dropped() {
        let toml = r#"
[[mappings]]
id = "m"
trigger = { button = 5, clickType = "doubleClick", modifiers = 0xF8 }
action = { kind = "noOp" }
"#;
        let snapshot = PersistedConfig::from_toml(toml).unwrap().into_snapshot().unwrap();
        assert_eq!(
            snapshot.mappings.get("m").unwrap().trigger.modifiers,
            ModifierSet::COMMAND
        );
    }

    #[test]
    fn test_newer_version_rejected() {
        let config = PersistedConfig::from_toml("version = 2\nisEnabled = true\n").unwrap();
        assert!(matches!(
            config.into_snapshot(),
            Err(ConfigError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot = PersistedConfig::from_toml("").unwrap().into_snapshot().unwrap();
        assert!(snapshot.enabled);
        assert!(snapshot.mappings.is_empty());
    }

    #[test]
    fn test_unknown_action_kind_is_parse_error() {
        let toml = r#"
[[mappings]]
id = "x"
trigger = { button = 3, clickType = "click" }
action = { kind = "teleport" }
"#;
        assert!(matches!(
            PersistedConfig::from_toml(toml),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_snapshot_survives_toml_round_trip() {
        let mut mappings = MappingList::new();
        mappings.push(Mapping::new(
            "run",
            Trigger::new(Button::Middle, ClickKind::Hold, ModifierSet::OPTION),
            Action::RunCommand {
                command: "notify-send 'held'".to_string(),
            },
        ));
        mappings.push(
            Mapping::new(
                "keys",
                Trigger::plain(Button::Auxiliary(6), ClickKind::DoubleClick),
                Action::KeySequence {
                    key_code: 30,
                    modifiers: ModifierSet::CONTROL,
                },
            )
            .with_enabled(false),
        );
        mappings.push(Mapping::new(
            "nothing",
            Trigger::plain(Button::Auxiliary(7), ClickKind::Click),
            Action::NoOp,
        ));
        let snapshot = ConfigSnapshot {
            mappings,
            enabled: false,
        };

        let text = PersistedConfig::from_snapshot(&snapshot).to_toml().unwrap();
        let restored = PersistedConfig::from_toml(&text).unwrap().into_snapshot().unwrap();
        assert_eq!(restored, snapshot);
    }
}
