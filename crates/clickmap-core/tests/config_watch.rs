// Clickmap Config Watch Tests
//
// File store + reloader against a real temporary directory.
//
// Run with: cargo test --test config_watch

use std::sync::Arc;
use std::time::{Duration, Instant};

use clickmap_core::config::default_config_content;
use clickmap_core::{
    Action, Button, ClickKind, ConfigReloader, ConfigStore, DispatchTable, FileConfigStore,
    SwipeDirection, Trigger,
};

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}

const RUN_COMMAND_CONFIG: &str = r#"
version = 1
isEnabled = true

[[mappings]]
id = "terminal"
isEnabled = true
trigger = { button = 3, clickType = "click", modifiers = 0 }
action = { kind = "runCommand", command = "x-terminal-emulator" }
"#;

#[test]
fn test_watcher_picks_up_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mappings.toml");
    let store = Arc::new(
        FileConfigStore::new(&path).with_watch_interval(Duration::from_millis(20)),
    );
    store.write_atomic(default_config_content()).unwrap();

    let table = Arc::new(DispatchTable::default());
    let _reloader = ConfigReloader::attach(store.clone(), Arc::clone(&table)).unwrap();

    let trigger = Trigger::plain(Button::Auxiliary(3), ClickKind::Click);
    assert_eq!(
        table.lookup(&trigger).unwrap().action,
        Action::SwipeNavigate {
            direction: SwipeDirection::Back
        }
    );

    store.write_atomic(RUN_COMMAND_CONFIG).unwrap();
    assert!(wait_for(|| {
        table.lookup(&trigger).map(|m| m.action)
            == Some(Action::RunCommand {
                command: "x-terminal-emulator".to_string(),
            })
    }));
    assert!(table.lookup(&Trigger::plain(Button::Auxiliary(4), ClickKind::Click)).is_none());
}

#[test]
fn test_broken_edit_keeps_previous_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mappings.toml");
    let store = Arc::new(
        FileConfigStore::new(&path).with_watch_interval(Duration::from_millis(20)),
    );
    store.write_atomic(RUN_COMMAND_CONFIG).unwrap();

    let table = Arc::new(DispatchTable::default());
    let reloader = ConfigReloader::attach(store.clone(), Arc::clone(&table)).unwrap();
    let generation = table.generation();

    store.write_atomic("[[mappings]]\nid = ").unwrap();
    assert!(store.load().is_err());
    std::thread::sleep(Duration::from_millis(200));

    assert_eq!(table.generation(), generation);
    assert!(table.is_enabled());
    assert_eq!(table.snapshot().mappings().len(), 1);
    assert!(reloader.reload().is_err());
}

#[test]
fn test_missing_file_starts_disabled_then_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("later.toml");
    let store = Arc::new(
        FileConfigStore::new(&path).with_watch_interval(Duration::from_millis(20)),
    );

    let table = Arc::new(DispatchTable::default());
    let _reloader = ConfigReloader::attach(store.clone(), Arc::clone(&table)).unwrap();
    assert!(!table.is_enabled());

    store.write_atomic(default_config_content()).unwrap();
    assert!(wait_for(|| table.is_enabled()));
    assert_eq!(table.snapshot().mappings().len(), 2);
}
