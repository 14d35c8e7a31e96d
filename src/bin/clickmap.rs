// Clickmap CLI
// Daemon that grabs pointer devices and remaps extra mouse buttons

#![cfg_attr(not(feature = "pure-rust"), allow(dead_code))]

#[cfg(feature = "pure-rust")]
use std::path::{Path, PathBuf};
#[cfg(feature = "pure-rust")]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(feature = "pure-rust")]
use std::sync::Arc;
#[cfg(feature = "pure-rust")]
use std::time::Duration;

#[cfg(feature = "pure-rust")]
use anyhow::{bail, Context};
#[cfg(feature = "pure-rust")]
use clap::Parser;
#[cfg(feature = "pure-rust")]
use evdev::{EventType, InputEvent};

#[cfg(feature = "pure-rust")]
use clickmap_core::classify::{DEFAULT_DOUBLE_CLICK_MS, DEFAULT_HOLD_MS};
#[cfg(feature = "pure-rust")]
use clickmap_core::config::{default_config_content, DEFAULT_WATCH_INTERVAL_MS};
#[cfg(feature = "pure-rust")]
use clickmap_core::event::{raw_button_event, EventSource};
#[cfg(feature = "pure-rust")]
use clickmap_core::input::button_code;
#[cfg(feature = "pure-rust")]
use clickmap_core::{
    ClassifierConfig, ConfigReloader, ConfigStore, DispatchTable, EffectorQueue, Engine,
    FileConfigStore, RawEvent, Timestamp, UInputEffector, Verdict, VirtualPointer,
};

/// Longest poll wait, so shutdown and reload requests are noticed promptly
#[cfg(feature = "pure-rust")]
const IDLE_POLL_MS: i32 = 100;

/// Remap extra mouse buttons to actions
#[cfg(feature = "pure-rust")]
#[derive(Parser, Debug)]
#[command(name = "clickmap")]
#[command(author = "clickmap contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mouse button click/double-click/hold remapper", long_about = None)]
struct Args {
    /// TOML mapping file (default: ~/.config/clickmap/mappings.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Pointer devices to grab, by name or path (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// List available input devices
    #[arg(long)]
    list_devices: bool,

    /// Write the default mapping file and exit
    #[arg(long)]
    init_config: bool,

    /// Press duration that counts as a hold
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_HOLD_MS)]
    hold_ms: u64,

    /// Maximum gap between clicks of a double click
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DOUBLE_CLICK_MS)]
    double_click_ms: u64,

    /// How often the mapping file is checked for changes
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_WATCH_INTERVAL_MS)]
    watch_interval_ms: u64,
}

#[cfg(feature = "pure-rust")]
impl Args {
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => FileConfigStore::default_path().context("no config directory; pass --config"),
        }
    }

    fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::from_millis(self.double_click_ms, self.hold_ms)
    }
}

/// Poll timeout that wakes up in time for the next hold-check
#[cfg(feature = "pure-rust")]
fn poll_timeout(deadline: Option<Timestamp>, now: Timestamp) -> i32 {
    let Some(deadline) = deadline else {
        return IDLE_POLL_MS;
    };
    let wait_ms = deadline.saturating_since(now).as_micros().div_ceil(1000);
    wait_ms.min(IDLE_POLL_MS as u128) as i32
}

/// evdev event for a replacement verdict
#[cfg(feature = "pure-rust")]
fn replacement_event(raw: &RawEvent) -> Option<InputEvent> {
    let code = raw.button().and_then(button_code)?;
    Some(InputEvent::new(EventType::KEY, code, i32::from(raw.is_down())))
}

#[cfg(feature = "pure-rust")]
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

#[cfg(feature = "pure-rust")]
fn list_devices() -> anyhow::Result<()> {
    let devices = EventSource::list_devices()?;
    println!("Found {} input device(s):", devices.len());
    for device in &devices {
        let role = match (device.is_pointer, device.is_keyboard) {
            (true, _) => "pointer",
            (false, true) => "keyboard",
            _ => "other",
        };
        match &device.path {
            Some(path) => println!("  {}: {} ({}) [{}]", device.index, device.name, path, role),
            None => println!("  {}: {} [{}]", device.index, device.name, role),
        }
    }
    Ok(())
}

#[cfg(feature = "pure-rust")]
fn init_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("{} already exists, not overwriting", path.display());
    }
    FileConfigStore::new(path).write_atomic(default_config_content())?;
    println!("Wrote default mappings to {}", path.display());
    Ok(())
}

#[cfg(feature = "pure-rust")]
fn check_config(path: &Path) -> anyhow::Result<()> {
    let snapshot = FileConfigStore::new(path)
        .load()
        .with_context(|| format!("loading {}", path.display()))?;
    println!(
        "Configuration is valid: {} mapping(s), {} enabled, remapping {}",
        snapshot.mappings.len(),
        snapshot.mappings.enabled_count(),
        if snapshot.enabled { "on" } else { "off" }
    );
    Ok(())
}

#[cfg(feature = "pure-rust")]
fn spawn_signal_thread(running: Arc<AtomicBool>, reload: Arc<AtomicBool>) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    std::thread::Builder::new()
        .name("clickmap-signals".to_string())
        .spawn(move || {
            for signal in &mut signals {
                match signal {
                    SIGHUP => {
                        log::info!("received SIGHUP, reloading mappings");
                        reload.store(true, Ordering::SeqCst);
                    }
                    _ => {
                        log::info!("received signal {}, shutting down", signal);
                        running.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

#[cfg(feature = "pure-rust")]
fn run(args: &Args) -> anyhow::Result<()> {
    let config_path = args.config_path()?;
    log::info!("mappings: {}", config_path.display());

    let store = Arc::new(
        FileConfigStore::new(config_path)
            .with_watch_interval(Duration::from_millis(args.watch_interval_ms)),
    );
    let table = Arc::new(DispatchTable::default());
    let reloader = ConfigReloader::attach(store, Arc::clone(&table))?;

    let queue = EffectorQueue::spawn(UInputEffector::new()?)?;
    let mut engine = Engine::new(args.classifier_config(), table, queue);
    let mut pointer = VirtualPointer::new()?;
    let mut source = EventSource::new_with_grab_filtered(&args.devices)?;
    log::info!("grabbed {} pointer(s): {:?}", source.device_count(), source.device_names());

    let running = Arc::new(AtomicBool::new(true));
    let reload_requested = Arc::new(AtomicBool::new(false));
    spawn_signal_thread(Arc::clone(&running), Arc::clone(&reload_requested))?;

    log::info!("clickmap is running. Press Ctrl+C to exit.");
    while running.load(Ordering::SeqCst) {
        if reload_requested.swap(false, Ordering::SeqCst) {
            match reloader.reload() {
                Ok(generation) => log::debug!("mappings at generation {}", generation),
                Err(e) => log::debug!("SIGHUP reload kept previous mappings: {}", e),
            }
        }

        let timeout = poll_timeout(engine.next_deadline(), Timestamp::now());
        let batches = source.poll(timeout)?;

        if !batches.is_empty() {
            let modifiers = source.modifier_state();
            for batch in batches {
                let mut forwarded = Vec::with_capacity(batch.events.len());
                for event in batch.events {
                    let Some(raw) = raw_button_event(&event, modifiers) else {
                        forwarded.push(event);
                        continue;
                    };
                    match engine.handle(&raw) {
                        Verdict::Passthrough => forwarded.push(event),
                        Verdict::Suppress => log::trace!("suppressed {}", raw),
                        Verdict::Replace(replacement) => {
                            forwarded.extend(replacement_event(&replacement))
                        }
                    }
                }
                if let Err(e) = pointer.forward(&forwarded) {
                    log::warn!("failed to forward pointer events: {}", e);
                }
            }
        }

        engine.advance_to(Timestamp::now());
    }

    log::info!("stopped");
    Ok(())
}

#[cfg(feature = "pure-rust")]
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_devices {
        return list_devices();
    }
    if args.init_config {
        return init_config(&args.config_path()?);
    }
    if args.check_config {
        return check_config(&args.config_path()?);
    }

    run(&args)
}

// Stub for when pure-rust feature is not enabled
#[cfg(not(feature = "pure-rust"))]
fn main() {
    eprintln!("Error: clickmap binary requires the 'pure-rust' feature to be enabled.");
    eprintln!("Please build with: cargo build --release --features pure-rust --bin clickmap");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "pure-rust")]
    fn test_args_parsing() {
        let args = Args::parse_from(["clickmap", "--config", "/tmp/mappings.toml"]);

        assert_eq!(args.config, Some(PathBuf::from("/tmp/mappings.toml")));
        assert!(args.devices.is_empty());
        assert!(!args.verbose);
        assert!(!args.check_config);
        assert!(!args.list_devices);
        assert!(!args.init_config);
        assert_eq!(args.hold_ms, 300);
        assert_eq!(args.double_click_ms, 300);
        assert_eq!(args.watch_interval_ms, 500);
    }

    #[test]
    #[cfg(feature = "pure-rust")]
    fn test_args_with_options() {
        let args = Args::parse_from([
            "clickmap",
            "--verbose",
            "--devices",
            "/dev/input/event3",
            "--devices",
            "Logitech MX Master 3",
            "--hold-ms",
            "450",
            "--double-click-ms",
            "250",
        ]);

        assert!(args.verbose);
        assert_eq!(args.devices, vec!["/dev/input/event3", "Logitech MX Master 3"]);
        let config = args.classifier_config();
        assert_eq!(config.hold_threshold, Duration::from_millis(450));
        assert_eq!(config.double_click_window, Duration::from_millis(250));
    }

    #[test]
    #[cfg(feature = "pure-rust")]
    fn test_args_check_config() {
        let args = Args::parse_from(["clickmap", "--config", "/tmp/m.toml", "--check-config"]);
        assert!(args.check_config);
        assert_eq!(args.config_path().unwrap(), PathBuf::from("/tmp/m.toml"));
    }

    #[test]
    #[cfg(feature = "pure-rust")]
    fn test_poll_timeout_tracks_deadline() {
        let now = Timestamp::from_millis(1_000);
        assert_eq!(poll_timeout(None, now), IDLE_POLL_MS);
        assert_eq!(poll_timeout(Some(Timestamp::from_millis(1_042)), now), 42);
        assert_eq!(poll_timeout(Some(Timestamp::from_millis(900)), now), 0);
        assert_eq!(poll_timeout(Some(Timestamp::from_millis(5_000)), now), IDLE_POLL_MS);
        // Partial milliseconds round up so the wake-up is never early
        let now = Timestamp::from_duration(Duration::from_micros(1_000_500));
        assert_eq!(poll_timeout(Some(Timestamp::from_millis(1_002)), now), 2);
    }

    #[test]
    #[cfg(feature = "pure-rust")]
    fn test_init_then_check_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.toml");
        init_config(&path).unwrap();
        assert!(init_config(&path).is_err());
        check_config(&path).unwrap();
    }
}
