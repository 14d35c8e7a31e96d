// Clickmap File Config Store
// TOML mapping file with atomic saves and modification-time watching

use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use super::persisted::PersistedConfig;
use super::store::{ChangeListener, ConfigSnapshot, ConfigStore, ListenerSet, Subscription};
use super::ConfigError;

/// Default interval between modification-time checks
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 500;

/// What the watcher compares between polls. `None` means the file is missing.
type Fingerprint = Option<(SystemTime, u64)>;

fn fingerprint(path: &Path) -> Fingerprint {
    let metadata = fs::metadata(path).ok()?;
    Some((metadata.modified().ok()?, metadata.len()))
}

struct Watcher {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Watcher {
    /// Watch `path`, notifying whenever it differs from `baseline`
    fn spawn(
        path: PathBuf,
        interval: Duration,
        baseline: Fingerprint,
        listeners: ListenerSet,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("clickmap-config-watch".to_string())
            .spawn(move || {
                let mut last = baseline;
                while !stop_flag.load(Ordering::Acquire) {
                    thread::park_timeout(interval);
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    let current = fingerprint(&path);
                    if current != last {
                        log::debug!("{} changed", path.display());
                        last = current;
                        listeners.notify();
                    }
                }
            })?;
        Ok(Self { stop, handle })
    }

    fn shutdown(self) {
        self.stop.store(true, Ordering::Release);
        self.handle.thread().unpark();
        // The last store handle can be released by a listener on the watcher itself
        if self.handle.thread().id() == thread::current().id() {
            return;
        }
        if self.handle.join().is_err() {
            log::warn!("config watcher panicked");
        }
    }
}

/// Mapping configuration stored as a TOML file.
///
/// The watcher thread starts with the first subscription and stops when
/// the store is dropped.
pub struct FileConfigStore {
    path: PathBuf,
    watch_interval: Duration,
    listeners: ListenerSet,
    watcher: Mutex<Option<Watcher>>,
    /// File state seen by the most recent `load`
    loaded: Mutex<Option<Fingerprint>>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            watch_interval: Duration::from_millis(DEFAULT_WATCH_INTERVAL_MS),
            listeners: ListenerSet::new(),
            watcher: Mutex::new(None),
            loaded: Mutex::new(None),
        }
    }

    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = interval;
        self
    }

    /// Default mapping file (~/.config/clickmap/mappings.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("clickmap").join("mappings.toml"))
    }

    /// Store at the default path
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::default_path().map(Self::new).ok_or(ConfigError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `snapshot` via a temporary file and rename
    pub fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), ConfigError> {
        let content = PersistedConfig::from_snapshot(snapshot).to_toml()?;
        self.write_atomic(&content)
    }

    /// Write raw content via a temporary file and rename
    pub fn write_atomic(&self, content: &str) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("wrote {}", self.path.display());
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<ConfigSnapshot, ConfigError> {
        // Taken before reading, so a write racing the read still differs
        *self.loaded.lock() = Some(fingerprint(&self.path));
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }
        let content = fs::read_to_string(&self.path)?;
        PersistedConfig::from_toml(&content)?.into_snapshot()
    }

    fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, ConfigError> {
        let subscription = self.listeners.add(listener);
        let mut watcher = self.watcher.lock();
        if watcher.is_none() {
            let loaded = *self.loaded.lock();
            let baseline = loaded.unwrap_or_else(|| fingerprint(&self.path));
            *watcher = Some(Watcher::spawn(
                self.path.clone(),
                self.watch_interval,
                baseline,
                self.listeners.clone(),
            )?);
            log::debug!(
                "watching {} every {:?}",
                self.path.display(),
                self.watch_interval
            );
        }
        Ok(subscription)
    }
}

impl Drop for FileConfigStore {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.lock().take() {
            watcher.shutdown();
        }
    }
}
