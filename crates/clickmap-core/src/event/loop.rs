// Clickmap Pointer Event Source
// Direct evdev access to pointer devices: grabbing, polling and modifier state

use std::os::unix::io::AsRawFd;

use evdev::{Device, EventType, InputEvent, Key};

use crate::input::{
    button_index_from_code, is_keyboard, is_pointer, is_virtual_device, matches_device_filter,
    DeviceCapabilities, RawEvent, Transition,
};
use crate::output::VIRTUAL_DEVICE_PREFIX;
use crate::{ModifierSet, Timestamp};

/// Result type for event source operations
pub type EventSourceResult<T> = Result<T, EventSourceError>;

/// Errors that can occur in the event source
#[derive(Debug, thiserror::Error)]
pub enum EventSourceError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Device information for listing devices
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub path: Option<String>,
    pub is_pointer: bool,
    pub is_keyboard: bool,
}

/// All events read from one device in one poll
#[derive(Debug, Clone)]
pub struct PolledBatch {
    /// Index of the source device
    pub device: usize,
    pub events: Vec<InputEvent>,
}

/// Convert an evdev event into a raw button transition.
///
/// Returns `None` for anything that is not a press or release of a mouse
/// button code (motion, wheel, SYN, key repeats).
pub fn raw_button_event(event: &InputEvent, modifiers: ModifierSet) -> Option<RawEvent> {
    if event.event_type() != EventType::KEY {
        return None;
    }
    let button_index = button_index_from_code(event.code())?;
    let transition = Transition::from_key_value(event.value())?;
    Some(RawEvent {
        button_index,
        transition,
        modifiers,
        timestamp: Timestamp::from(event.timestamp()),
    })
}

fn capabilities(device: &Device) -> DeviceCapabilities {
    let has_ev_key = device.supported_events().contains(EventType::KEY);
    let has_rel_x = device
        .supported_relative_axes()
        .map(|axes| axes.contains(evdev::RelativeAxisType::REL_X))
        .unwrap_or(false);
    let supported_keys = device
        .supported_keys()
        .map(|keys| keys.iter().map(|key| key.code()).collect())
        .unwrap_or_default();
    DeviceCapabilities::new(has_ev_key, has_rel_x, supported_keys)
}

/// Grabbed pointer devices plus the keyboards consulted for modifier state.
///
/// Pointers are grabbed exclusively so suppressed events never reach the
/// desktop. Keyboards are opened read-only and never grabbed.
pub struct EventSource {
    pointers: Vec<Device>,
    keyboards: Vec<Device>,
    poll_fds: Vec<libc::pollfd>,
    grabbed: bool,
}

impl EventSource {
    /// Open and grab pointers that match `filter_names` (empty autodetects).
    pub fn new_with_grab_filtered(filter_names: &[String]) -> EventSourceResult<Self> {
        let mut pointers = Vec::new();
        let mut keyboards = Vec::new();

        for (path, device) in evdev::enumerate() {
            let device_name = device.name().unwrap_or("Unknown").to_string();
            let device_path = path.to_str().unwrap_or_default().to_string();
            let caps = capabilities(&device);
            let is_virtual = is_virtual_device(&device_name, VIRTUAL_DEVICE_PREFIX);

            if is_virtual {
                continue;
            }
            if matches_device_filter(
                &device_name,
                &device_path,
                filter_names,
                is_pointer(&caps),
                is_virtual,
            ) {
                log::info!("using pointer {} ({})", device_name, device_path);
                pointers.push(device);
            } else if is_keyboard(&caps) {
                log::debug!("watching modifiers on {} ({})", device_name, device_path);
                keyboards.push(device);
            }
        }

        if pointers.is_empty() {
            return Err(EventSourceError::DeviceNotFound(
                "No pointer devices found".to_string(),
            ));
        }

        // A previous instance may have crashed while holding the grab
        for device in &mut pointers {
            let _ = device.ungrab();
        }
        for device in &mut pointers {
            device.grab()?;
        }

        let poll_fds = pointers
            .iter()
            .map(|d| libc::pollfd {
                fd: d.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();

        Ok(Self {
            pointers,
            keyboards,
            poll_fds,
            grabbed: true,
        })
    }

    /// List input devices with their detected role
    pub fn list_devices() -> EventSourceResult<Vec<DeviceInfo>> {
        let devices_info: Vec<DeviceInfo> = evdev::enumerate()
            .enumerate()
            .map(|(index, (path, device))| {
                let caps = capabilities(&device);
                DeviceInfo {
                    index,
                    name: device.name().unwrap_or("Unknown").to_string(),
                    path: path.to_str().map(|s| s.to_string()),
                    is_pointer: is_pointer(&caps),
                    is_keyboard: is_keyboard(&caps),
                }
            })
            .collect();

        if devices_info.is_empty() {
            return Err(EventSourceError::DeviceNotFound(
                "No input devices found".to_string(),
            ));
        }
        Ok(devices_info)
    }

    /// Ungrab all pointers (called on shutdown)
    pub fn ungrab_all(&mut self) {
        if self.grabbed {
            for device in &mut self.pointers {
                let _ = device.ungrab();
            }
            self.grabbed = false;
        }
    }

    /// Modifiers currently held on any watched keyboard
    pub fn modifier_state(&self) -> ModifierSet {
        let held = self
            .keyboards
            .iter()
            .filter_map(|kbd| kbd.get_key_state().ok())
            .flat_map(|keys| keys.iter().map(|key: Key| key.code()).collect::<Vec<_>>());
        ModifierSet::from_held_keys(held)
    }

    /// Poll the grabbed pointers.
    ///
    /// `timeout_ms` follows poll(2): 0 returns immediately, -1 waits forever.
    /// Timeout and EINTR both return no batches.
    pub fn poll(&mut self, timeout_ms: i32) -> EventSourceResult<Vec<PolledBatch>> {
        let mut batches = Vec::new();

        let poll_result = unsafe {
            libc::poll(
                self.poll_fds.as_mut_ptr(),
                self.poll_fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };

        if poll_result < 0 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                return Ok(batches);
            }
            return Err(EventSourceError::Io(err));
        }
        if poll_result == 0 {
            return Ok(batches);
        }

        for (index, device) in self.pointers.iter_mut().enumerate() {
            if self.poll_fds[index].revents & libc::POLLIN == 0 {
                continue;
            }
            let fetched = device.fetch_events().map(|events| events.collect::<Vec<_>>());
            match fetched {
                Ok(events) => batches.push(PolledBatch {
                    device: index,
                    events,
                }),
                Err(e) => log::warn!("read from {} failed: {}", device.name().unwrap_or("?"), e),
            }
        }

        Ok(batches)
    }

    pub fn device_names(&self) -> Vec<String> {
        self.pointers
            .iter()
            .map(|d| d.name().unwrap_or("Unknown").to_string())
            .collect()
    }

    pub fn device_count(&self) -> usize {
        self.pointers.len()
    }
}

/// Pointers must be ungrabbed on every exit path, or the mouse stays dead.
impl Drop for EventSource {
    fn drop(&mut self) {
        self.ungrab_all();
    }
}
