// Clickmap uinput Output Layer
// Virtual pointer for passthrough traffic and the uinput action effector

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};

use super::hotkeys::{system_hotkey_chord, Chord, KEY_BACK, KEY_FORWARD};
use super::process::{launch_command, shell_command, spawn_detached};
use super::{ActionEffector, EffectorError};
use crate::input::{button_code, BTN_LAST, BTN_LEFT};
use crate::{Action, ModifierSet, SwipeDirection};

/// Every virtual device clickmap creates carries this prefix in its name.
pub const VIRTUAL_DEVICE_PREFIX: &str = "Clickmap (virtual)";

const POINTER_AXES: &[RelativeAxisType] = &[
    RelativeAxisType::REL_X,
    RelativeAxisType::REL_Y,
    RelativeAxisType::REL_WHEEL,
    RelativeAxisType::REL_HWHEEL,
    RelativeAxisType::REL_WHEEL_HI_RES,
    RelativeAxisType::REL_HWHEEL_HI_RES,
];

fn device_error(e: std::io::Error) -> EffectorError {
    EffectorError::Device(e.to_string())
}

fn pointer_builder(name: &str) -> Result<VirtualDeviceBuilder<'_>, EffectorError> {
    let mut buttons = AttributeSet::<Key>::new();
    for code in BTN_LEFT..=BTN_LAST {
        buttons.insert(Key::new(code));
    }
    let mut axes = AttributeSet::<RelativeAxisType>::new();
    for axis in POINTER_AXES {
        axes.insert(*axis);
    }

    VirtualDeviceBuilder::new()
        .map_err(device_error)?
        .name(name)
        .with_keys(&buttons)
        .map_err(device_error)?
        .with_relative_axes(&axes)
        .map_err(device_error)
}

/// Virtual pointer that re-emits events from grabbed devices.
///
/// Grabbing a pointer takes all of its traffic, so everything that is not
/// suppressed has to be written back out here.
pub struct VirtualPointer {
    device: VirtualDevice,
}

impl VirtualPointer {
    pub fn new() -> Result<Self, EffectorError> {
        let name = format!("{} Pointer", VIRTUAL_DEVICE_PREFIX);
        let device = pointer_builder(&name)?.build().map_err(device_error)?;
        log::debug!("created virtual pointer '{}'", name);
        Ok(Self { device })
    }

    /// Forward one batch of raw events (the SYN_REPORT is appended by evdev)
    pub fn forward(&mut self, events: &[InputEvent]) -> Result<(), EffectorError> {
        let forwarded: Vec<InputEvent> = events
            .iter()
            .filter(|event| event.event_type() != EventType::SYNCHRONIZATION)
            .copied()
            .collect();
        if forwarded.is_empty() {
            return Ok(());
        }
        self.device.emit(&forwarded).map_err(device_error)
    }
}

/// Action effector backed by a virtual keyboard and pointer
pub struct UInputEffector {
    device: VirtualDevice,
}

impl UInputEffector {
    pub fn new() -> Result<Self, EffectorError> {
        let name = format!("{} Effector", VIRTUAL_DEVICE_PREFIX);

        // Standard keyboard keys (0-255) for key sequences and hotkeys
        let mut keys = AttributeSet::<Key>::new();
        for code in 0..256u16 {
            keys.insert(Key::new(code));
        }
        for code in BTN_LEFT..=BTN_LAST {
            keys.insert(Key::new(code));
        }

        let device = pointer_builder(&name)?
            .with_keys(&keys)
            .map_err(device_error)?
            .build()
            .map_err(device_error)?;
        log::debug!("created virtual effector '{}'", name);
        Ok(Self { device })
    }

    fn write_key(&mut self, code: u16, pressed: bool) -> Result<(), EffectorError> {
        let event = InputEvent::new(EventType::KEY, code, i32::from(pressed));
        self.device.emit(&[event]).map_err(device_error)
    }

    fn tap(&mut self, code: u16) -> Result<(), EffectorError> {
        self.write_key(code, true)?;
        self.write_key(code, false)
    }

    /// Press modifiers, tap the key, release modifiers in reverse order
    fn send_chord(&mut self, key_code: u16, modifiers: ModifierSet) -> Result<(), EffectorError> {
        let held = modifiers.key_codes();
        for code in &held {
            self.write_key(*code, true)?;
        }
        let tapped = self.tap(key_code);
        for code in held.iter().rev() {
            self.write_key(*code, false)?;
        }
        tapped
    }
}

impl ActionEffector for UInputEffector {
    fn execute(&mut self, action: &Action) -> Result<(), EffectorError> {
        log::debug!("executing {}", action);
        match action {
            Action::SystemHotkey { id } => {
                let Chord {
                    key_code,
                    modifiers,
                } = system_hotkey_chord(*id).ok_or(EffectorError::UnsupportedHotkey(*id))?;
                self.send_chord(key_code, modifiers)
            }
            Action::KeySequence {
                key_code,
                modifiers,
            } => self.send_chord(*key_code, *modifiers),
            Action::SimulateClick { button } => {
                let code = button_code(*button)
                    .ok_or_else(|| EffectorError::UnsupportedButton(button.to_string()))?;
                self.tap(code)
            }
            Action::SwipeNavigate { direction } => match direction {
                SwipeDirection::Back => self.tap(KEY_BACK),
                SwipeDirection::Forward => self.tap(KEY_FORWARD),
            },
            Action::LaunchApp { identifier } => {
                spawn_detached(launch_command(identifier), identifier)
            }
            Action::RunCommand { command } => spawn_detached(shell_command(command), command),
            Action::NoOp => Ok(()),
        }
    }
}
