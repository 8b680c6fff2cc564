//! evdev keyboard discovery and reading for Linux
//!
//! Keyboards are the event devices that advertise `KEY_ESC`. Devices we
//! cannot open (usually for lack of permission) are silently skipped.

use super::{KeyCode, KeySource, ModifierKind, ModifierSet, RawKeyEvent};
use evdev::{Device, InputEventKind, Key};
use log::info;
use std::io;
use std::path::{Path, PathBuf};

/// A keyboard found during discovery
#[derive(Debug, Clone)]
pub struct KeyboardInfo {
    /// Device node, e.g. `/dev/input/event3`
    pub path: PathBuf,
    /// Name reported by the driver
    pub name: String,
}

impl KeyboardInfo {
    /// Label used in logs and events
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.path.display())
    }
}

/// Find all keyboard-capable input devices we are allowed to open
pub fn find_keyboards() -> Vec<KeyboardInfo> {
    let keyboards: Vec<KeyboardInfo> = evdev::enumerate()
        .filter(|(_, device)| is_keyboard(device))
        .map(|(path, device)| KeyboardInfo {
            name: device.name().unwrap_or("unknown").to_string(),
            path,
        })
        .collect();

    for keyboard in &keyboards {
        info!("found keyboard {}", keyboard.label());
    }
    keyboards
}

/// Whether the process runs with an effective uid of root; input devices
/// are usually readable by root only
pub fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// A keyboard has at least an Escape key
fn is_keyboard(device: &Device) -> bool {
    device
        .supported_keys()
        .is_some_and(|keys| keys.contains(Key::KEY_ESC))
}

/// Symbolic name of a key as the kernel headers spell it
fn key_name(key: Key) -> String {
    format!("{:?}", key)
}

/// Highest key code the kernel defines (`KEY_MAX`)
const KEY_MAX: u16 = 0x2ff;

/// Scancode for a kernel key name such as `KEY_KP8` or `BTN_LEFT`
pub fn key_code(name: &str) -> Option<KeyCode> {
    (0..=KEY_MAX)
        .map(Key::new)
        .find(|key| key_name(*key) == name)
        .map(|key| KeyCode(key.code()))
}

/// An opened evdev keyboard
pub struct EvdevKeyboard {
    device: Device,
}

impl EvdevKeyboard {
    pub fn open(path: &Path) -> io::Result<Self> {
        let device = Device::open(path)?;
        Ok(Self { device })
    }
}

impl KeySource for EvdevKeyboard {
    fn read_batch(&mut self) -> io::Result<Vec<RawKeyEvent>> {
        let events = self.device.fetch_events()?;
        Ok(events
            .filter_map(|event| match event.kind() {
                InputEventKind::Key(key) => {
                    Some(RawKeyEvent::new(key.code(), key_name(key), event.value()))
                }
                _ => None,
            })
            .collect())
    }

    fn held_modifiers(&self) -> io::Result<ModifierSet> {
        let state = self.device.get_key_state()?;
        Ok(state
            .iter()
            .filter_map(|key| ModifierKind::from_code(KeyCode(key.code())))
            .collect())
    }
}

/// Get a status message about keyboard availability
pub fn keyboard_status(found: usize) -> String {
    if found == 0 {
        "No keyboards found".to_string()
    } else {
        format!("{} keyboard device(s) found", found)
    }
}
