//! Keyboard event types

use super::{KeyCode, ModifierSet};
use std::sync::Arc;
use std::time::Instant;

/// What happened to the key, as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Key was released
    Release,
    /// Key was pressed down
    Press,
    /// Kernel autorepeat while held
    Repeat,
}

impl KeyAction {
    /// Map an evdev event value (0 release, 1 press, 2 repeat)
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Release),
            1 => Some(Self::Press),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }

    pub fn is_down(&self) -> bool {
        !matches!(self, Self::Release)
    }
}

/// One key event as read from a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeyEvent {
    /// The key code
    pub code: KeyCode,
    /// Symbolic name from the driver (e.g. `KEY_A`)
    pub name: String,
    /// Raw event value
    pub value: i32,
}

impl RawKeyEvent {
    pub fn new(code: impl Into<KeyCode>, name: impl Into<String>, value: i32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            value,
        }
    }

    pub fn action(&self) -> Option<KeyAction> {
        KeyAction::from_value(self.value)
    }
}

/// A device event on its way to the dispatcher
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// Label of the keyboard it came from
    pub device: Arc<str>,
    /// The raw event
    pub raw: RawKeyEvent,
    /// Modifiers held on that keyboard when the event was read
    pub held: ModifierSet,
    /// When the event was read
    pub timestamp: Instant,
}

impl KeyEvent {
    pub fn new(device: Arc<str>, raw: RawKeyEvent, held: ModifierSet) -> Self {
        Self {
            device,
            raw,
            held,
            timestamp: Instant::now(),
        }
    }
}
