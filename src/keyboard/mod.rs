//! Keyboard event decoding and device listeners

mod decoder;
mod event;
pub mod keymap;
mod modifier;
mod source;

#[cfg(target_os = "linux")]
pub mod evdev_listener;

pub use decoder::{DecoderOptions, EventDecoder};
pub use event::{KeyAction, KeyEvent, RawKeyEvent};
pub use keymap::{parse_key_code, shift_transform, KeyCode, Lookup, SymbolTable};
pub use modifier::{ModifierKind, ModifierSet, ModifierTracker};
pub use source::{listen, spawn_listener, KeySource, SourceError};

#[cfg(target_os = "linux")]
pub use evdev_listener::{
    find_keyboards, key_code, keyboard_status, running_as_root, EvdevKeyboard, KeyboardInfo,
};
