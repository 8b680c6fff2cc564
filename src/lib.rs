//! keyglyph - live terminal key-press visualizer
//!
//! Reads every keyboard on the machine through evdev and keeps a single
//! line of the most recent key presses on screen, newest on the right,
//! with modifier chords and repeat counts folded in.

pub mod config;
pub mod keyboard;
pub mod ui;

pub use config::Config;
