//! Runtime configuration for keyglyph
//!
//! There is no config file: the effective configuration is built from
//! defaults and command line flags, and can be dumped as TOML with
//! `--print-config`.
//!
//! ## Example
//!
//! ```
//! use keyglyph::Config;
//!
//! let mut config = Config::default();
//! config.add_symbol_spec("58=⇪").unwrap();
//! assert_eq!(config.input.symbols.len(), 1);
//! ```

use crate::keyboard::{parse_key_code, DecoderOptions, KeyCode, SymbolTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Touchpad contact reports that arrive as key events
const TOUCHPAD_BUTTONS: [u16; 4] = [
    0x145, // BTN_TOOL_FINGER
    0x14a, // BTN_TOUCH
    0x14d, // BTN_TOOL_DOUBLETAP
    0x14e, // BTN_TOOL_TRIPLETAP
];

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `CODE=GLYPH` symbol override could not be parsed
    #[error("invalid symbol override `{0}` (expected CODE=GLYPH, e.g. 58=⇪ or KEY_KP8=8)")]
    InvalidSymbol(String),
    /// Neither a scancode number nor a known key name
    #[error("unknown key `{0}` (expected a scancode or a name like KEY_A)")]
    InvalidScancode(String),
    /// Unknown theme name
    #[error("unknown theme `{0}` (expected dark or light)")]
    InvalidTheme(String),
    /// Refresh interval must be positive
    #[error("refresh interval must be at least 1 ms")]
    ZeroRefresh,
    /// Failed to serialize config
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Display settings
    pub display: DisplayConfig,
    /// Input decoding settings
    pub input: InputConfig,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Color theme (dark/light)
    pub theme: Theme,
    /// Render modifiers that are tapped without another key
    pub show_modifier_taps: bool,
    /// Clear the line after this many idle seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_after_secs: Option<u64>,
    /// Idle tick for resize checks and clearing (in milliseconds)
    pub refresh_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            show_modifier_taps: false,
            clear_after_secs: None,
            refresh_ms: 250,
        }
    }
}

/// Input decoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Count kernel autorepeat as key presses
    pub count_autorepeat: bool,
    /// Scancodes that are never shown
    pub ignored_scancodes: Vec<u16>,
    /// Glyph overrides on top of the built-in table
    #[serde(default)]
    pub symbols: Vec<SymbolOverride>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            count_autorepeat: true,
            ignored_scancodes: TOUCHPAD_BUTTONS.to_vec(),
            symbols: Vec::new(),
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(ConfigError::InvalidTheme(s.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

/// A single scancode to glyph override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolOverride {
    pub scancode: u16,
    pub glyph: String,
}

impl FromStr for SymbolOverride {
    type Err = ConfigError;

    /// Parses `CODE=GLYPH`, where CODE is a scancode or a key name; the
    /// glyph may be empty to hide a key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSymbol(s.to_string());
        let (code, glyph) = s.split_once('=').ok_or_else(invalid)?;
        let scancode = parse_scancode(code).map_err(|_| invalid())?;
        Ok(Self {
            scancode,
            glyph: glyph.to_string(),
        })
    }
}

/// Parse a scancode given as a number or a key name such as `BTN_TOUCH`
pub fn parse_scancode(s: &str) -> Result<u16, ConfigError> {
    parse_key_code(s)
        .map(|code| code.as_u16())
        .ok_or_else(|| ConfigError::InvalidScancode(s.to_string()))
}

impl Config {
    /// Parse and add a `CODE=GLYPH` symbol override, replacing any earlier
    /// one for the same scancode
    pub fn add_symbol_spec(&mut self, spec: &str) -> Result<(), ConfigError> {
        let symbol: SymbolOverride = spec.parse()?;
        self.input.symbols.retain(|s| s.scancode != symbol.scancode);
        self.input.symbols.push(symbol);
        Ok(())
    }

    /// Add a scancode to the ignore list
    pub fn ignore_scancode(&mut self, scancode: u16) {
        if !self.input.ignored_scancodes.contains(&scancode) {
            self.input.ignored_scancodes.push(scancode);
        }
    }

    /// Remove a scancode from the ignore list, so it shows up again
    pub fn unignore_scancode(&mut self, scancode: u16) {
        self.input.ignored_scancodes.retain(|&code| code != scancode);
    }

    /// Check values that the type system does not rule out
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.refresh_ms == 0 {
            return Err(ConfigError::ZeroRefresh);
        }
        Ok(())
    }

    /// Get idle tick interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.display.refresh_ms.max(1))
    }

    /// Idle time after which the line is cleared, if enabled
    pub fn clear_after(&self) -> Option<Duration> {
        self.display
            .clear_after_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Built-in symbol table with the configured overrides applied
    pub fn symbol_table(&self) -> SymbolTable {
        let mut table = SymbolTable::new();
        for symbol in &self.input.symbols {
            table.set(KeyCode(symbol.scancode), symbol.glyph.clone());
        }
        table
    }

    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            ignored: self
                .input
                .ignored_scancodes
                .iter()
                .copied()
                .map(KeyCode)
                .collect(),
            count_autorepeat: self.input.count_autorepeat,
            show_modifier_taps: self.display.show_modifier_taps,
        }
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
