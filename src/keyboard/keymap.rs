//! Scancode definitions and the glyph symbol table

use std::collections::HashMap;
use std::sync::LazyLock;

/// Represents a physical key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl From<u16> for KeyCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

pub const KEY_RESERVED: KeyCode = KeyCode(0);
pub const KEY_ESC: KeyCode = KeyCode(1);
pub const KEY_1: KeyCode = KeyCode(2);
pub const KEY_TAB: KeyCode = KeyCode(15);
pub const KEY_Q: KeyCode = KeyCode(16);
pub const KEY_W: KeyCode = KeyCode(17);
pub const KEY_LEFTCTRL: KeyCode = KeyCode(29);
pub const KEY_A: KeyCode = KeyCode(30);
pub const KEY_S: KeyCode = KeyCode(31);
pub const KEY_LEFTSHIFT: KeyCode = KeyCode(42);
pub const KEY_C: KeyCode = KeyCode(46);
pub const KEY_SLASH: KeyCode = KeyCode(53);
pub const KEY_RIGHTSHIFT: KeyCode = KeyCode(54);
pub const KEY_LEFTALT: KeyCode = KeyCode(56);
pub const KEY_CAPSLOCK: KeyCode = KeyCode(58);
pub const KEY_F1: KeyCode = KeyCode(59);
pub const KEY_RIGHTCTRL: KeyCode = KeyCode(97);
pub const KEY_RIGHTALT: KeyCode = KeyCode(100);
pub const KEY_KP8: KeyCode = KeyCode(72);
pub const KEY_KP0: KeyCode = KeyCode(82);
pub const KEY_INSERT: KeyCode = KeyCode(110);
pub const KEY_LEFTMETA: KeyCode = KeyCode(125);
pub const KEY_RIGHTMETA: KeyCode = KeyCode(126);
pub const KEY_F13: KeyCode = KeyCode(183);
pub const KEY_F24: KeyCode = KeyCode(194);
pub const BTN_LEFT: KeyCode = KeyCode(0x110);
pub const BTN_EXTRA: KeyCode = KeyCode(0x114);

/// Default glyphs for the standard US layout. `None` marks keys that never
/// produce a token.
const DEFAULT_SYMBOLS: &[(u16, Option<&str>)] = &[
    (0, None), // KEY_RESERVED
    (1, Some("\u{F1968}")),
    // Number row
    (2, Some("1")),
    (3, Some("2")),
    (4, Some("3")),
    (5, Some("4")),
    (6, Some("5")),
    (7, Some("6")),
    (8, Some("7")),
    (9, Some("8")),
    (10, Some("9")),
    (11, Some("0")),
    (12, Some("-")),
    (13, Some("=")),
    (14, Some("\u{F006E}")),
    (111, Some("\u{F0E7E}")),
    // Top letter row
    (15, Some("↹")),
    (16, Some("Q")),
    (17, Some("W")),
    (18, Some("E")),
    (19, Some("R")),
    (20, Some("T")),
    (21, Some("Y")),
    (22, Some("U")),
    (23, Some("I")),
    (24, Some("O")),
    (25, Some("P")),
    (26, Some("[")),
    (27, Some("]")),
    (28, Some("↲")),
    // Home row
    (30, Some("A")),
    (31, Some("S")),
    (32, Some("D")),
    (33, Some("F")),
    (34, Some("G")),
    (35, Some("H")),
    (36, Some("J")),
    (37, Some("K")),
    (38, Some("L")),
    (39, Some(";")),
    (40, Some("'")),
    (41, Some("`")),
    (43, Some("\\")),
    // Bottom letter row
    (44, Some("Z")),
    (45, Some("X")),
    (46, Some("C")),
    (47, Some("V")),
    (48, Some("B")),
    (49, Some("N")),
    (50, Some("M")),
    (51, Some(",")),
    (52, Some(".")),
    (53, Some("/")),
    // Navigation
    (105, Some("←")),
    (106, Some("→")),
    (103, Some("↑")),
    (108, Some("↓")),
    (57, Some("⋯")),
    (102, Some("⇐")),
    (107, Some("⇒")),
    (104, Some("↥")),
    (109, Some("↧")),
    (110, Some("INS")),
    // Function row
    (59, Some("\u{F0295}1")),
    (60, Some("\u{F0295}2")),
    (61, Some("\u{F0295}3")),
    (62, Some("\u{F0295}4")),
    (63, Some("\u{F0295}5")),
    (64, Some("\u{F0295}6")),
    (65, Some("\u{F0295}7")),
    (66, Some("\u{F0295}8")),
    (67, Some("\u{F0295}9")),
    (68, Some("\u{F0295}10")),
    (87, Some("\u{F0295}11")),
    (88, Some("\u{F0295}12")),
    (183, Some("\u{F0295}13")),
    (184, Some("\u{F0295}14")),
    (185, Some("\u{F0295}15")),
    (186, Some("\u{F0295}16")),
    (187, Some("\u{F0295}17")),
    (188, Some("\u{F0295}18")),
    (189, Some("\u{F0295}19")),
    (190, Some("\u{F0295}20")),
    (191, Some("\u{F0295}21")),
    (192, Some("\u{F0295}22")),
    (193, Some("\u{F0295}23")),
    (194, Some("\u{F0295}24")),
    // Keypad digits
    (82, Some("#0")),
    (79, Some("#1")),
    (80, Some("#2")),
    (81, Some("#3")),
    (75, Some("#4")),
    (76, Some("#5")),
    (77, Some("#6")),
    (71, Some("#7")),
    (72, Some("#8")),
    (73, Some("#9")),
    // Mouse buttons
    (0x110, Some("\u{EB6F}\u{EFBA}")), // BTN_LEFT
    (0x111, Some("\u{EFBA}\u{EB70}")), // BTN_RIGHT
    (0x112, Some("\u{EB8A}\u{EFBA}\u{EB8A}")), // BTN_MIDDLE
    (0x113, Some("\u{EFBA}²")), // BTN_SIDE
    (0x114, Some("\u{EFBA}¹")), // BTN_EXTRA
    // Modifiers
    (125, Some("\u{E00A}")),
    (126, Some("\u{E00A}")),
    (29, Some("▲")),
    (97, Some("▲")),
    (42, Some("⮭")),
    (54, Some("⮭")),
    (56, Some("\u{EAAB}")),
    (100, Some("\u{EAAB}")),
];

/// Shifted form of the base-row printable glyphs
static SHIFT_TRANSFORM: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    let mut map: HashMap<char, char> = ('a'..='z').map(|c| (c, c.to_ascii_uppercase())).collect();
    let pairs = [
        ('`', '~'),
        ('1', '!'),
        ('2', '@'),
        ('3', '#'),
        ('4', '$'),
        ('5', '%'),
        ('6', '^'),
        ('7', '&'),
        ('8', '*'),
        ('9', '('),
        ('0', ')'),
        ('-', '_'),
        ('=', '+'),
        ('[', '{'),
        (']', '}'),
        ('\\', '|'),
        (';', ':'),
        ('\'', '"'),
        (',', '<'),
        ('.', '>'),
        ('/', '?'),
    ];
    map.extend(pairs);
    map
});

/// Returns the shifted form of an unshifted glyph character, if it has one
pub fn shift_transform(c: char) -> Option<char> {
    SHIFT_TRANSFORM.get(&c).copied()
}

/// Parse a scancode given as a number or as a kernel key name.
///
/// Names are matched case-insensitively with `-` and spaces read as `_`,
/// so `kp-8`, `KEY_KP8` and `72` all name the same key. Names only resolve
/// on Linux.
pub fn parse_key_code(s: &str) -> Option<KeyCode> {
    let name = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
    if let Ok(code) = name.parse::<u16>() {
        return Some(KeyCode(code));
    }
    lookup_name(&name)
}

#[cfg(target_os = "linux")]
fn lookup_name(name: &str) -> Option<KeyCode> {
    super::evdev_listener::key_code(name)
}

#[cfg(not(target_os = "linux"))]
fn lookup_name(_name: &str) -> Option<KeyCode> {
    None
}

/// Result of looking a scancode up in the symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The key has a display glyph
    Glyph(&'a str),
    /// The key is known but must never produce a token
    Reserved,
    /// The key is not in the table
    Unmapped,
}

/// Scancode to glyph mapping: the built-in table plus user overrides
#[derive(Debug, Clone)]
pub struct SymbolTable {
    glyphs: HashMap<KeyCode, Option<String>>,
}

impl SymbolTable {
    /// Table with the default glyphs only
    pub fn new() -> Self {
        let glyphs = DEFAULT_SYMBOLS
            .iter()
            .map(|&(code, glyph)| (KeyCode(code), glyph.map(str::to_string)))
            .collect();
        Self { glyphs }
    }

    /// Replace (or add) the glyph for a scancode
    pub fn set(&mut self, code: KeyCode, glyph: impl Into<String>) {
        self.glyphs.insert(code, Some(glyph.into()));
    }

    pub fn lookup(&self, code: KeyCode) -> Lookup<'_> {
        match self.glyphs.get(&code) {
            Some(Some(glyph)) if !glyph.is_empty() => Lookup::Glyph(glyph),
            Some(_) => Lookup::Reserved,
            None => Lookup::Unmapped,
        }
    }

    /// All scancodes with an entry, reserved ones included
    pub fn codes(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.glyphs.keys().copied()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
