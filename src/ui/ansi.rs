//! ANSI escape sequence stripping and visible width
//!
//! Glyph overrides may carry their own escape sequences, so widths are
//! always measured on the stripped text.

use std::borrow::Cow;
use unicode_width::UnicodeWidthStr;

/// Strip ANSI escape sequences from a string.
///
/// Returns `Cow::Borrowed` when no escape sequences are present.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.as_bytes().contains(&0x1B) {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == 0x1B {
            i = skip_escape(bytes, i);
        } else {
            // ESC is a single ASCII byte, so slicing between escapes keeps
            // UTF-8 boundaries intact.
            let start = i;
            while i < bytes.len() && bytes[i] != 0x1B {
                i += 1;
            }
            result.push_str(&s[start..i]);
        }
    }

    Cow::Owned(result)
}

/// Terminal cell width of `s` once escape sequences are removed
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

/// Byte index after the escape sequence starting at `pos`
fn skip_escape(bytes: &[u8], pos: usize) -> usize {
    let next = pos + 1;
    match bytes.get(next) {
        None => bytes.len(),
        Some(b'[') => skip_csi(bytes, next + 1),
        Some(_) => next + 1,
    }
}

/// CSI: parameter/intermediate bytes then a final byte in 0x40..=0x7E
fn skip_csi(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if (0x40..=0x7E).contains(&b) {
            return i + 1;
        }
        if !(0x20..=0x3F).contains(&b) {
            return i;
        }
        i += 1;
    }
    bytes.len()
}
