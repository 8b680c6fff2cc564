//! Event decoder: raw key events to display tokens
//!
//! Modifiers never show up as standalone tokens. A held modifier is folded
//! into the next key's token, and its own press and release stay invisible.
//! When a modifier decorates a key, the tracker remembers it so the matching
//! release is swallowed.

use super::keymap::{shift_transform, Lookup, SymbolTable};
use super::{KeyAction, KeyCode, ModifierKind, ModifierSet, ModifierTracker, RawKeyEvent};
use crate::ui::{Segment, Style, Token};
use log::debug;
use std::collections::HashSet;

/// Decoder behavior switches
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Scancodes that never produce a token
    pub ignored: HashSet<KeyCode>,
    /// Treat kernel autorepeat as additional presses
    pub count_autorepeat: bool,
    /// Render a modifier that was pressed and released on its own
    pub show_modifier_taps: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            ignored: HashSet::new(),
            count_autorepeat: true,
            show_modifier_taps: false,
        }
    }
}

/// Turns raw key events into display tokens, tracking chord state
#[derive(Debug, Clone)]
pub struct EventDecoder {
    symbols: SymbolTable,
    tracker: ModifierTracker,
    options: DecoderOptions,
}

impl EventDecoder {
    pub fn new(symbols: SymbolTable, options: DecoderOptions) -> Self {
        Self {
            symbols,
            tracker: ModifierTracker::new(),
            options,
        }
    }

    pub fn tracker(&self) -> &ModifierTracker {
        &self.tracker
    }

    /// Decode one event given the modifiers currently held on its keyboard.
    ///
    /// Returns `None` when the event must not be recorded.
    pub fn decode(&mut self, held: ModifierSet, event: &RawKeyEvent) -> Option<Token> {
        let Some(action) = event.action() else {
            debug!("skipping {} with unexpected value {}", event.name, event.value);
            return None;
        };
        if self.options.ignored.contains(&event.code) {
            return None;
        }
        if action == KeyAction::Repeat && !self.options.count_autorepeat {
            return None;
        }

        let mut token = match self.symbols.lookup(event.code) {
            Lookup::Glyph(glyph) => glyph_token(glyph),
            Lookup::Reserved => return None,
            Lookup::Unmapped => Token::unknown(event.code, &event.name),
        };

        match ModifierKind::from_code(event.code) {
            Some(_) if action.is_down() => return None,
            Some(kind) => {
                if self.tracker.take(kind) || !self.options.show_modifier_taps {
                    return None;
                }
            }
            None if !action.is_down() => return None,
            None => {}
        }

        for kind in held.iter() {
            self.tracker.mark(kind);
            match kind {
                ModifierKind::Shift => apply_shift(&mut token),
                _ => token.prepend(Segment::new(kind.glyph(), Style::Chord)),
            }
        }

        Some(token)
    }
}

/// Pick the base rendering for a glyph from the symbol table
fn glyph_token(glyph: &str) -> Token {
    let mut chars = glyph.chars();
    let first = chars.next().map_or(0, u32::from);
    let multi = chars.next().is_some();

    if multi && first < 255 {
        Token::named(format!("<{}>", glyph))
    } else if first > 255 {
        Token::named(glyph)
    } else {
        Token::plain(glyph.to_lowercase())
    }
}

/// Substitute the shifted character, or switch a named key to its shifted style
fn apply_shift(token: &mut Token) {
    let body = token.body_mut();
    let mut chars = body.text.chars();
    let shifted = match (chars.next(), chars.next()) {
        (Some(c), None) => shift_transform(c),
        _ => None,
    };

    match shifted {
        Some(c) if body.style == Style::Plain => body.text = c.to_string(),
        _ => {
            if body.style == Style::Named {
                body.style = Style::Shifted;
            }
        }
    }
}
