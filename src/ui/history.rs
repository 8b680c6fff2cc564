//! Newest-first history of decoded tokens

use super::token::Token;
use std::collections::VecDeque;

/// Ordered tokens, most recent first.
///
/// Bounded by what the renderer can fit on screen rather than by a fixed
/// capacity.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<Token>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the newest token
    pub fn prepend(&mut self, token: Token) {
        self.entries.push_front(token);
    }

    /// Drop every entry from `index` on (the oldest ones)
    pub fn truncate_from(&mut self, index: usize) {
        self.entries.truncate(index);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&Token> {
        self.entries.front()
    }
}

impl FromIterator<Token> for History {
    /// Builds a history from tokens listed newest first
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
