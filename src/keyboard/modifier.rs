//! Modifier keys and chord-prefix suppression state

use super::KeyCode;

/// One of the four modifier families (left and right keys are merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKind {
    /// Order in which held modifiers decorate a key. Each later step wraps
    /// the result of the earlier ones, so the last one ends up leftmost.
    pub const PRECEDENCE: [ModifierKind; 4] = [
        ModifierKind::Shift,
        ModifierKind::Ctrl,
        ModifierKind::Meta,
        ModifierKind::Alt,
    ];

    /// Classify a scancode as a modifier key
    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code.0 {
            42 | 54 => Some(Self::Shift),
            29 | 97 => Some(Self::Ctrl),
            56 | 100 => Some(Self::Alt),
            125 | 126 => Some(Self::Meta), // Super/Win
            _ => None,
        }
    }

    /// Glyph shown for this modifier as a chord prefix
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Shift => "⮭",
            Self::Ctrl => "▲",
            Self::Alt => "\u{EAAB}",
            Self::Meta => "\u{E00A}",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Shift => 1,
            Self::Ctrl => 1 << 1,
            Self::Alt => 1 << 2,
            Self::Meta => 1 << 3,
        }
    }
}

/// Set of modifier kinds, indexed by [`ModifierKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierSet(u8);

impl ModifierSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, kind: ModifierKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: ModifierKind) {
        self.0 |= kind.bit();
    }

    /// Removes `kind`, returning whether it was present
    pub fn remove(&mut self, kind: ModifierKind) -> bool {
        let present = self.contains(kind);
        self.0 &= !kind.bit();
        present
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in decoration precedence order
    pub fn iter(&self) -> impl Iterator<Item = ModifierKind> + '_ {
        ModifierKind::PRECEDENCE
            .into_iter()
            .filter(|kind| self.contains(*kind))
    }

    pub fn with(mut self, kind: ModifierKind) -> Self {
        self.insert(kind);
        self
    }
}

impl FromIterator<ModifierKind> for ModifierSet {
    fn from_iter<I: IntoIterator<Item = ModifierKind>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

/// Pending-suppression flags for modifiers used as chord prefixes.
///
/// A flag is set when a held modifier decorates another key and cleared by
/// that modifier's next release, which is then hidden from the history.
#[derive(Debug, Clone, Default)]
pub struct ModifierTracker {
    pending: ModifierSet,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `kind` decorated a key
    pub fn mark(&mut self, kind: ModifierKind) {
        self.pending.insert(kind);
    }

    /// Consume the pending flag for `kind` on its release
    pub fn take(&mut self, kind: ModifierKind) -> bool {
        self.pending.remove(kind)
    }

    pub fn is_pending(&self, kind: ModifierKind) -> bool {
        self.pending.contains(kind)
    }

    pub fn pending(&self) -> ModifierSet {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = ModifierSet::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keymap::{KEY_A, KEY_LEFTCTRL, KEY_RIGHTALT, KEY_RIGHTMETA, KEY_RIGHTSHIFT};

    #[test]
    fn left_and_right_keys_share_a_kind() {
        assert_eq!(ModifierKind::from_code(KeyCode(42)), Some(ModifierKind::Shift));
        assert_eq!(ModifierKind::from_code(KEY_RIGHTSHIFT), Some(ModifierKind::Shift));
        assert_eq!(ModifierKind::from_code(KEY_LEFTCTRL), Some(ModifierKind::Ctrl));
        assert_eq!(ModifierKind::from_code(KEY_RIGHTALT), Some(ModifierKind::Alt));
        assert_eq!(ModifierKind::from_code(KEY_RIGHTMETA), Some(ModifierKind::Meta));
        assert_eq!(ModifierKind::from_code(KEY_A), None);
    }

    #[test]
    fn set_iterates_in_precedence_order() {
        let set: ModifierSet = [ModifierKind::Alt, ModifierKind::Shift, ModifierKind::Meta]
            .into_iter()
            .collect();
        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            vec![ModifierKind::Shift, ModifierKind::Meta, ModifierKind::Alt]
        );
    }

    #[test]
    fn set_insert_remove() {
        let mut set = ModifierSet::empty();
        assert!(set.is_empty());
        set.insert(ModifierKind::Ctrl);
        assert!(set.contains(ModifierKind::Ctrl));
        assert!(!set.contains(ModifierKind::Alt));
        assert!(set.remove(ModifierKind::Ctrl));
        assert!(!set.remove(ModifierKind::Ctrl));
        assert!(set.is_empty());
    }

    #[test]
    fn tracker_flag_is_consumed_once() {
        let mut tracker = ModifierTracker::new();
        assert!(!tracker.take(ModifierKind::Ctrl));

        tracker.mark(ModifierKind::Ctrl);
        assert!(tracker.is_pending(ModifierKind::Ctrl));
        assert!(!tracker.is_pending(ModifierKind::Shift));

        assert!(tracker.take(ModifierKind::Ctrl));
        assert!(!tracker.take(ModifierKind::Ctrl));
        assert!(tracker.pending().is_empty());
    }

    #[test]
    fn tracker_reset_clears_everything() {
        let mut tracker = ModifierTracker::new();
        tracker.mark(ModifierKind::Shift);
        tracker.mark(ModifierKind::Meta);
        tracker.reset();
        assert!(tracker.pending().is_empty());
    }
}
