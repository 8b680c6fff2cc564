//! Theme color definitions for the key line
//!
//! Maps token styles to terminal colors for dark and light terminals.

use super::token::{Segment, Style};
use crate::config::Theme;
use crossterm::style::{Color, ContentStyle, Stylize};

/// Terminal style for every token role
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Named and iconographic keys
    pub named: ContentStyle,
    /// Named keys pressed with shift
    pub shifted: ContentStyle,
    /// Chord prefixes (ctrl/alt/meta)
    pub chord: ContentStyle,
    /// Unmapped keys
    pub unknown: ContentStyle,
    /// Repeat count marker
    pub repeat: ContentStyle,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Bright colors for dark backgrounds
    pub fn dark() -> Self {
        Self {
            named: ContentStyle::new().with(Color::Blue).bold(),
            shifted: ContentStyle::new().with(Color::Red).bold(),
            chord: ContentStyle::new().with(Color::Red).bold(),
            unknown: ContentStyle::new().with(Color::Green).bold(),
            repeat: ContentStyle::new().with(Color::Magenta).italic(),
        }
    }

    /// Darker variants for bright terminals
    pub fn light() -> Self {
        Self {
            named: ContentStyle::new().with(Color::DarkBlue).bold(),
            shifted: ContentStyle::new().with(Color::DarkRed).bold(),
            chord: ContentStyle::new().with(Color::DarkRed).bold(),
            unknown: ContentStyle::new().with(Color::DarkGreen).bold(),
            repeat: ContentStyle::new().with(Color::DarkMagenta).italic(),
        }
    }

    pub fn style(&self, style: Style) -> Option<ContentStyle> {
        match style {
            Style::Plain => None,
            Style::Named => Some(self.named),
            Style::Shifted => Some(self.shifted),
            Style::Chord => Some(self.chord),
            Style::Unknown => Some(self.unknown),
            Style::Repeat => Some(self.repeat),
        }
    }

    /// Append a segment with its escape sequences to `out`
    pub fn paint_into(&self, segment: &Segment, out: &mut String) {
        match self.style(segment.style) {
            Some(style) => out.push_str(&style.apply(segment.text.as_str()).to_string()),
            None => out.push_str(&segment.text),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::dark()
    }
}
