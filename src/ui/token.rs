//! Display tokens: styled text fragments for one decoded key press

use super::ansi::visible_width;
use crate::keyboard::KeyCode;

/// Rendering role of a segment, resolved to colors by the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Ordinary printable key, no color
    Plain,
    /// Named or iconographic key
    Named,
    /// Named key pressed with shift held
    Shifted,
    /// Modifier prefix of a chord
    Chord,
    /// Key missing from the symbol table
    Unknown,
    /// Repeat count marker
    Repeat,
}

/// Plain text plus a style tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn width(&self) -> usize {
        visible_width(&self.text)
    }
}

/// One decoded key press: chord prefixes followed by the key body.
///
/// Two tokens are the same key press for repeat collapsing iff they are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Never empty; the last segment is the body
    segments: Vec<Segment>,
}

impl Token {
    pub fn new(body: Segment) -> Self {
        Self {
            segments: vec![body],
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Segment::new(text, Style::Plain))
    }

    pub fn named(text: impl Into<String>) -> Self {
        Self::new(Segment::new(text, Style::Named))
    }

    /// Token for a scancode missing from the symbol table
    pub fn unknown(code: KeyCode, name: &str) -> Self {
        Self::new(Segment::new(
            format!("<{}:{}>", code.as_u16(), name),
            Style::Unknown,
        ))
    }

    pub fn body(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn body_mut(&mut self) -> &mut Segment {
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// Put a segment in front of everything else
    pub fn prepend(&mut self, segment: Segment) {
        self.segments.insert(0, segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Unstyled text of the whole token
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Visible width in terminal cells
    pub fn width(&self) -> usize {
        self.segments.iter().map(Segment::width).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_token_carries_code_and_name() {
        let token = Token::unknown(KeyCode(999), "KEY_FOO");
        assert_eq!(token.text(), "<999:KEY_FOO>");
        assert_eq!(token.body().style, Style::Unknown);
    }

    #[test]
    fn prepend_keeps_body_last() {
        let mut token = Token::plain("c");
        token.prepend(Segment::new("▲", Style::Chord));
        assert_eq!(token.text(), "▲c");
        assert_eq!(token.body().text, "c");
        assert_eq!(token.segments()[0].style, Style::Chord);
        assert_eq!(token.width(), 2);
    }

    #[test]
    fn equality_includes_style() {
        assert_eq!(Token::plain("a"), Token::plain("a"));
        assert_ne!(Token::plain("a"), Token::named("a"));
    }

    #[test]
    fn width_skips_embedded_markup() {
        let token = Token::named("\x1b[1mX\x1b[0m");
        assert_eq!(token.width(), 1);
    }
}
