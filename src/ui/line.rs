//! Folds the history into one right-aligned terminal line

use super::history::History;
use super::theme::ThemeColors;
use super::token::{Segment, Style, Token};
use unicode_width::UnicodeWidthStr;

/// Consecutive identical tokens shown once with a count
struct Run<'a> {
    token: &'a Token,
    count: usize,
}

impl Run<'_> {
    fn marker(count: usize) -> Option<String> {
        (count > 1).then(|| format!("×{}", count))
    }

    /// Visible width including the separator that follows the run
    fn width_with(&self, count: usize) -> usize {
        let marker = Self::marker(count).map_or(0, |m| m.width());
        self.token.width() + marker + 1
    }

    fn width(&self) -> usize {
        self.width_with(self.count)
    }
}

/// Builds the printable key line
#[derive(Debug, Clone, Default)]
pub struct LineRenderer {
    colors: ThemeColors,
}

impl LineRenderer {
    pub fn new(colors: ThemeColors) -> Self {
        Self { colors }
    }

    /// Render `history` right-aligned into `width` columns.
    ///
    /// Entries that no longer fit are removed from `history` for good. The
    /// newest entry is always kept, even when it alone overflows.
    pub fn render(&self, history: &mut History, width: u16) -> String {
        let width = usize::from(width);
        let mut runs: Vec<Run<'_>> = Vec::new();
        let mut used = 0;
        let mut kept = 0;

        for (index, token) in history.iter().enumerate() {
            let candidate = match runs.last() {
                Some(run) if run.token == token => {
                    used - run.width() + run.width_with(run.count + 1)
                }
                _ => used + token.width() + 1,
            };
            if candidate > width && index > 0 {
                break;
            }

            match runs.last_mut() {
                Some(run) if run.token == token => run.count += 1,
                _ => runs.push(Run { token, count: 1 }),
            }
            used = candidate;
            kept = index + 1;
        }

        let mut line = " ".repeat(width.saturating_sub(used));
        for (i, run) in runs.iter().rev().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            for segment in run.token.segments() {
                self.colors.paint_into(segment, &mut line);
            }
            if let Some(marker) = Run::marker(run.count) {
                self.colors
                    .paint_into(&Segment::new(marker, Style::Repeat), &mut line);
            }
        }

        history.truncate_from(kept);
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ansi::{strip_ansi, visible_width};

    fn history(newest_first: &[&str]) -> History {
        newest_first.iter().map(|t| Token::plain(*t)).collect()
    }

    fn render(history: &mut History, width: u16) -> String {
        LineRenderer::default().render(history, width)
    }

    #[test]
    fn empty_history_is_all_padding() {
        let mut h = History::new();
        assert_eq!(render(&mut h, 10), " ".repeat(10));
    }

    #[test]
    fn newest_token_is_rightmost() {
        let mut h = history(&["c", "b", "a"]);
        let line = render(&mut h, 10);
        assert_eq!(line, "    a b c");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn repeats_collapse_into_marker() {
        let mut h = history(&["q", "w", "w", "w"]);
        let line = render(&mut h, 80);
        let visible = strip_ansi(&line);
        assert_eq!(visible.trim_start(), "w×3 q");
        assert_eq!(visible_width(&line), 79);
        assert_eq!(visible.matches('w').count(), 1);
    }

    #[test]
    fn four_identical_presses_show_once() {
        let mut h = history(&["a", "a", "a", "a"]);
        let line = render(&mut h, 20);
        assert_eq!(strip_ansi(&line).trim_start(), "a×4");
        assert_eq!(h.len(), 4);
    }

    #[test]
    fn runs_only_merge_when_adjacent() {
        let mut h = history(&["a", "b", "a"]);
        let line = render(&mut h, 20);
        assert_eq!(strip_ansi(&line).trim_start(), "a b a");
    }

    #[test]
    fn overflow_drops_oldest_entries_permanently() {
        // "a " "b " "c " "d " -> 8 columns, only three fit in 7
        let mut h = history(&["d", "c", "b", "a"]);
        let line = render(&mut h, 7);
        assert_eq!(line, " b c d");
        assert_eq!(h.len(), 3);

        let wider = render(&mut h, 80);
        assert_eq!(wider.trim_start(), "b c d");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn render_is_idempotent() {
        let mut h = history(&["e", "d", "d", "c", "b", "a"]);
        let first = render(&mut h, 9);
        let len = h.len();
        let second = render(&mut h, 9);
        assert_eq!(first, second);
        assert_eq!(h.len(), len);
    }

    #[test]
    fn repeat_marker_growth_can_overflow() {
        // "a×9 " is 4 wide, "a×10 " would need 5
        let mut h = history(&["a"; 10]);
        let line = render(&mut h, 4);
        assert_eq!(strip_ansi(&line), "a×9");
        assert_eq!(h.len(), 9);
    }

    #[test]
    fn oversized_newest_token_is_still_printed() {
        let mut h: History = [Token::named("<VERYLONGKEY>"), Token::plain("a")]
            .into_iter()
            .collect();
        let line = render(&mut h, 4);
        assert_eq!(strip_ansi(&line), "<VERYLONGKEY>");
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn zero_width_terminal_does_not_panic() {
        let mut h = history(&["a", "b"]);
        let line = render(&mut h, 0);
        assert_eq!(line, "a");
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn chord_tokens_are_measured_without_markup() {
        let mut token = Token::plain("c");
        token.prepend(Segment::new("▲", Style::Chord));
        let mut h: History = [token].into_iter().collect();
        let line = render(&mut h, 6);
        assert_eq!(strip_ansi(&line), "   ▲c");
        assert!(line.contains('\x1b'));
    }
}
