//! Terminal rendering of the key history

pub mod ansi;
mod app;
mod history;
mod line;
pub mod theme;
mod token;

pub use app::{App, Screen, TerminalScreen};
pub use history::History;
pub use line::LineRenderer;
pub use theme::ThemeColors;
pub use token::{Segment, Style, Token};
