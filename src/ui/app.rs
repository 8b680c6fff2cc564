//! Main application state and the dispatch loop
//!
//! `App` is the only consumer of key events. Decoding, the modifier
//! tracker, the history and rendering all live here and are driven one
//! event at a time, which serializes every listener's updates.

use super::history::History;
use super::line::LineRenderer;
use super::theme::ThemeColors;
use crate::config::Config;
use crate::keyboard::{EventDecoder, KeyEvent};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};
use log::{debug, info, warn};
use std::io::{self, Stdout, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Where frames go
pub trait Screen {
    /// Current width in columns, queried before every frame
    fn width(&self) -> io::Result<u16>;

    /// Replace whatever is on screen with `line`
    fn present(&mut self, line: &str) -> io::Result<()>;
}

/// The controlling terminal, via crossterm
pub struct TerminalScreen {
    out: Stdout,
}

impl TerminalScreen {
    /// Take over stdout and hide the cursor
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(out, Hide)?;
        Ok(Self { out })
    }

    /// Bring the cursor back and leave it on a fresh line
    pub fn restore() -> io::Result<()> {
        execute!(io::stdout(), Show, Print("\r\n"))
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = Self::restore();
    }
}

impl Screen for TerminalScreen {
    fn width(&self) -> io::Result<u16> {
        Ok(terminal::size()?.0)
    }

    fn present(&mut self, line: &str) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0), Print(line))?;
        self.out.flush()
    }
}

/// Main application
pub struct App<S: Screen> {
    decoder: EventDecoder,
    history: History,
    renderer: LineRenderer,
    screen: S,
    /// Idle time before the line is cleared
    clear_after: Option<Duration>,
    /// Idle tick
    refresh: Duration,
    /// When the last key event arrived
    last_input: Option<Instant>,
    /// Width used for the last frame
    last_width: Option<u16>,
    /// Total events processed
    pub total_events: u64,
}

impl<S: Screen> App<S> {
    pub fn new(config: &Config, screen: S) -> Self {
        Self {
            decoder: EventDecoder::new(config.symbol_table(), config.decoder_options()),
            history: History::new(),
            renderer: LineRenderer::new(ThemeColors::from_theme(config.display.theme)),
            screen,
            clear_after: config.clear_after(),
            refresh: config.refresh_interval(),
            last_input: None,
            last_width: None,
            total_events: 0,
        }
    }

    /// Decode one event, record it and redraw
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.total_events += 1;
        self.last_input = Some(event.timestamp);

        if let Some(token) = self.decoder.decode(event.held, &event.raw) {
            debug!("{} -> {:?} from {}", event.raw.name, token.text(), event.device);
            self.history.prepend(token);
        }
        self.redraw();
    }

    /// Render the history at the current terminal width and show it.
    ///
    /// A failing terminal only costs this frame.
    pub fn redraw(&mut self) {
        let width = match self.screen.width() {
            Ok(width) => width,
            Err(e) => {
                warn!("could not query terminal size: {}", e);
                return;
            }
        };
        self.last_width = Some(width);

        let line = self.renderer.render(&mut self.history, width);
        if let Err(e) = self.screen.present(&line) {
            warn!("failed to draw key line: {}", e);
        }
    }

    /// Periodic housekeeping while no events arrive: clear after the idle
    /// timeout and follow terminal resizes
    pub fn tick(&mut self, now: Instant) {
        if let (Some(limit), Some(last)) = (self.clear_after, self.last_input) {
            if !self.history.is_empty() && now.saturating_duration_since(last) >= limit {
                debug!("idle for {:?}, clearing history", limit);
                self.history.clear();
                self.redraw();
                return;
            }
        }

        match self.screen.width() {
            Ok(width) if Some(width) != self.last_width => self.redraw(),
            Ok(_) => {}
            Err(e) => warn!("could not query terminal size: {}", e),
        }
    }

    /// Consume events until every listener has hung up
    pub fn run(&mut self, events: Receiver<KeyEvent>) {
        self.redraw();
        loop {
            match events.recv_timeout(self.refresh) {
                Ok(event) => self.process_event(&event),
                Err(RecvTimeoutError::Timeout) => self.tick(Instant::now()),
                Err(RecvTimeoutError::Disconnected) => {
                    info!("all keyboard listeners stopped");
                    break;
                }
            }
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn decoder(&self) -> &EventDecoder {
        &self.decoder
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }
}
