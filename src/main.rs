//! keyglyph - live terminal key-press visualizer
//!
//! Shows the most recent key presses from every keyboard as a single
//! right-aligned line.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::LevelFilter;

use keyglyph::config::{parse_scancode, Config, Theme};

#[derive(Debug, Parser)]
#[command(name = "keyglyph", version, about = "Show key presses live in the terminal")]
struct Cli {
    /// Color theme (dark or light)
    #[arg(long, value_name = "THEME")]
    theme: Option<Theme>,

    /// Show modifiers that are pressed and released on their own
    #[arg(long)]
    show_modifier_taps: bool,

    /// Do not count kernel autorepeat as key presses
    #[arg(long)]
    no_autorepeat: bool,

    /// Never show this key, by scancode or name like BTN_TOUCH (repeatable)
    #[arg(long = "ignore", value_name = "CODE")]
    ignore: Vec<String>,

    /// Show a key that is ignored by default, e.g. BTN_TOUCH (repeatable)
    #[arg(long = "listen", value_name = "CODE")]
    listen: Vec<String>,

    /// Override the glyph for a key, e.g. 58=⇪ or KEY_KP8=8 (repeatable)
    #[arg(long = "symbol", value_name = "CODE=GLYPH")]
    symbol: Vec<String>,

    /// Clear the line after this many idle seconds
    #[arg(long, value_name = "SECS")]
    clear_after: Option<u64>,

    /// Idle tick for resize checks, in milliseconds
    #[arg(long, value_name = "MS")]
    refresh_ms: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Defaults with every flag applied on top
    fn config(&self) -> Result<Config> {
        let mut config = Config::default();

        if let Some(theme) = self.theme {
            config.display.theme = theme;
        }
        if self.show_modifier_taps {
            config.display.show_modifier_taps = true;
        }
        if self.no_autorepeat {
            config.input.count_autorepeat = false;
        }
        for code in &self.ignore {
            config.ignore_scancode(parse_scancode(code)?);
        }
        // Applied after --ignore, so --listen wins for a key given to both
        for code in &self.listen {
            config.unignore_scancode(parse_scancode(code)?);
        }
        for spec in &self.symbol {
            config.add_symbol_spec(spec)?;
        }
        if self.clear_after.is_some() {
            config.display.clear_after_secs = self.clear_after;
        }
        if let Some(ms) = self.refresh_ms {
            config.display.refresh_ms = ms;
        }

        config.validate()?;
        Ok(config)
    }
}

/// What to tell the user when no keyboard could be opened
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn no_keyboards_message(is_root: bool) -> String {
    use crossterm::style::Stylize;

    if is_root {
        "No keyboards found.".to_string()
    } else {
        format!("No keyboards found. Try running as {}.", "root".red().bold())
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = cli.config()?;
    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    run(config)
}

#[cfg(target_os = "linux")]
fn run(config: Config) -> Result<()> {
    use keyglyph::keyboard::{
        find_keyboards, keyboard_status, running_as_root, spawn_listener, EvdevKeyboard,
    };
    use keyglyph::ui::{App, TerminalScreen};
    use log::info;
    use std::sync::mpsc;

    let keyboards = find_keyboards();
    if keyboards.is_empty() {
        println!("{}", no_keyboards_message(running_as_root()));
        return Ok(());
    }
    info!("{}", keyboard_status(keyboards.len()));

    let (event_tx, event_rx) = mpsc::channel();
    for keyboard in keyboards {
        let label = keyboard.label();
        let path = keyboard.path;
        spawn_listener(label.clone(), move || EvdevKeyboard::open(&path), event_tx.clone())
            .with_context(|| format!("failed to start listener for {}", label))?;
    }
    // Only listeners hold senders now, so `run` ends when the last one stops
    drop(event_tx);

    let screen = TerminalScreen::new().context("failed to prepare terminal")?;
    ctrlc::set_handler(|| {
        let _ = TerminalScreen::restore();
        std::process::exit(0);
    })
    .context("failed to install Ctrl-C handler")?;

    let mut app = App::new(&config, screen);
    app.run(event_rx);
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_config: Config) -> Result<()> {
    anyhow::bail!("keyglyph reads keyboards through evdev, which is only available on Linux")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "keyglyph",
            "--theme",
            "light",
            "--no-autorepeat",
            "--ignore",
            "58",
            "--symbol",
            "58=⇪",
            "--clear-after",
            "3",
        ]);
        let config = cli.config().expect("valid flags");
        assert_eq!(config.display.theme, Theme::Light);
        assert!(!config.input.count_autorepeat);
        assert!(config.input.ignored_scancodes.contains(&58));
        assert_eq!(config.input.symbols.len(), 1);
        assert_eq!(config.display.clear_after_secs, Some(3));
    }

    #[test]
    fn listen_removes_default_ignored_codes() {
        let cli = Cli::parse_from([
            "keyglyph", "--listen", "330", "--ignore", "58", "--listen", "58",
        ]);
        let config = cli.config().expect("valid flags");
        assert!(!config.input.ignored_scancodes.contains(&330));
        assert!(!config.input.ignored_scancodes.contains(&58));
        assert!(config.input.ignored_scancodes.contains(&325));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn key_names_are_accepted_by_flags() {
        let cli = Cli::parse_from([
            "keyglyph",
            "--ignore",
            "KEY_CAPSLOCK",
            "--symbol",
            "KEY_KP8=8",
        ]);
        let config = cli.config().expect("valid flags");
        assert!(config.input.ignored_scancodes.contains(&58));
        assert_eq!(config.input.symbols[0].scancode, 72);
    }

    #[test]
    fn unknown_key_name_is_an_error() {
        let cli = Cli::parse_from(["keyglyph", "--ignore", "KEY_NOPE"]);
        assert!(cli.config().is_err());
    }

    #[test]
    fn root_hint_only_for_unprivileged_users() {
        assert_eq!(no_keyboards_message(true), "No keyboards found.");
        let hint = no_keyboards_message(false);
        assert!(hint.starts_with("No keyboards found. Try running as "));
        assert!(hint.contains("root"));
    }

    #[test]
    fn bad_symbol_is_an_error() {
        let cli = Cli::parse_from(["keyglyph", "--symbol", "nope"]);
        assert!(cli.config().is_err());
    }

    #[test]
    fn zero_refresh_is_rejected() {
        let cli = Cli::parse_from(["keyglyph", "--refresh-ms", "0"]);
        assert!(cli.config().is_err());
    }

    #[test]
    fn unknown_theme_fails_to_parse() {
        assert!(Cli::try_parse_from(["keyglyph", "--theme", "sepia"]).is_err());
    }
}
