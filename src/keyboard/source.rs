//! Keyboard sources and per-device listener threads
//!
//! Every keyboard gets its own thread doing blocking reads. Listeners never
//! decode anything themselves: they tag each raw event with the modifiers
//! held on their device and hand it to the single dispatcher over a channel.

use super::{KeyEvent, ModifierKind, ModifierSet, RawKeyEvent};
use log::{error, info, warn};
use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Error type for keyboard sources
#[derive(Debug, Error)]
pub enum SourceError {
    /// The device could not be opened
    #[error("failed to open {label}: {source}")]
    Open { label: String, source: io::Error },
    /// Reading from the device failed
    #[error("read error on {label}: {source}")]
    Read { label: String, source: io::Error },
}

/// An opened keyboard that yields raw key events
pub trait KeySource {
    /// Block until at least one event is available and return the batch
    fn read_batch(&mut self) -> io::Result<Vec<RawKeyEvent>>;

    /// Modifiers currently held on this keyboard
    fn held_modifiers(&self) -> io::Result<ModifierSet>;
}

/// Start a listener thread for one keyboard.
///
/// The device is opened on the listener thread itself, so sources do not
/// need to be `Send`.
pub fn spawn_listener<S, F>(
    label: impl Into<String>,
    open: F,
    events: mpsc::Sender<KeyEvent>,
) -> io::Result<JoinHandle<Result<(), SourceError>>>
where
    S: KeySource,
    F: FnOnce() -> io::Result<S> + Send + 'static,
{
    let label = label.into();
    thread::Builder::new()
        .name(format!("listen {}", label))
        .spawn(move || {
            let mut source = match open() {
                Ok(source) => source,
                Err(io_err) => {
                    let err = SourceError::Open {
                        label: label.clone(),
                        source: io_err,
                    };
                    error!("{}", err);
                    return Err(err);
                }
            };
            listen(&label, &mut source, &events)
        })
}

/// Pump events from `source` into `events` until the device fails or the
/// dispatcher goes away.
///
/// Each event carries the modifiers held at that point of the stream:
/// modifier presses and releases inside a batch are folded in as they go
/// by, and the set is resynced from the device after every batch.
pub fn listen<S: KeySource>(
    label: &str,
    source: &mut S,
    events: &mpsc::Sender<KeyEvent>,
) -> Result<(), SourceError> {
    info!("listening on {}", label);
    let device: Arc<str> = Arc::from(label);
    let mut held = source.held_modifiers().unwrap_or_else(|e| {
        warn!("could not read key state of {}: {}", label, e);
        ModifierSet::empty()
    });

    loop {
        let batch = match source.read_batch() {
            Ok(batch) => batch,
            Err(io_err) => {
                let err = SourceError::Read {
                    label: label.to_string(),
                    source: io_err,
                };
                error!("{}", err);
                return Err(err);
            }
        };
        if batch.is_empty() {
            continue;
        }

        for raw in batch {
            track_modifier(&mut held, &raw);
            if events.send(KeyEvent::new(device.clone(), raw, held)).is_err() {
                info!("dispatcher gone, stopping {}", label);
                return Ok(());
            }
        }

        match source.held_modifiers() {
            Ok(state) => held = state,
            Err(e) => warn!("could not read key state of {}: {}", label, e),
        }
    }
}

/// Apply a modifier press or release to the running held set
fn track_modifier(held: &mut ModifierSet, raw: &RawKeyEvent) {
    let (Some(kind), Some(action)) = (ModifierKind::from_code(raw.code), raw.action()) else {
        return;
    };
    if action.is_down() {
        held.insert(kind);
    } else {
        held.remove(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays fixed batches, then fails like an unplugged device
    struct Scripted {
        batches: VecDeque<(ModifierSet, Vec<RawKeyEvent>)>,
        held: ModifierSet,
    }

    impl Scripted {
        fn new(batches: Vec<(ModifierSet, Vec<RawKeyEvent>)>) -> Self {
            Self {
                batches: batches.into(),
                held: ModifierSet::empty(),
            }
        }
    }

    impl KeySource for Scripted {
        fn read_batch(&mut self) -> io::Result<Vec<RawKeyEvent>> {
            match self.batches.pop_front() {
                Some((held, batch)) => {
                    self.held = held;
                    Ok(batch)
                }
                None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "unplugged")),
            }
        }

        fn held_modifiers(&self) -> io::Result<ModifierSet> {
            Ok(self.held)
        }
    }

    #[test]
    fn listener_tags_events_with_held_modifiers() {
        let (tx, rx) = mpsc::channel();
        let ctrl = ModifierSet::empty().with(ModifierKind::Ctrl);
        let mut source = Scripted::new(vec![
            (ctrl, vec![RawKeyEvent::new(29, "KEY_LEFTCTRL", 1)]),
            (ctrl, vec![]),
            (ctrl, vec![RawKeyEvent::new(46, "KEY_C", 1)]),
        ]);

        let result = listen("kbd0", &mut source, &tx);
        assert!(matches!(result, Err(SourceError::Read { .. })));

        let events: Vec<KeyEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].held, ctrl);
        assert_eq!(events[1].held, ctrl);
        assert_eq!(&*events[1].device, "kbd0");
    }

    #[test]
    fn chord_inside_one_batch_keeps_its_modifier() {
        let (tx, rx) = mpsc::channel();
        let ctrl = ModifierSet::empty().with(ModifierKind::Ctrl);
        // The device reports nothing held once the whole batch is read
        let mut source = Scripted::new(vec![(
            ModifierSet::empty(),
            vec![
                RawKeyEvent::new(29, "KEY_LEFTCTRL", 1),
                RawKeyEvent::new(46, "KEY_C", 1),
                RawKeyEvent::new(46, "KEY_C", 0),
                RawKeyEvent::new(29, "KEY_LEFTCTRL", 0),
            ],
        )]);

        let _ = listen("kbd0", &mut source, &tx);

        let held: Vec<ModifierSet> = rx.try_iter().map(|event| event.held).collect();
        assert_eq!(held, vec![ctrl, ctrl, ctrl, ModifierSet::empty()]);
    }

    #[test]
    fn device_state_is_resynced_after_each_batch() {
        let (tx, rx) = mpsc::channel();
        let shift = ModifierSet::empty().with(ModifierKind::Shift);
        // Shift was already down before the listener saw its press
        let mut source = Scripted::new(vec![
            (shift, vec![RawKeyEvent::new(1, "KEY_ESC", 1)]),
            (shift, vec![RawKeyEvent::new(30, "KEY_A", 1)]),
        ]);

        let _ = listen("kbd0", &mut source, &tx);

        let held: Vec<ModifierSet> = rx.try_iter().map(|event| event.held).collect();
        assert_eq!(held, vec![ModifierSet::empty(), shift]);
    }

    #[test]
    fn listener_stops_when_dispatcher_is_gone() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut source = Scripted::new(vec![(
            ModifierSet::empty(),
            vec![RawKeyEvent::new(30, "KEY_A", 1)],
        )]);
        assert!(listen("kbd0", &mut source, &tx).is_ok());
    }

    #[test]
    fn failed_open_is_reported_by_the_thread() {
        let (tx, _rx) = mpsc::channel();
        let open = || -> io::Result<Scripted> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        };
        let handle = spawn_listener("ghost", open, tx).expect("spawn");
        let result = handle.join().expect("thread panicked");
        assert!(matches!(result, Err(SourceError::Open { .. })));
    }
}
