use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent};

use crate::history::Record;
use crate::session::{Phase, Session};

/// A keystroke, a terminal resize, or one second of clock time
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Keystrokes and clock ticks serialized onto a single channel.
///
/// Two producer threads feed one receiver, so a tick and a keystroke are
/// never handled concurrently: whichever lands first is fully applied
/// before the next is taken. Dropping the queue makes the producers' sends
/// fail and both threads exit, taking the clock down with the loop that
/// consumed it.
pub struct EventQueue {
    rx: Receiver<AppEvent>,
}

impl EventQueue {
    /// Starts the terminal reader and the once-per-interval clock
    pub fn spawn(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let tick_tx = tx.clone();
        thread::spawn(move || loop {
            thread::sleep(tick_interval);
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        });

        thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => Some(AppEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => Some(AppEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };

            if let Some(evt) = evt {
                if tx.send(evt).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// A queue fed by hand, for driving sessions without a terminal
    pub fn from_receiver(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }

    /// Blocks for the next event; None once every producer is gone
    pub fn next(&self) -> Option<AppEvent> {
        self.rx.recv().ok()
    }
}

/// Applies one event to a session and its input buffer.
///
/// Typed characters and Backspace edit the buffer, which is then handed to
/// the session wholesale; ticks advance the clock. Keys arriving while the
/// session is not running leave the buffer alone, mirroring the engine's
/// own tolerance for stray events. Returns the completion record when this
/// event ended the session.
pub fn dispatch(session: &mut Session, buffer: &mut String, event: &AppEvent) -> Option<Record> {
    match event {
        AppEvent::Tick => session.tick(),
        AppEvent::Resize => None,
        AppEvent::Key(key) => {
            if session.phase != Phase::Running {
                return None;
            }
            match key.code {
                KeyCode::Char(c) => {
                    buffer.push(c);
                    session.update_input(buffer)
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    session.update_input(buffer)
                }
                _ => None,
            }
        }
    }
}
