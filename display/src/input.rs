use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use vm8_core::Keypad;

use crate::keymap::keymap;

/// How long a key stays pressed after the terminal last reported it.
/// Most terminals only send presses (and auto-repeats), never releases.
pub const KEY_HOLD: Duration = Duration::from_millis(150);

/// Keeps each key down until `KEY_HOLD` has passed without another press, or until an explicit
/// release arrives.
#[derive(Default)]
pub struct KeyLatch {
    held_until: [Option<Instant>; 16],
}

impl KeyLatch {
    pub fn press(&mut self, key: u8, now: Instant) {
        self.held_until[(key & 0xF) as usize] = Some(now + KEY_HOLD);
    }

    pub fn release(&mut self, key: u8) {
        self.held_until[(key & 0xF) as usize] = None;
    }

    /// Snapshot of the keys still held at `now`
    pub fn keys(&self, now: Instant) -> Keypad {
        let mut keys = [false; 16];
        for (pressed, held_until) in keys.iter_mut().zip(self.held_until.iter()) {
            *pressed = matches!(held_until, Some(until) if *until > now);
        }
        keys
    }
}

/// What the user asked for since the last poll
#[derive(Debug, PartialEq, Eq)]
pub enum Poll {
    Continue,
    Quit,
}

/// # Input
/// Reads keyboard events from the terminal without blocking and folds them into a keypad.
/// Esc and Ctrl-C ask to quit; raw mode means Ctrl-C no longer raises a signal.
#[derive(Default)]
pub struct Input {
    latch: KeyLatch,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains every pending terminal event.
    pub fn poll(&mut self) -> io::Result<Poll> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if self.handle(key, Instant::now()) == Poll::Quit {
                    return Ok(Poll::Quit);
                }
            }
        }
        Ok(Poll::Continue)
    }

    fn handle(&mut self, event: KeyEvent, now: Instant) -> Poll {
        let ctrl_c = event.code == KeyCode::Char('c')
            && event.modifiers.contains(KeyModifiers::CONTROL);
        if event.code == KeyCode::Esc || ctrl_c {
            return Poll::Quit;
        }
        match (event.kind, keymap(event.code)) {
            (KeyEventKind::Release, Some(key)) => self.latch.release(key),
            (_, Some(key)) => self.latch.press(key, now),
            (_, None) => log::debug!("ignoring unmapped key {:?}", event.code),
        }
        Poll::Continue
    }

    /// The keypad as of now
    pub fn keys(&self) -> Keypad {
        self.latch.keys(Instant::now())
    }
}
