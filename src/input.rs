/// Keyboard state tracking: turns a stream of terminal key events into one
/// `InputSnapshot` per frame.
///
/// Each key maps to the frame of its last press or repeat and counts as held
/// for `HOLD_WINDOW` frames after that.  Terminals with keyboard enhancement
/// also send `Release`, which drops the key at once; classic terminals only
/// repeat `Press`, so their keys simply age out between OS repeats.
///
/// Reset and quit are latched from the first `Press` of a hold and consumed
/// by the next snapshot; repeats never trigger them.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Frames a key stays held after its last press or repeat (about 133 ms).
pub const HOLD_WINDOW: u64 = 8;

/// What the player is asking for during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Edge-triggered.
    pub reset: bool,
    /// Edge-triggered.
    pub quit: bool,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    pending_reset: bool,
    pending_quit: bool,
}

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const JUMP_KEYS: [KeyCode; 4] = [
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
    KeyCode::Char(' '),
];

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event observed during `frame`.
    pub fn record(&mut self, event: &KeyEvent, frame: u64) {
        match event.kind {
            KeyEventKind::Press => {
                // Classic terminals report auto-repeat as fresh presses
                let fresh = !self.is_held(&event.code, frame);
                self.key_frame.insert(event.code, frame);
                if !fresh {
                    return;
                }
                match event.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.pending_quit = true;
                    }
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.pending_quit = true;
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        self.pending_reset = true;
                    }
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
            }
        }
    }

    fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|k| self.is_held(k, frame))
    }

    /// Sample the held keys for `frame` and consume the latched one-shots.
    pub fn snapshot(&mut self, frame: u64) -> InputSnapshot {
        let snapshot = InputSnapshot {
            left: self.any_held(&LEFT_KEYS, frame),
            right: self.any_held(&RIGHT_KEYS, frame),
            jump: self.any_held(&JUMP_KEYS, frame),
            reset: self.pending_reset,
            quit: self.pending_quit,
        };
        self.pending_reset = false;
        self.pending_quit = false;
        snapshot
    }
}
