/// Keyboard state from terminal key events.
///
/// Instead of acting on each key event individually, the tracker records the
/// frame number of the last press/repeat event for every key.  A key counts as
/// held while that frame is within `HOLD_WINDOW` frames of the current one.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper `Press` /
///   `Repeat` / `Release` events, so keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows up as
///   repeated presses).  Keys expire after `HOLD_WINDOW` frames of silence,
///   which is shorter than the OS repeat interval.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::Keys;

/// About 133 ms at 30 FPS; OS key repeat is at least 15 Hz.
pub const HOLD_WINDOW: u64 = 4;

const LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const DROP: &[KeyCode] = &[KeyCode::Char(' ')];
const CONFIRM: &[KeyCode] = &[KeyCode::Enter];

/// Requests that end the main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Close,
}

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next frame; call once before draining events.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn handle(&mut self, event: KeyEvent) -> Option<Signal> {
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(event.code, self.frame);
                match event.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Some(Signal::Close);
                    }
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Some(Signal::Close);
                    }
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(event.code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&event.code);
            }
        }
        None
    }

    fn is_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|code| {
            self.key_frame
                .get(code)
                .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
                .unwrap_or(false)
        })
    }

    pub fn keys(&self) -> Keys {
        Keys {
            left: self.is_held(LEFT),
            right: self.is_held(RIGHT),
            up: self.is_held(UP),
            down: self.is_held(DOWN),
            drop: self.is_held(DROP),
            confirm: self.is_held(CONFIRM),
        }
    }
}
