/// Per-frame keyboard snapshot.
///
/// Instead of acting on each key event individually, the wrapper records the
/// frame of the last press/repeat event for every key.  A key is "down"
/// while that record is fresh and "pushed" only on the frame a press arrives
/// that is not a continuation of an existing hold.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Right after a push the key stays live for
///   `REPEAT_DELAY_WINDOW` frames to bridge the OS repeat start delay; once
///   repeating it expires after `HOLD_WINDOW` frames of silence.  A second
///   press inside the delay window is ambiguous and treated as a repeat; if
///   no steady repeat follows, the key is marked as tapped and later presses
///   inside the delay window count as fresh pushes.

use std::collections::{HashMap, HashSet};

use crossterm::event::{KeyCode, KeyEventKind};

use crate::config::{HOLD_WINDOW, REPEAT_DELAY_WINDOW};

#[derive(Clone, Copy, Debug, PartialEq)]
enum HoldPhase {
    /// Freshly pushed, no repeat seen yet.
    Pushed,
    /// Repeat seen; `confirmed` once a repeat arrives within `HOLD_WINDOW`.
    Repeating { confirmed: bool },
}

#[derive(Clone, Copy, Debug)]
struct KeyHold {
    last_seen: u64,
    phase: HoldPhase,
    /// Isolated presses seen: the player is tapping, not holding.
    tapping: bool,
}

#[derive(Clone, Debug, Default)]
pub struct KeyboardWrapper {
    holds: HashMap<KeyCode, KeyHold>,
    /// Keys freshly pressed during the current frame.
    pushed: HashSet<KeyCode>,
    frame: u64,
}

impl KeyboardWrapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame.  Must be called before the frame's events are
    /// recorded.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.pushed.clear();
    }

    pub fn record(&mut self, code: KeyCode, kind: KeyEventKind) {
        match kind {
            KeyEventKind::Press => self.record_press(code),
            KeyEventKind::Repeat => {
                let hold = self.holds.entry(code).or_insert(KeyHold {
                    last_seen: self.frame,
                    phase: HoldPhase::Pushed,
                    tapping: false,
                });
                hold.last_seen = self.frame;
                hold.phase = HoldPhase::Repeating { confirmed: true };
                hold.tapping = false;
            }
            KeyEventKind::Release => {
                self.holds.remove(&code);
            }
        }
    }

    fn record_press(&mut self, code: KeyCode) {
        let frame = self.frame;
        let next = match self.holds.get(&code).copied() {
            None => self.push(code, false),
            Some(hold) => {
                let gap = frame.saturating_sub(hold.last_seen);
                match hold.phase {
                    HoldPhase::Pushed if gap > REPEAT_DELAY_WINDOW => self.push(code, false),
                    HoldPhase::Pushed if hold.tapping => self.push(code, true),
                    // Could be the first OS repeat or a quick second tap
                    HoldPhase::Pushed => KeyHold {
                        last_seen: frame,
                        phase: HoldPhase::Repeating { confirmed: false },
                        ..hold
                    },
                    HoldPhase::Repeating { .. } if gap <= HOLD_WINDOW => KeyHold {
                        last_seen: frame,
                        phase: HoldPhase::Repeating { confirmed: true },
                        tapping: false,
                    },
                    // No steady repeat followed the ambiguous press: tapping
                    HoldPhase::Repeating { confirmed: false } if gap <= REPEAT_DELAY_WINDOW => {
                        self.push(code, true)
                    }
                    HoldPhase::Repeating { .. } => self.push(code, false),
                }
            }
        };
        self.holds.insert(code, next);
    }

    fn push(&mut self, code: KeyCode, tapping: bool) -> KeyHold {
        self.pushed.insert(code);
        KeyHold {
            last_seen: self.frame,
            phase: HoldPhase::Pushed,
            tapping,
        }
    }

    fn is_live(&self, hold: &KeyHold) -> bool {
        let window = match hold.phase {
            HoldPhase::Pushed => REPEAT_DELAY_WINDOW,
            HoldPhase::Repeating { .. } => HOLD_WINDOW,
        };
        self.frame.saturating_sub(hold.last_seen) <= window
    }

    pub fn is_key_down(&self, code: &KeyCode) -> bool {
        self.holds
            .get(code)
            .map(|h| self.is_live(h))
            .unwrap_or(false)
    }

    /// Edge-triggered: true only on the frame the key went down.
    pub fn key_pushed(&self, code: &KeyCode) -> bool {
        self.pushed.contains(code)
    }

    pub fn any_pushed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.key_pushed(c))
    }
}
