//! Two-step undo.

use serde::{Deserialize, Serialize};

/// Whether an undo is waiting for confirmation.
///
/// The first `Undo(n)` arms, the same `Undo(n)` again commits. Any other user
/// action in between disarms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UndoState {
    #[default]
    Idle,
    Armed(u8),
}

impl UndoState {
    /// Register an `Undo(states)` press. Returns the count to roll back when
    /// the press confirms an armed undo.
    pub fn press(&mut self, states: u8) -> Option<u8> {
        match *self {
            UndoState::Armed(armed) if armed == states => {
                *self = UndoState::Idle;
                Some(states)
            }
            _ => {
                *self = UndoState::Armed(states);
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        *self = UndoState::Idle;
    }

    /// Entries an armed undo would remove.
    #[must_use]
    pub fn armed(&self) -> Option<u8> {
        match self {
            UndoState::Armed(states) => Some(*states),
            UndoState::Idle => None,
        }
    }
}
