//! Rewindable history of labelled game states.
//!
//! ## Storage
//!
//! Entries live in an `im::Vector`, so handing a copy of the whole history to
//! another thread is O(1). States are behind `Arc` and only copied when the
//! undo shift rewrites them.
//!
//! ## Shift correction
//!
//! Wall-clock time keeps running while entries are undone. After popping, the
//! remaining entries are shifted so the restored match clock reads as it did
//! when the first popped entry was recorded, plus the time played in the
//! discarded tail's play mode.

use std::sync::Arc;

use im::Vector;

use crate::core::GameState;

/// One recorded state and what led to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    pub state: Arc<GameState>,
    pub label: String,
}

/// Append-only history; only the tail may be removed.
#[derive(Clone, Debug)]
pub struct Timeline {
    /// Match start; never popped.
    first: TimelineEntry,
    rest: Vector<TimelineEntry>,
}

impl Timeline {
    #[must_use]
    pub fn new(initial: Arc<GameState>, label: impl Into<String>) -> Self {
        Self {
            first: TimelineEntry {
                state: initial,
                label: label.into(),
            },
            rest: Vector::new(),
        }
    }

    pub fn push(&mut self, state: Arc<GameState>, label: impl Into<String>) {
        self.rest.push_back(TimelineEntry {
            state,
            label: label.into(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false; the match-start entry is permanent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The most recent entry.
    #[must_use]
    pub fn tail(&self) -> &TimelineEntry {
        self.rest.back().unwrap_or(&self.first)
    }

    /// Remove the most recent entry, unless it is the first one.
    pub fn pop_tail(&mut self) -> Option<TimelineEntry> {
        self.rest.pop_back()
    }

    /// The `count` most recent labels, newest first, padded with empty
    /// strings when the history is shorter.
    #[must_use]
    pub fn last_labels(&self, count: usize) -> Vec<String> {
        let mut labels: Vec<String> = self
            .iter()
            .rev()
            .take(count)
            .map(|entry| entry.label.clone())
            .collect();
        labels.resize(count, String::new());
        labels
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TimelineEntry> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Roll back `count` entries (clamped so the first entry survives) and
    /// return the new tail's state.
    ///
    /// `wall` is the wall-clock reading at the moment of the undo.
    pub fn undo(&mut self, count: usize, wall: i64) -> Arc<GameState> {
        let gap = self.tail().state.when_current_play_mode_began;
        let played = self.tail().state.time(wall) - gap;

        let mut earliest = gap;
        for _ in 0..count {
            match self.pop_tail() {
                Some(popped) => earliest = popped.state.when_current_play_mode_began,
                None => break,
            }
        }

        if self.tail().state.when_current_play_mode_began != gap {
            let offset = gap - earliest + played;
            let entries = std::iter::once(&mut self.first).chain(self.rest.iter_mut());
            for entry in entries {
                Arc::make_mut(&mut entry.state).when_current_play_mode_began += offset;
            }
        }

        Arc::clone(&self.tail().state)
    }
}
