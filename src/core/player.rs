//! Per-robot match state.

use serde::{Deserialize, Serialize};

use super::ids::Uniform;
use super::penalty::Penalty;

/// One robot's penalty record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    /// Uniform number, or the coach marker.
    pub uniform: Uniform,

    /// Current penalty.
    pub penalty: Penalty,

    /// Game time (ms) when the current penalty began, 0 = never.
    pub when_penalized: i64,

    /// Sticky: an ejected robot never returns.
    pub ejected: bool,
}

impl PlayerState {
    /// Create an unpenalised robot.
    #[must_use]
    pub fn new(uniform: Uniform) -> Self {
        Self {
            uniform,
            penalty: Penalty::None,
            when_penalized: 0,
            ejected: false,
        }
    }

    /// Create a robot waiting on the bench.
    #[must_use]
    pub fn substitute(uniform: Uniform) -> Self {
        Self {
            penalty: Penalty::Substitute,
            ..Self::new(uniform)
        }
    }

    #[must_use]
    pub fn is_penalized(&self) -> bool {
        self.penalty != Penalty::None
    }

    #[must_use]
    pub fn is_coach(&self) -> bool {
        self.uniform.is_coach()
    }

    /// Stamp a penalty at game time `now`.
    pub fn penalize(&mut self, penalty: Penalty, now: i64) {
        self.penalty = penalty;
        self.when_penalized = now;
    }
}
