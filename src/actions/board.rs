//! Name lookup for every action of a league.
//!
//! The `ActionBoard` is the invocation surface for front ends: each action is
//! addressable by the stable name `Action::name()` gives it.

use rustc_hash::FxHashMap;

use crate::core::{PlayerNumber, Side, Uniform};
use crate::rules::League;

use super::{Action, PenaltyCall, MAX_UNDO_STATES};

/// All actions available in one league, keyed by name.
///
/// ## Example
///
/// ```
/// use game_controller::actions::{Action, ActionBoard};
/// use game_controller::core::Side;
/// use game_controller::rules::League;
///
/// let board = ActionBoard::new(League::Spl);
/// let goal = board.get("goal_inc.left").unwrap();
/// assert_eq!(goal, &Action::Goal { side: Side::Left, delta: 1 });
/// assert!(board.get("robot.right.7").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ActionBoard {
    actions: FxHashMap<String, Action>,
}

impl ActionBoard {
    /// Build the board for a league's roster size and penalty set.
    #[must_use]
    pub fn new(league: League) -> Self {
        let rules = league.rules();
        let family = league.family();
        let mut board = Self {
            actions: FxHashMap::default(),
        };

        for action in [
            Action::ClockTick,
            Action::Testmode,
            Action::CancelUndo,
            Action::DropBall,
            Action::RefereeTimeout,
            Action::Initial,
            Action::Ready,
            Action::Set,
            Action::Play,
            Action::Finish,
            Action::FirstHalf,
            Action::SecondHalf,
            Action::FirstHalfOvertime,
            Action::SecondHalfOvertime,
            Action::PenaltyShootout,
            Action::ClockReset,
            Action::ClockPause,
            Action::IncGameClock,
        ] {
            board.insert(action);
        }

        for states in 1..=MAX_UNDO_STATES {
            board.insert(Action::Undo(states));
        }

        for side in Side::BOTH {
            board.insert(Action::Goal { side, delta: 1 });
            board.insert(Action::Goal { side, delta: -1 });
            board.insert(Action::KickOff(side));
            board.insert(Action::GlobalStuck(side));
            board.insert(Action::Out(side));
            board.insert(Action::Timeout(side));

            let players = PlayerNumber::all(rules.team_size).map(Uniform::Player);
            let coach = rules.has_coach.then_some(Uniform::Coach);
            for uniform in players.chain(coach) {
                board.insert(Action::RobotButton { side, uniform });
            }
        }

        for call in PenaltyCall::ALL {
            if call.family().map_or(true, |f| f == family) {
                board.insert(Action::SelectPenalty(call));
            }
        }

        board
    }

    fn insert(&mut self, action: Action) {
        self.actions.insert(action.name(), action);
    }

    /// Look up an action by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Number of named actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over all names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spl_board() {
        let board = ActionBoard::new(League::Spl);
        assert!(board.get("robot.left.6").is_some());
        assert!(board.get("robot.right.coach").is_some());
        assert!(board.get("penalty.holding").is_some());
        assert!(board.get("penalty.attack").is_none());
        assert_eq!(board.get("undo.8"), Some(&Action::Undo(8)));
        assert!(board.get("undo.9").is_none());
    }

    #[test]
    fn test_humanoid_board() {
        let board = ActionBoard::new(League::HlAdult);
        assert!(board.get("robot.left.2").is_some());
        assert!(board.get("robot.left.3").is_none());
        assert!(board.get("robot.left.coach").is_none());
        assert!(board.get("penalty.service").is_some());
        assert!(board.get("penalty.pushing").is_some());
        assert!(board.get("penalty.coach_motion").is_none());
    }

    #[test]
    fn test_names_round_trip() {
        let board = ActionBoard::new(League::HlKid);
        for name in board.names() {
            assert_eq!(board.get(name).unwrap().name(), name);
        }
        assert!(!board.is_empty());
    }
}
