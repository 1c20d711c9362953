//! Actions: the only way the game state changes.
//!
//! ## Model
//!
//! `Action` is a closed set of variants. Each variant answers two questions:
//!
//! - `can_execute(&StateView) -> bool`: a pure legality predicate.
//! - `execute(&mut ActionContext) -> Outcome`: the mutation, only called after
//!   `can_execute` returned true inside the same critical section.
//!
//! `Outcome::label` is the timeline label of the change; `None` means the
//! action changed nothing worth recording.
//!
//! ## Two-step penalties
//!
//! Choosing a penalty kind (`SelectPenalty`) only arms it. The next
//! `RobotButton` reads the armed call from `StateView::last_user_action` and
//! applies it to that robot. Choosing the same kind again disarms it.
//!
//! ## Undo
//!
//! `Undo` and `CancelUndo` are interpreted by the engine, which owns the
//! timeline. Their `execute` here is a no-op.

mod ball;
mod board;
mod clock;
mod coach;
mod penalty;
mod period;
mod play_mode;

use serde::{Deserialize, Serialize};

use crate::core::{ClockView, ControllerRng, GameState, SplCoachMessage, Side, Uniform};

pub use board::ActionBoard;
pub use penalty::PenaltyCall;

/// Most timeline entries a single `Undo` may roll back.
pub const MAX_UNDO_STATES: u8 = 8;

/// What caused an action to be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTrigger {
    /// A referee pressed a control.
    User,
    /// A message arrived over the network.
    Network,
    /// The periodic clock tick.
    Clock,
}

/// Every operation that can change a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    // === Housekeeping ===
    ClockTick,
    Testmode,
    /// Roll back this many timeline entries (two-step).
    Undo(u8),
    CancelUndo,

    // === Ball and score ===
    Goal { side: Side, delta: i8 },
    KickOff(Side),
    GlobalStuck(Side),
    Out(Side),
    DropBall,

    // === Timeouts ===
    Timeout(Side),
    RefereeTimeout,

    // === Play modes ===
    Initial,
    Ready,
    Set,
    Play,
    Finish,

    // === Periods ===
    FirstHalf,
    SecondHalf,
    FirstHalfOvertime,
    SecondHalfOvertime,
    PenaltyShootout,

    // === Test-mode clock ===
    ClockReset,
    ClockPause,
    IncGameClock,

    // === Penalties ===
    SelectPenalty(PenaltyCall),
    RobotButton { side: Side, uniform: Uniform },
    /// Robot-reported penalty change.
    Manual { side: Side, uniform: Uniform, unpenalise: bool },

    // === Coach ===
    CoachMessageReceived(SplCoachMessage),
}

/// Read-only input of `Action::can_execute`.
#[derive(Clone, Copy, Debug)]
pub struct StateView<'a> {
    pub state: &'a GameState,
    /// Last action applied with `ActionTrigger::User`.
    pub last_user_action: Option<&'a Action>,
    /// Wall-clock reading in ms.
    pub wall: i64,
}

impl<'a> StateView<'a> {
    #[must_use]
    pub fn new(state: &'a GameState, last_user_action: Option<&'a Action>, wall: i64) -> Self {
        Self {
            state,
            last_user_action,
            wall,
        }
    }

    #[must_use]
    pub fn clock(&self) -> ClockView<'a> {
        self.state.clock(self.wall)
    }

    /// The penalty call currently armed, if any.
    #[must_use]
    pub fn armed_penalty(&self) -> Option<PenaltyCall> {
        match self.last_user_action {
            Some(Action::SelectPenalty(call)) => Some(*call),
            _ => None,
        }
    }
}

/// Mutable input of `Action::execute`.
pub struct ActionContext<'a> {
    pub state: &'a mut GameState,
    pub last_user_action: Option<&'a Action>,
    pub wall: i64,
    pub rng: &'a mut ControllerRng,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        state: &'a mut GameState,
        last_user_action: Option<&'a Action>,
        wall: i64,
        rng: &'a mut ControllerRng,
    ) -> Self {
        Self {
            state,
            last_user_action,
            wall,
            rng,
        }
    }

    /// Current game time in ms.
    #[must_use]
    pub fn now(&self) -> i64 {
        self.state.time(self.wall)
    }

    #[must_use]
    pub fn view(&self) -> StateView<'_> {
        StateView::new(self.state, self.last_user_action, self.wall)
    }
}

/// Result of executing an action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Timeline label; `None` records nothing.
    pub label: Option<String>,
    /// Forget the last user action instead of recording this one.
    pub clear_last_user_action: bool,
}

impl Outcome {
    /// Nothing to record.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Record a timeline entry.
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            clear_last_user_action: false,
        }
    }

    /// Nothing to record, and forget the last user action.
    #[must_use]
    pub fn disarm() -> Self {
        Self {
            label: None,
            clear_last_user_action: true,
        }
    }

    pub(crate) fn from_label(label: Option<String>) -> Self {
        Self {
            label,
            clear_last_user_action: false,
        }
    }
}

impl Action {
    /// Whether the action may be applied to the given state.
    #[must_use]
    pub fn can_execute(&self, view: &StateView<'_>) -> bool {
        let state = view.state;
        match self {
            Action::ClockTick | Action::Testmode | Action::CancelUndo => true,
            Action::Undo(states) => *states > 0,

            Action::Goal { side, delta } => ball::can_goal(state, *side, *delta),
            Action::KickOff(side) => ball::can_kick_off(state, *side),
            Action::GlobalStuck(_) | Action::Out(_) | Action::DropBall => {
                ball::is_ball_in_play(state)
            }

            Action::Timeout(side) => period::can_timeout(state, *side),
            Action::RefereeTimeout => period::can_referee_timeout(state),

            Action::Initial => play_mode::can_initial(state),
            Action::Ready => play_mode::can_ready(state),
            Action::Set => play_mode::can_set(state),
            Action::Play => play_mode::can_play(state),
            Action::Finish => play_mode::can_finish(state),

            Action::FirstHalf => period::can_first_half(state),
            Action::SecondHalf => period::can_second_half(state),
            Action::FirstHalfOvertime => period::can_first_half_overtime(state),
            Action::SecondHalfOvertime => period::can_second_half_overtime(state),
            Action::PenaltyShootout => period::can_penalty_shootout(state),

            Action::ClockReset | Action::ClockPause => state.test_mode,
            Action::IncGameClock => clock::can_inc_game_clock(state),

            Action::SelectPenalty(call) => call.can_execute(state),
            Action::RobotButton { side, uniform } => penalty::can_press_robot(view, *side, *uniform),
            Action::Manual { side, uniform, .. } => {
                state.team(*side).robot(*uniform).is_some()
            }

            Action::CoachMessageReceived(message) => {
                state.team_by_number(message.team_number).is_some()
            }
        }
    }

    /// Apply the action. Callers must have checked `can_execute`.
    pub fn execute(&self, ctx: &mut ActionContext<'_>) -> Outcome {
        match self {
            Action::ClockTick => clock::tick(ctx),
            Action::Testmode => {
                ctx.state.test_mode = !ctx.state.test_mode;
                Outcome::none()
            }
            Action::Undo(_) | Action::CancelUndo => Outcome::none(),

            Action::Goal { side, delta } => ball::goal(ctx, *side, *delta),
            Action::KickOff(side) => ball::kick_off(ctx, *side),
            Action::GlobalStuck(side) => ball::global_stuck(ctx, *side),
            Action::Out(side) => ball::out(ctx, *side),
            Action::DropBall => ball::drop_ball(ctx),

            Action::Timeout(side) => period::timeout(ctx, *side),
            Action::RefereeTimeout => period::referee_timeout(ctx),

            Action::Initial => Outcome::from_label(play_mode::initial(ctx)),
            Action::Ready => Outcome::from_label(play_mode::ready(ctx)),
            Action::Set => Outcome::from_label(play_mode::set(ctx)),
            Action::Play => Outcome::from_label(play_mode::play(ctx)),
            Action::Finish => Outcome::from_label(play_mode::finish(ctx)),

            Action::FirstHalf => period::first_half(ctx),
            Action::SecondHalf => period::second_half(ctx),
            Action::FirstHalfOvertime => period::first_half_overtime(ctx),
            Action::SecondHalfOvertime => period::second_half_overtime(ctx),
            Action::PenaltyShootout => period::penalty_shootout(ctx),

            Action::ClockReset => clock::reset(ctx),
            Action::ClockPause => clock::pause(ctx),
            Action::IncGameClock => clock::inc_game_clock(ctx),

            Action::SelectPenalty(_) => {
                if ctx.last_user_action == Some(self) {
                    Outcome::disarm()
                } else {
                    Outcome::none()
                }
            }
            Action::RobotButton { side, uniform } => penalty::press_robot(ctx, *side, *uniform),
            Action::Manual {
                side,
                uniform,
                unpenalise,
            } => penalty::manual(ctx, *side, *uniform, *unpenalise),

            Action::CoachMessageReceived(message) => coach::receive(ctx, message),
        }
    }

    /// Stable name used by `ActionBoard`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Action::ClockTick => "clock_tick".into(),
            Action::Testmode => "testmode".into(),
            Action::Undo(n) => format!("undo.{}", n),
            Action::CancelUndo => "cancel_undo".into(),
            Action::Goal { side, delta } if *delta > 0 => format!("goal_inc.{}", side.name()),
            Action::Goal { side, .. } => format!("goal_dec.{}", side.name()),
            Action::KickOff(side) => format!("kickoff.{}", side.name()),
            Action::GlobalStuck(side) => format!("stuck.{}", side.name()),
            Action::Out(side) => format!("out.{}", side.name()),
            Action::DropBall => "drop_ball".into(),
            Action::Timeout(side) => format!("timeout.{}", side.name()),
            Action::RefereeTimeout => "referee_timeout".into(),
            Action::Initial => "initial".into(),
            Action::Ready => "ready".into(),
            Action::Set => "set".into(),
            Action::Play => "play".into(),
            Action::Finish => "finish".into(),
            Action::FirstHalf => "first_half".into(),
            Action::SecondHalf => "second_half".into(),
            Action::FirstHalfOvertime => "first_half_overtime".into(),
            Action::SecondHalfOvertime => "second_half_overtime".into(),
            Action::PenaltyShootout => "penalty_shootout".into(),
            Action::ClockReset => "clock_reset".into(),
            Action::ClockPause => "clock_pause".into(),
            Action::IncGameClock => "inc_game_clock".into(),
            Action::SelectPenalty(call) => format!("penalty.{}", call.name()),
            Action::RobotButton { side, uniform } => robot_name("robot", *side, *uniform),
            Action::Manual {
                side,
                uniform,
                unpenalise,
            } => robot_name(if *unpenalise { "manual_unpen" } else { "manual_pen" }, *side, *uniform),
            Action::CoachMessageReceived(message) => format!("coach_message.{}", message.team_number),
        }
    }
}

fn robot_name(prefix: &str, side: Side, uniform: Uniform) -> String {
    match uniform {
        Uniform::Player(n) => format!("{}.{}.{}", prefix, side.name(), n),
        Uniform::Coach => format!("{}.{}.coach", prefix, side.name()),
    }
}
