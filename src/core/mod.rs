//! Core match types: identifiers, penalties, robots, teams, state, clock, RNG.
//!
//! Everything here is plain data plus pure arithmetic. Mutation policy lives
//! in `actions`; serialization of mutations lives in `engine`.

pub mod clock;
pub mod coach;
pub mod ids;
pub mod penalty;
pub mod player;
pub mod rng;
pub mod state;
pub mod team;

pub use clock::{ClockView, ManualClock, SystemClock, WallClock, NEVER_SECONDS};
pub use coach::{
    SplCoachMessage, COACH_MESSAGE_MAX_DELAY, COACH_MESSAGE_MIN_DELAY,
    COACH_MESSAGE_RECEIVE_INTERVAL, COACH_MESSAGE_SIZE,
};
pub use ids::{PlayerNumber, Side, SidePair, TeamColor, Uniform};
pub use penalty::Penalty;
pub use player::PlayerState;
pub use rng::ControllerRng;
pub use state::{GameState, Period, PlayMode};
pub use team::{QueuedPenalty, TeamState};
