//! # game-controller
//!
//! Core of a RoboCup soccer game controller: the match state machine driven by
//! referee actions, a rewindable timeline, and the UDP protocols that publish
//! the state to robots and listen to them.
//!
//! ## Design Principles
//!
//! 1. **Actions are the only mutation**: every change goes through
//!    `Action::can_execute` then `Action::execute`, inside one critical
//!    section of `engine::Game`.
//!
//! 2. **Readers see snapshots**: after each applied action the engine
//!    publishes an immutable `Arc<GameState>`. The broadcaster, watchers and
//!    UIs never touch the live state.
//!
//! 3. **Time is injected**: all clock arithmetic takes a wall-clock reading
//!    from a `WallClock`, so tests run on `ManualClock`.
//!
//! 4. **Byte-exact wire formats**: each protocol version is an independent
//!    codec behind `GameStateProtocol` / `ReceivingProtocol`.
//!
//! ## Modules
//!
//! - `core`: identifiers, penalties, robots, teams, state, clock, RNG
//! - `rules`: leagues and their rule constants
//! - `actions`: the closed set of referee and network actions
//! - `engine`: serialized application, timeline and undo
//! - `net`: wire protocols, receivers and the broadcaster
//! - `watcher`: robot liveness and manual penalty requests
//! - `config`: controller settings and match setup
//! - `error`: error types
//! - `runtime`: threads of one running match

pub mod actions;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod net;
pub mod rules;
pub mod runtime;
pub mod watcher;

// Re-export commonly used types
pub use crate::actions::{Action, ActionBoard, ActionTrigger, PenaltyCall};
pub use crate::config::{ControllerConfig, GameOptions, TeamInfo};
pub use crate::core::{
    GameState, ManualClock, Penalty, Period, PlayMode, PlayerNumber, Side, SystemClock, TeamColor,
    Uniform, WallClock,
};
pub use crate::engine::Game;
pub use crate::error::{DecodeError, Error, NetError, Result};
pub use crate::net::{GameStateProtocol, GameStateSnapshot, ReceivingProtocol};
pub use crate::rules::{League, LeagueFamily, RuleSet};
pub use crate::runtime::Controller;
pub use crate::watcher::{RobotOnlineStatus, RobotWatcher};
