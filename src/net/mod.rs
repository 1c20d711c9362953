//! UDP wire protocols, receive loops and the game-state broadcaster.
//!
//! ## Formats
//!
//! | Magic | Direction | Versions |
//! |-------|-----------|----------|
//! | `RGme` | out (broadcast) | 7 (encode only), 8, 9 |
//! | `RGrt` | in (robots) | 1, 2 |
//! | `SPLC` | in (SPL coaches) | 2 |
//!
//! All integers are little-endian. Decoders never panic on bad input: they
//! return `DecodeError` from `try_decode` and `None` from `decode`.
//!
//! ## Threads
//!
//! - `Broadcaster`: one socket, one packet per enabled version per cycle.
//! - `MessageReceiver`: one socket per inbound port, blocking with a timeout.
//! - `InstanceWatcher`: a receiver on the game-state port that notices other
//!   controllers.

pub mod broadcaster;
pub mod bytes;
pub mod coach;
pub mod game_state;
pub mod instance;
pub mod protocol;
pub mod receiver;
pub mod robot_status;

pub use broadcaster::Broadcaster;
pub use coach::{SplCoachProtocol2, COACH_HEADER};
pub use game_state::{
    protocols_for, GameStateProtocol7, GameStateProtocol8, GameStateProtocol9, GameStateSnapshot,
    PlayerSnapshot, TeamSnapshot, GAME_STATE_HEADER,
};
pub use instance::InstanceWatcher;
pub use protocol::{GameStateProtocol, ReceivingProtocol};
pub use receiver::{MessageReceiver, Protocols};
pub use robot_status::{
    robot_status_protocols, RobotMessage, RobotStatus, RobotStatusProtocol1, RobotStatusProtocol2,
    ROBOT_STATUS_HEADER,
};
