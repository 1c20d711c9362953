//! The action engine: serialized application, history and undo.
//!
//! - `Game`: one match behind a lock, with snapshot publishing and
//!   change notification.
//! - `Timeline`: labelled history with clock-preserving undo.
//! - `UndoState`: the two-step undo confirmation.

pub mod game;
pub mod timeline;
pub mod undo;

pub use game::{Game, Subscriber};
pub use timeline::{Timeline, TimelineEntry};
pub use undo::UndoState;
