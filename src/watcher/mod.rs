//! Robot liveness tracking.

pub mod robot;

pub use robot::{RobotOnlineStatus, RobotWatcher, TeamLiveness, HIGH_LATENCY_AFTER_MS, OFFLINE_AFTER_MS};
