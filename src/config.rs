//! Controller and match configuration.
//!
//! ## ControllerConfig
//!
//! Network and timing settings for one controller process. Defaults match the
//! well-known GameController ports.
//!
//! ## GameOptions
//!
//! Everything needed to set up one match: league, teams, play-off flag and
//! kickoff. Both types deserialize from JSON so an embedding UI can load them
//! from a file.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::core::TeamColor;
use crate::rules::League;

/// UDP port of outbound game-state packets.
pub const GAME_STATE_PORT: u16 = 3838;
/// UDP port of inbound robot-status packets.
pub const ROBOT_STATUS_PORT: u16 = 3939;
/// UDP port of inbound SPL coach packets.
pub const COACH_PORT: u16 = 3839;

/// Network and timing settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Destination of game-state packets.
    pub broadcast_address: Ipv4Addr,

    pub game_state_port: u16,
    pub robot_status_port: u16,
    pub coach_port: u16,

    /// Interval between two game-state broadcasts (ms).
    pub send_period_ms: u64,

    /// Socket read timeout of every receiver (ms).
    /// Bounds how long a receiver takes to notice a stop request.
    pub receive_timeout_ms: u64,

    /// Interval between two clock ticks (ms).
    pub tick_period_ms: u64,

    /// Seconds the kickoff-blocked countdown may run past zero.
    pub kickoff_grace_secs: i32,

    /// How long a foreign controller id keeps the contention flag raised (ms).
    pub instance_window_ms: i64,

    /// Listen for other controllers on the game-state port.
    pub detect_other_instances: bool,

    /// Fixed RNG seed (random if absent).
    pub seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            broadcast_address: Ipv4Addr::BROADCAST,
            game_state_port: GAME_STATE_PORT,
            robot_status_port: ROBOT_STATUS_PORT,
            coach_port: COACH_PORT,
            send_period_ms: 500,
            receive_timeout_ms: 500,
            tick_period_ms: 500,
            kickoff_grace_secs: 15,
            instance_window_ms: 5_000,
            detect_other_instances: true,
            seed: None,
        }
    }
}

impl ControllerConfig {
    /// Set the broadcast destination.
    pub fn with_broadcast_address(mut self, address: Ipv4Addr) -> Self {
        self.broadcast_address = address;
        self
    }

    /// Set all three ports.
    pub fn with_ports(mut self, game_state: u16, robot_status: u16, coach: u16) -> Self {
        self.game_state_port = game_state;
        self.robot_status_port = robot_status;
        self.coach_port = coach;
        self
    }

    pub fn with_send_period(mut self, millis: u64) -> Self {
        self.send_period_ms = millis;
        self
    }

    pub fn with_receive_timeout(mut self, millis: u64) -> Self {
        self.receive_timeout_ms = millis;
        self
    }

    pub fn with_tick_period(mut self, millis: u64) -> Self {
        self.tick_period_ms = millis;
        self
    }

    pub fn with_instance_detection(mut self, enabled: bool) -> Self {
        self.detect_other_instances = enabled;
        self
    }

    /// Use a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Static description of one team at match setup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamInfo {
    pub number: u8,
    pub name: String,
}

impl TeamInfo {
    pub fn new(number: u8, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

/// Setup of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub league: League,
    /// Team starting on the left side in blue.
    pub left: TeamInfo,
    /// Team starting on the right side in red.
    pub right: TeamInfo,
    #[serde(default)]
    pub play_off: bool,
    #[serde(default = "default_kick_off")]
    pub initial_kick_off: TeamColor,
    /// Overrides the league's automatic color change.
    #[serde(default)]
    pub color_change_auto: Option<bool>,
}

fn default_kick_off() -> TeamColor {
    TeamColor::Blue
}

impl GameOptions {
    #[must_use]
    pub fn new(league: League, left: TeamInfo, right: TeamInfo) -> Self {
        Self {
            league,
            left,
            right,
            play_off: false,
            initial_kick_off: default_kick_off(),
            color_change_auto: None,
        }
    }

    pub fn with_play_off(mut self, play_off: bool) -> Self {
        self.play_off = play_off;
        self
    }

    pub fn with_kick_off(mut self, color: TeamColor) -> Self {
        self.initial_kick_off = color;
        self
    }

    pub fn with_color_change_auto(mut self, enabled: bool) -> Self {
        self.color_change_auto = Some(enabled);
        self
    }

    /// Effective color-change setting.
    #[must_use]
    pub fn color_change_auto(&self) -> bool {
        self.color_change_auto
            .unwrap_or(self.league.rules().color_change_auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.broadcast_address, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(config.game_state_port, 3838);
        assert_eq!(config.robot_status_port, 3939);
        assert_eq!(config.coach_port, 3839);
        assert_eq!(config.send_period_ms, 500);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ControllerConfig::default()
            .with_broadcast_address(Ipv4Addr::LOCALHOST)
            .with_ports(13838, 13939, 13839)
            .with_seed(123);

        assert_eq!(config.broadcast_address, Ipv4Addr::LOCALHOST);
        assert_eq!(config.robot_status_port, 13939);
        assert_eq!(config.seed, Some(123));
    }

    #[test]
    fn test_partial_config_json() {
        let config: ControllerConfig = serde_json::from_str(r#"{"coach_port": 4000}"#).unwrap();
        assert_eq!(config.coach_port, 4000);
        assert_eq!(config.game_state_port, GAME_STATE_PORT);
    }

    #[test]
    fn test_color_change_defaults_to_league() {
        let spl = GameOptions::new(League::Spl, TeamInfo::new(1, "A"), TeamInfo::new(2, "B"));
        assert!(!spl.color_change_auto());

        let kid = GameOptions::new(League::HlKid, TeamInfo::new(1, "A"), TeamInfo::new(2, "B"));
        assert!(kid.color_change_auto());
        assert!(!kid.with_color_change_auto(false).color_change_auto());
    }

    #[test]
    fn test_options_json() {
        let json = r#"{
            "league": "HlTeen",
            "left": {"number": 11, "name": "NimbRo"},
            "right": {"number": 3, "name": "Rhoban"}
        }"#;
        let options: GameOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.league, League::HlTeen);
        assert_eq!(options.initial_kick_off, TeamColor::Blue);
        assert!(!options.play_off);
    }
}
