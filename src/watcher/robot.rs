//! Robot liveness and manual penalty requests.
//!
//! ## Slots
//!
//! One slot per roster robot plus a coach slot where the league has a coach,
//! for each of the two teams. Slots are keyed by team number, not side, so a
//! half-time side swap does not mix the teams up.
//!
//! ## Liveness
//!
//! `sweep` classifies each slot by the age of its last packet. A team whose
//! every slot is offline is reported as `Unknown`: total silence points to a
//! network problem rather than every robot failing at once.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::actions::{Action, ActionTrigger};
use crate::core::{Uniform, WallClock};
use crate::engine::Game;
use crate::net::{RobotMessage, RobotStatus};
use crate::rules::League;

/// Silence (ms) after which a robot is offline.
pub const OFFLINE_AFTER_MS: i64 = 4_000;
/// Silence (ms) after which a robot has high latency.
pub const HIGH_LATENCY_AFTER_MS: i64 = 2_000;

/// Liveness of one robot slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotOnlineStatus {
    #[default]
    Unknown,
    Offline,
    HighLatency,
    Online,
}

/// Liveness of one team, slot 0 = uniform 1, coach last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLiveness {
    pub team_number: u8,
    pub robots: Vec<RobotOnlineStatus>,
}

#[derive(Debug)]
struct TeamSlots {
    team_number: u8,
    last_heard: Vec<i64>,
    last_status: Vec<Option<RobotStatus>>,
    online: Vec<RobotOnlineStatus>,
}

impl TeamSlots {
    fn new(team_number: u8, slots: usize) -> Self {
        Self {
            team_number,
            last_heard: vec![0; slots],
            last_status: vec![None; slots],
            online: vec![RobotOnlineStatus::Unknown; slots],
        }
    }

    fn sweep(&mut self, now: i64) {
        for (online, &heard) in self.online.iter_mut().zip(&self.last_heard) {
            let age = now - heard;
            *online = if age > OFFLINE_AFTER_MS {
                RobotOnlineStatus::Offline
            } else if age > HIGH_LATENCY_AFTER_MS {
                RobotOnlineStatus::HighLatency
            } else {
                RobotOnlineStatus::Online
            };
        }
        if self.online.iter().all(|s| *s == RobotOnlineStatus::Offline) {
            self.online.fill(RobotOnlineStatus::Unknown);
        }
    }

    fn liveness(&self) -> TeamLiveness {
        TeamLiveness {
            team_number: self.team_number,
            robots: self.online.clone(),
        }
    }
}

/// Tracks robot packets and turns status changes into manual penalties.
pub struct RobotWatcher {
    team_size: u8,
    has_coach: bool,
    clock: Arc<dyn WallClock>,
    teams: Mutex<[TeamSlots; 2]>,
}

impl RobotWatcher {
    /// Watch the two teams of a match in `league`.
    #[must_use]
    pub fn new(league: League, team_numbers: [u8; 2], clock: Arc<dyn WallClock>) -> Self {
        let rules = league.rules();
        let slots = rules.robot_slots();
        Self {
            team_size: rules.team_size,
            has_coach: rules.has_coach,
            clock,
            teams: Mutex::new(team_numbers.map(|number| TeamSlots::new(number, slots))),
        }
    }

    /// Record a robot status packet.
    ///
    /// Packets from unknown teams or out-of-range uniform numbers are ignored.
    /// The robot's last-heard time is always refreshed; only a change of
    /// reported status may apply a manual penalty action. Returns whether an
    /// action was applied.
    pub fn update(&self, game: &Game, message: &RobotMessage) -> bool {
        let number = message.player_number;
        if number == 0 || number > self.team_size {
            return false;
        }
        let slot = usize::from(number - 1);

        {
            let mut teams = self.teams.lock();
            let Some(team) = teams.iter_mut().find(|t| t.team_number == message.team_number) else {
                return false;
            };
            team.last_heard[slot] = self.clock.now_millis();
            if team.last_status[slot] == Some(message.status) {
                return false;
            }
            team.last_status[slot] = Some(message.status);
        }

        let state = game.snapshot();
        let Some(side) = state.side_of_team_number(message.team_number) else {
            return false;
        };
        let uniform = Uniform::player(number);
        let Some(penalised) = state.team(side).robot(uniform).map(|p| p.is_penalized()) else {
            return false;
        };

        let unpenalise = match message.status {
            RobotStatus::ManuallyPenalised if !penalised => false,
            RobotStatus::ManuallyUnpenalised if penalised => true,
            _ => return false,
        };
        tracing::debug!(
            team = message.team_number,
            player = number,
            status = ?message.status,
            "robot status changed"
        );
        game.apply(
            &Action::Manual {
                side,
                uniform,
                unpenalise,
            },
            ActionTrigger::Network,
        )
    }

    /// Refresh the coach slot of `team_number` after a coach packet.
    pub fn update_coach(&self, team_number: u8) {
        if !self.has_coach {
            return;
        }
        let slot = usize::from(self.team_size);
        let mut teams = self.teams.lock();
        if let Some(team) = teams.iter_mut().find(|t| t.team_number == team_number) {
            team.last_heard[slot] = self.clock.now_millis();
        }
    }

    /// Recompute liveness of every slot.
    pub fn sweep(&self) -> [TeamLiveness; 2] {
        let now = self.clock.now_millis();
        let mut teams = self.teams.lock();
        for team in teams.iter_mut() {
            team.sweep(now);
        }
        [teams[0].liveness(), teams[1].liveness()]
    }

    /// Liveness of one team as of the last sweep.
    #[must_use]
    pub fn liveness(&self, team_number: u8) -> Option<TeamLiveness> {
        self.teams
            .lock()
            .iter()
            .find(|t| t.team_number == team_number)
            .map(TeamSlots::liveness)
    }
}
