//! Per-team match state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::coach::COACH_MESSAGE_SIZE;
use super::ids::{PlayerNumber, TeamColor, Uniform};
use super::penalty::Penalty;
use super::player::PlayerState;
use crate::rules::RuleSet;

/// A penalty waiting to be handed to the next substitute entering the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueuedPenalty {
    pub when_penalized: i64,
    pub penalty: Penalty,
}

/// One team's mutable match data.
///
/// Players are stored inline; no league fields more than six robots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamState {
    pub team_number: u8,
    pub name: String,
    pub color: TeamColor,
    pub score: u8,
    pub penalty_shot_count: u8,
    /// One bit per shot attempt, LSB = first attempt.
    pub penalty_shot_flags: u16,
    pub push_count: u32,
    pub timeout_active: bool,
    pub timeout_taken: bool,
    pub players: SmallVec<[PlayerState; 6]>,
    pub coach: Option<PlayerState>,
    pub penalty_queue: VecDeque<QueuedPenalty>,
    /// Last released coach message (leagues with a coach only).
    pub coach_message: Option<Vec<u8>>,
    /// Wall-clock ms of the last accepted coach message, 0 = never.
    pub last_coach_message_received: i64,
}

impl TeamState {
    /// Create a team at kick-off of a match.
    ///
    /// Robots numbered above `robots_playing` start as substitutes.
    #[must_use]
    pub fn new(team_number: u8, name: impl Into<String>, color: TeamColor, rules: &RuleSet) -> Self {
        let players = PlayerNumber::all(rules.team_size)
            .map(|n| {
                if n.raw() > rules.robots_playing {
                    PlayerState::substitute(Uniform::Player(n))
                } else {
                    PlayerState::new(Uniform::Player(n))
                }
            })
            .collect();

        Self {
            team_number,
            name: name.into(),
            color,
            score: 0,
            penalty_shot_count: 0,
            penalty_shot_flags: 0,
            push_count: 0,
            timeout_active: false,
            timeout_taken: false,
            players,
            coach: rules.has_coach.then(|| PlayerState::new(Uniform::Coach)),
            penalty_queue: VecDeque::new(),
            coach_message: rules.has_coach.then(|| vec![0u8; COACH_MESSAGE_SIZE]),
            last_coach_message_received: 0,
        }
    }

    /// Number of robots on the roster.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Look up a field player.
    #[must_use]
    pub fn player(&self, number: PlayerNumber) -> Option<&PlayerState> {
        self.players.get(number.index())
    }

    pub fn player_mut(&mut self, number: PlayerNumber) -> Option<&mut PlayerState> {
        self.players.get_mut(number.index())
    }

    /// Look up a robot slot (player or coach).
    #[must_use]
    pub fn robot(&self, uniform: Uniform) -> Option<&PlayerState> {
        match uniform {
            Uniform::Player(n) => self.player(n),
            Uniform::Coach => self.coach.as_ref(),
        }
    }

    pub fn robot_mut(&mut self, uniform: Uniform) -> Option<&mut PlayerState> {
        match uniform {
            Uniform::Player(n) => self.player_mut(n),
            Uniform::Coach => self.coach.as_mut(),
        }
    }

    /// Robots not sitting on the bench.
    #[must_use]
    pub fn robots_in_play(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.penalty != Penalty::Substitute)
            .count()
    }

    /// Record a scored penalty shot for the current attempt.
    pub fn add_penalty_goal(&mut self) {
        if self.penalty_shot_count > 0 && self.penalty_shot_count <= 16 {
            self.penalty_shot_flags |= 1 << (self.penalty_shot_count - 1);
        }
    }

    /// Queue a penalty for transfer to the next entering substitute.
    pub fn enqueue_penalty(&mut self, when_penalized: i64, penalty: Penalty) {
        self.penalty_queue.push_back(QueuedPenalty {
            when_penalized,
            penalty,
        });
    }

    pub fn pop_queued_penalty(&mut self) -> Option<QueuedPenalty> {
        self.penalty_queue.pop_front()
    }

    /// Clear every penalty except substitutes, and all ejections.
    pub fn reset_penalties(&mut self) {
        self.push_count = 0;
        for player in self.players.iter_mut() {
            if player.penalty != Penalty::Substitute {
                player.penalty = Penalty::None;
            }
            player.ejected = false;
        }
        self.penalty_queue.clear();
    }

    /// Restart every penalty timer.
    pub fn reset_penalty_times(&mut self) {
        for player in self.players.iter_mut() {
            player.when_penalized = 0;
        }
        if let Some(coach) = self.coach.as_mut() {
            coach.when_penalized = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::League;

    fn spl_team() -> TeamState {
        TeamState::new(5, "Nao Devils", TeamColor::Blue, League::Spl.rules())
    }

    #[test]
    fn test_new_team_roster() {
        let team = spl_team();
        assert_eq!(team.player_count(), 6);
        assert_eq!(team.robots_in_play(), 5);
        assert_eq!(
            team.player(PlayerNumber::new(6)).unwrap().penalty,
            Penalty::Substitute
        );
        assert!(team.coach.is_some());
        assert_eq!(team.coach_message.as_ref().unwrap().len(), COACH_MESSAGE_SIZE);
    }

    #[test]
    fn test_humanoid_team_has_no_coach() {
        let team = TeamState::new(3, "Rhoban", TeamColor::Red, League::HlKid.rules());
        assert!(team.coach.is_none());
        assert!(team.coach_message.is_none());
        assert_eq!(team.robots_in_play(), 4);
        assert!(team.robot(Uniform::Coach).is_none());
    }

    #[test]
    fn test_player_lookup_out_of_range() {
        let team = spl_team();
        assert!(team.player(PlayerNumber::new(7)).is_none());
        assert!(team.robot(Uniform::player(1)).is_some());
    }

    #[test]
    fn test_penalty_goal_flags() {
        let mut team = spl_team();
        team.penalty_shot_count = 1;
        team.add_penalty_goal();
        team.penalty_shot_count = 3;
        team.add_penalty_goal();
        assert_eq!(team.penalty_shot_flags, 0b101);
    }

    #[test]
    fn test_penalty_queue_fifo() {
        let mut team = spl_team();
        team.enqueue_penalty(10, Penalty::SplPlayerPushing);
        team.enqueue_penalty(20, Penalty::SplIllegalDefender);

        assert_eq!(team.pop_queued_penalty().unwrap().when_penalized, 10);
        assert_eq!(team.pop_queued_penalty().unwrap().penalty, Penalty::SplIllegalDefender);
        assert!(team.pop_queued_penalty().is_none());
    }

    #[test]
    fn test_reset_penalties_keeps_substitutes() {
        let mut team = spl_team();
        team.push_count = 3;
        team.players[0].penalize(Penalty::SplBallHolding, 5);
        team.players[1].ejected = true;
        team.enqueue_penalty(1, Penalty::SplObstruction);

        team.reset_penalties();

        assert_eq!(team.push_count, 0);
        assert_eq!(team.players[0].penalty, Penalty::None);
        assert!(!team.players[1].ejected);
        assert_eq!(team.players[5].penalty, Penalty::Substitute);
        assert!(team.penalty_queue.is_empty());
    }

    #[test]
    fn test_reset_penalty_times() {
        let mut team = spl_team();
        team.players[2].penalize(Penalty::SplInactivePlayer, 500);
        team.reset_penalty_times();
        assert_eq!(team.players[2].when_penalized, 0);
        assert_eq!(team.players[2].penalty, Penalty::SplInactivePlayer);
    }

    #[test]
    fn test_team_serialization() {
        let team = spl_team();
        let json = serde_json::to_string(&team).unwrap();
        let deserialized: TeamState = serde_json::from_str(&json).unwrap();
        assert_eq!(team, deserialized);
    }
}
