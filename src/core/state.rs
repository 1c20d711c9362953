//! Game state: the root aggregate of one match.
//!
//! ## Play mode and period
//!
//! `PlayMode` is the fast-changing phase (Initial, Ready, Set, Playing,
//! Finished). `Period` is the coarse phase (Normal, Overtime, penalty
//! shoot-out, Timeout). While `period == Timeout`, `previous_period` holds the
//! period to restore.
//!
//! ## Clock basis
//!
//! All timestamps are game-time milliseconds as returned by
//! `GameState::time`. Outside test mode game time equals wall time; the
//! manual fields let a referee pause or shift the clock.
//!
//! ## Teams
//!
//! Teams live in a `SidePair` addressed by physical side. Lookups by color and
//! by team number scan both slots.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::clock::ClockView;
use super::coach::SplCoachMessage;
use super::ids::{Side, SidePair, TeamColor};
use super::team::TeamState;
use crate::config::GameOptions;
use crate::rules::{League, RuleSet};

/// Fast-changing phase within a period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    Initial,
    Ready,
    Set,
    Playing,
    Finished,
}

impl PlayMode {
    /// Wire value.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            PlayMode::Initial => 0,
            PlayMode::Ready => 1,
            PlayMode::Set => 2,
            PlayMode::Playing => 3,
            PlayMode::Finished => 4,
        }
    }

    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(PlayMode::Initial),
            1 => Some(PlayMode::Ready),
            2 => Some(PlayMode::Set),
            3 => Some(PlayMode::Playing),
            4 => Some(PlayMode::Finished),
            _ => None,
        }
    }
}

/// Coarse phase of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Normal,
    PenaltyShootout,
    Overtime,
    Timeout,
}

impl Period {
    /// Wire value.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Period::Normal => 0,
            Period::PenaltyShootout => 1,
            Period::Overtime => 2,
            Period::Timeout => 3,
        }
    }

    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Period::Normal),
            1 => Some(Period::PenaltyShootout),
            2 => Some(Period::Overtime),
            3 => Some(Period::Timeout),
            _ => None,
        }
    }
}

/// The complete, cloneable state of one match.
///
/// Clones are cheap (two teams of at most six robots) and are what every
/// thread other than the mutator reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    // === Match setup (immutable) ===
    league: League,
    play_off: bool,
    color_change_auto: bool,
    /// Random id identifying this match on the network.
    game_id: u32,

    // === Phase ===
    pub play_mode: PlayMode,
    pub period: Period,
    pub previous_period: Period,
    pub first_half: bool,
    /// Absent means drop ball.
    pub next_kick_off: Option<TeamColor>,
    pub last_drop_in: Option<TeamColor>,
    /// Which side won the opening kickoff choice.
    pub left_side_kickoff: bool,
    pub referee_timeout_active: bool,
    pub test_mode: bool,

    // === Clock basis ===
    pub time_before_current_play_mode: i64,
    pub when_current_play_mode_began: i64,
    pub when_drop_in: i64,
    pub manual_pause: bool,
    pub manual_play: bool,
    pub when_manual_clock_changed: i64,
    pub manual_time_offset: i64,
    pub manual_remaining_offset: i64,

    // === Teams ===
    pub teams: SidePair<TeamState>,

    /// Accepted coach messages awaiting their release time.
    pub coach_queue: VecDeque<SplCoachMessage>,
}

impl GameState {
    /// Create the state at the start of a match.
    ///
    /// The left team wears blue, the right team red. `wall` seeds the clock.
    #[must_use]
    pub fn new(options: &GameOptions, game_id: u32, wall: i64) -> Self {
        let league = options.league;
        let (left, right) = (&options.left, &options.right);
        let rules = league.rules();

        Self {
            league,
            play_off: options.play_off,
            color_change_auto: options.color_change_auto(),
            game_id,
            play_mode: PlayMode::Initial,
            period: if rules.start_with_penalty {
                Period::PenaltyShootout
            } else {
                Period::Normal
            },
            previous_period: Period::Normal,
            first_half: true,
            next_kick_off: Some(options.initial_kick_off),
            last_drop_in: None,
            left_side_kickoff: true,
            referee_timeout_active: false,
            test_mode: false,
            time_before_current_play_mode: 0,
            when_current_play_mode_began: wall,
            when_drop_in: 0,
            manual_pause: false,
            manual_play: false,
            when_manual_clock_changed: 0,
            manual_time_offset: 0,
            manual_remaining_offset: 0,
            teams: SidePair::new(
                TeamState::new(left.number, left.name.clone(), TeamColor::Blue, rules),
                TeamState::new(right.number, right.name.clone(), TeamColor::Red, rules),
            ),
            coach_queue: VecDeque::new(),
        }
    }

    // === Setup ===

    #[must_use]
    pub fn league(&self) -> League {
        self.league
    }

    #[must_use]
    pub fn rules(&self) -> &'static RuleSet {
        self.league.rules()
    }

    #[must_use]
    pub fn is_play_off(&self) -> bool {
        self.play_off
    }

    #[must_use]
    pub fn color_change_auto(&self) -> bool {
        self.color_change_auto
    }

    #[must_use]
    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    // === Time ===

    /// Current game time in ms for the given wall-clock reading.
    #[must_use]
    pub fn time(&self, wall: i64) -> i64 {
        if self.manual_pause {
            self.when_manual_clock_changed
        } else {
            wall + self.manual_time_offset
        }
    }

    /// Clock arithmetic at the given wall-clock reading.
    #[must_use]
    pub fn clock(&self, wall: i64) -> ClockView<'_> {
        ClockView::new(self, wall)
    }

    /// Bank the time spent in the current play mode.
    pub fn add_time_in_current_play_mode(&mut self, now: i64) {
        self.time_before_current_play_mode += now - self.when_current_play_mode_began;
    }

    // === Teams ===

    #[must_use]
    pub fn team(&self, side: Side) -> &TeamState {
        &self.teams[side]
    }

    pub fn team_mut(&mut self, side: Side) -> &mut TeamState {
        &mut self.teams[side]
    }

    /// Side currently wearing `color`.
    #[must_use]
    pub fn side_of_color(&self, color: TeamColor) -> Side {
        if self.teams[Side::Left].color == color {
            Side::Left
        } else {
            Side::Right
        }
    }

    #[must_use]
    pub fn team_by_color(&self, color: TeamColor) -> &TeamState {
        &self.teams[self.side_of_color(color)]
    }

    pub fn team_by_color_mut(&mut self, color: TeamColor) -> &mut TeamState {
        let side = self.side_of_color(color);
        &mut self.teams[side]
    }

    /// Side of the team with `team_number`, if it plays in this match.
    #[must_use]
    pub fn side_of_team_number(&self, team_number: u8) -> Option<Side> {
        self.teams
            .iter()
            .find(|(_, t)| t.team_number == team_number)
            .map(|(side, _)| side)
    }

    #[must_use]
    pub fn team_by_number(&self, team_number: u8) -> Option<&TeamState> {
        self.side_of_team_number(team_number).map(|s| &self.teams[s])
    }

    /// Whether both teams have the same score.
    #[must_use]
    pub fn scores_level(&self) -> bool {
        self.teams[Side::Left].score == self.teams[Side::Right].score
    }

    // === Penalties ===

    /// Clear penalties, ejections and queued penalties on both teams and
    /// restart every penalty timer.
    pub fn reset_penalties(&mut self) {
        for (_, team) in self.teams.iter_mut() {
            team.reset_penalties();
            team.reset_penalty_times();
        }
    }

    /// Restart every penalty timer on both teams.
    pub fn reset_penalty_times(&mut self) {
        for (_, team) in self.teams.iter_mut() {
            team.reset_penalty_times();
        }
    }

    // === Coach messages ===

    /// Move every due coach message onto its team's outbound field.
    ///
    /// Returns the number of messages released.
    pub fn release_coach_messages(&mut self, wall: i64) -> usize {
        let mut released = 0;
        let mut pending = VecDeque::with_capacity(self.coach_queue.len());

        while let Some(message) = self.coach_queue.pop_front() {
            if message.remaining_delay(wall) > 0 {
                pending.push_back(message);
                continue;
            }
            if let Some(side) = self.side_of_team_number(message.team_number) {
                let team = &mut self.teams[side];
                if team.coach_message.is_some() {
                    tracing::debug!(team = team.team_number, "releasing coach message");
                    team.coach_message = Some(message.payload);
                    released += 1;
                }
            }
        }

        self.coach_queue = pending;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TeamInfo;
    use crate::core::ids::PlayerNumber;
    use crate::core::penalty::Penalty;

    fn state(league: League) -> GameState {
        let options = GameOptions::new(league, TeamInfo::new(5, "Left"), TeamInfo::new(9, "Right"));
        GameState::new(&options, 42, 1_000)
    }

    #[test]
    fn test_initial_state() {
        let s = state(League::Spl);
        assert_eq!(s.play_mode, PlayMode::Initial);
        assert_eq!(s.period, Period::Normal);
        assert!(s.first_half);
        assert_eq!(s.next_kick_off, Some(TeamColor::Blue));
        assert_eq!(s.team(Side::Left).color, TeamColor::Blue);
        assert_eq!(s.team(Side::Right).color, TeamColor::Red);
        assert_eq!(s.when_current_play_mode_began, 1_000);
        assert_eq!(s.game_id(), 42);
    }

    #[test]
    fn test_adult_starts_with_shootout() {
        let s = state(League::HlAdult);
        assert_eq!(s.period, Period::PenaltyShootout);
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(PlayMode::Playing.value(), 3);
        assert_eq!(PlayMode::from_value(4), Some(PlayMode::Finished));
        assert_eq!(PlayMode::from_value(5), None);
        assert_eq!(Period::Timeout.value(), 3);
        assert_eq!(Period::from_value(1), Some(Period::PenaltyShootout));
        assert_eq!(Period::from_value(9), None);
    }

    #[test]
    fn test_time_with_manual_fields() {
        let mut s = state(League::Spl);
        assert_eq!(s.time(5_000), 5_000);

        s.manual_time_offset = -300;
        assert_eq!(s.time(5_000), 4_700);

        s.manual_pause = true;
        s.when_manual_clock_changed = 2_000;
        assert_eq!(s.time(9_999), 2_000);
    }

    #[test]
    fn test_team_lookup_by_number_checks_both() {
        let s = state(League::Spl);
        assert_eq!(s.side_of_team_number(5), Some(Side::Left));
        assert_eq!(s.side_of_team_number(9), Some(Side::Right));
        assert_eq!(s.side_of_team_number(1), None);
        assert_eq!(s.team_by_number(9).unwrap().name, "Right");
    }

    #[test]
    fn test_team_lookup_by_color_after_swap() {
        let mut s = state(League::Spl);
        s.teams.swap();
        assert_eq!(s.side_of_color(TeamColor::Blue), Side::Right);
        assert_eq!(s.team_by_color(TeamColor::Red).team_number, 9);
    }

    #[test]
    fn test_reset_penalties_clears_times() {
        let mut s = state(League::Spl);
        s.team_mut(Side::Left)
            .player_mut(PlayerNumber::new(1))
            .unwrap()
            .penalize(Penalty::SplObstruction, 700);

        s.reset_penalties();

        let player = s.team(Side::Left).player(PlayerNumber::new(1)).unwrap();
        assert_eq!(player.penalty, Penalty::None);
        assert_eq!(player.when_penalized, 0);
    }

    #[test]
    fn test_release_coach_messages() {
        let mut s = state(League::Spl);
        let mut early = SplCoachMessage::new(5, b"early");
        early.release_at = 2_000;
        let mut late = SplCoachMessage::new(9, b"late");
        late.release_at = 8_000;
        s.coach_queue.push_back(late);
        s.coach_queue.push_back(early);

        assert_eq!(s.release_coach_messages(3_000), 1);
        assert_eq!(&s.team(Side::Left).coach_message.as_ref().unwrap()[..5], b"early");
        assert_eq!(s.coach_queue.len(), 1);

        assert_eq!(s.release_coach_messages(8_000), 1);
        assert_eq!(&s.team(Side::Right).coach_message.as_ref().unwrap()[..4], b"late");
        assert!(s.coach_queue.is_empty());
    }

    #[test]
    fn test_state_serialization() {
        let s = state(League::HlTeen);
        let json = serde_json::to_string(&s).unwrap();
        let deserialized: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(s, deserialized);
    }
}
