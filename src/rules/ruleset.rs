//! Per-league rule constants.
//!
//! A `RuleSet` is selected once per match through `League::rules()` and
//! shared by `&'static` reference. All durations are in seconds.

use serde::Serialize;

/// Immutable league constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    /// Robots per team, including substitutes.
    pub team_size: u8,
    /// Robots allowed on the field at once.
    pub robots_playing: u8,
    /// Whether the league has a coach slot per team.
    pub has_coach: bool,
    /// Drop-in player mode (mixed teams).
    pub drop_in_mode: bool,

    /// Clock stops in Ready/Set during play-off games.
    pub play_off_time_stop: bool,
    pub half_time: i32,
    pub ready_time: i32,
    /// Pause between halves.
    pub pause_time: i32,
    /// Whether the first-half kickoff side may be chosen in Initial.
    pub allows_kickoff_choice: bool,
    /// Seconds after kickoff during which the ball may not be played.
    pub kickoff_time: i32,
    /// Grace after the kickoff window before "global game stuck" applies.
    pub min_duration_before_stuck: i32,

    pub has_overtime: bool,
    pub overtime_time: i32,
    /// Matches begin directly with a penalty shoot-out.
    pub start_with_penalty: bool,
    /// Pause before the penalty shoot-out (0 = none).
    pub pause_penalty_shoot_out_time: i32,
    pub penalty_shot_time: i32,
    /// A shot may be retaken after Playing.
    pub penalty_shot_retries: bool,
    pub penalty_shot_time_sudden_death: i32,
    pub number_of_penalty_shots_short: u8,
    pub number_of_penalty_shots_long: u8,

    /// Penalised robots return in Ready (penalty timers restart).
    pub returns_robots_on_stoppage: bool,
    pub timeout_time: i32,
    pub kickoff_to_opponent_after_timeout: bool,
    pub referee_timeout_time: i32,
    pub referee_timeout_available: bool,
    /// Timeout allotment resets each half.
    pub timeout_per_half: bool,
    /// Push counts at which the pushing robot is ejected.
    pub pushes_to_ejection: &'static [u32],
    /// Default for swapping uniform colors at each period change.
    pub color_change_auto: bool,

    pub supports_game_state_v7: bool,
    pub supports_game_state_v8: bool,
}

impl RuleSet {
    /// Number of penalty shots before sudden death.
    #[must_use]
    pub const fn regular_penalty_shots(&self, play_off: bool) -> u8 {
        if play_off {
            self.number_of_penalty_shots_long
        } else {
            self.number_of_penalty_shots_short
        }
    }

    /// Robot slots per team, including the coach slot.
    #[must_use]
    pub const fn robot_slots(&self) -> usize {
        self.team_size as usize + if self.has_coach { 1 } else { 0 }
    }

    /// Whether the team may field substitutes at all.
    #[must_use]
    pub const fn has_substitutes(&self) -> bool {
        self.team_size > self.robots_playing
    }
}

pub(crate) const SPL: RuleSet = RuleSet {
    team_size: 6,
    robots_playing: 5,
    has_coach: true,
    drop_in_mode: false,
    play_off_time_stop: true,
    half_time: 10 * 60,
    ready_time: 45,
    pause_time: 10 * 60,
    allows_kickoff_choice: false,
    kickoff_time: 10,
    min_duration_before_stuck: 15,
    has_overtime: false,
    overtime_time: 0,
    start_with_penalty: false,
    pause_penalty_shoot_out_time: 5 * 60,
    penalty_shot_time: 60,
    penalty_shot_retries: false,
    penalty_shot_time_sudden_death: 2 * 60,
    number_of_penalty_shots_short: 3,
    number_of_penalty_shots_long: 5,
    returns_robots_on_stoppage: true,
    timeout_time: 5 * 60,
    kickoff_to_opponent_after_timeout: true,
    referee_timeout_time: 10 * 60,
    referee_timeout_available: true,
    timeout_per_half: false,
    pushes_to_ejection: &[4, 6, 8, 10, 12],
    color_change_auto: false,
    supports_game_state_v7: false,
    supports_game_state_v8: false,
};

pub(crate) const SPL_DROP_IN: RuleSet = RuleSet {
    team_size: 5,
    robots_playing: 5,
    has_coach: false,
    drop_in_mode: true,
    pushes_to_ejection: &[],
    ..SPL
};

const HL: RuleSet = RuleSet {
    team_size: 6,
    robots_playing: 4,
    has_coach: false,
    drop_in_mode: false,
    play_off_time_stop: false,
    half_time: 10 * 60,
    ready_time: 30,
    pause_time: 5 * 60,
    allows_kickoff_choice: true,
    kickoff_time: 10,
    min_duration_before_stuck: 30,
    has_overtime: true,
    overtime_time: 5 * 60,
    start_with_penalty: false,
    pause_penalty_shoot_out_time: 0,
    penalty_shot_time: 60,
    penalty_shot_retries: true,
    penalty_shot_time_sudden_death: 2 * 60,
    number_of_penalty_shots_short: 5,
    number_of_penalty_shots_long: 5,
    returns_robots_on_stoppage: false,
    timeout_time: 2 * 60,
    kickoff_to_opponent_after_timeout: false,
    referee_timeout_time: 0,
    referee_timeout_available: false,
    timeout_per_half: true,
    pushes_to_ejection: &[],
    color_change_auto: true,
    supports_game_state_v7: true,
    supports_game_state_v8: true,
};

pub(crate) const HL_KID: RuleSet = HL;

pub(crate) const HL_TEEN: RuleSet = RuleSet {
    team_size: 4,
    robots_playing: 2,
    ..HL
};

pub(crate) const HL_ADULT: RuleSet = RuleSet {
    team_size: 2,
    robots_playing: 1,
    start_with_penalty: true,
    penalty_shot_time: 150,
    ..HL
};
