//! Clock arithmetic and wall-clock sources.
//!
//! ## ClockView
//!
//! All derived times are pure functions of a `GameState` and a wall-clock
//! reading. `ClockView` binds the two so callers write
//! `state.clock(wall).remaining_game_time()` instead of threading `wall`
//! through every call.
//!
//! ## WallClock
//!
//! The engine never reads the system clock directly; it asks a `WallClock`.
//! `SystemClock` is the production source, `ManualClock` a settable source
//! for deterministic tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::ids::{Side, Uniform};
use super::penalty::Penalty;
use super::state::{GameState, Period, PlayMode};

/// Returned by `seconds_since` for the "never" timestamp 0.
pub const NEVER_SECONDS: i32 = 100_000;

/// A source of wall-clock milliseconds.
pub trait WallClock: Send + Sync {
    /// Milliseconds since the Unix epoch (or any fixed origin).
    fn now_millis(&self) -> i64;
}

/// The operating-system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as i64)
    }
}

/// A clock that only moves when told to.
///
/// ```
/// use game_controller::core::{ManualClock, WallClock};
///
/// let clock = ManualClock::new(1_000);
/// clock.advance(500);
/// assert_eq!(clock.now_millis(), 1_500);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    #[must_use]
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl WallClock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Derived times of a `GameState` at one wall-clock reading.
#[derive(Clone, Copy, Debug)]
pub struct ClockView<'a> {
    state: &'a GameState,
    wall: i64,
}

impl<'a> ClockView<'a> {
    #[must_use]
    pub fn new(state: &'a GameState, wall: i64) -> Self {
        Self { state, wall }
    }

    /// Current game time in ms.
    #[must_use]
    pub fn now(&self) -> i64 {
        self.state.time(self.wall)
    }

    /// Whole seconds elapsed since `millis`, or `NEVER_SECONDS` for 0.
    #[must_use]
    pub fn seconds_since(&self, millis: i64) -> i32 {
        if millis == 0 {
            NEVER_SECONDS
        } else {
            ((self.now() - millis) / 1000) as i32
        }
    }

    /// Seconds left of `duration` started at `millis`; may be negative.
    #[must_use]
    pub fn remaining_seconds(&self, millis: i64, duration: i32) -> i32 {
        duration - self.seconds_since(millis)
    }

    /// Length of the current period in seconds.
    #[must_use]
    pub fn period_duration(&self) -> i32 {
        self.duration_of(self.state.period)
    }

    fn duration_of(&self, period: Period) -> i32 {
        let state = self.state;
        let rules = state.rules();
        match period {
            Period::Normal => rules.half_time,
            Period::Overtime => rules.overtime_time,
            Period::PenaltyShootout => {
                let shots = state.team(Side::Left)
                    .penalty_shot_count
                    .max(state.team(Side::Right).penalty_shot_count);
                if shots > rules.regular_penalty_shots(state.is_play_off()) {
                    rules.penalty_shot_time_sudden_death
                } else {
                    rules.penalty_shot_time
                }
            }
            Period::Timeout => match state.previous_period {
                Period::Timeout => rules.half_time,
                previous => self.duration_of(previous),
            },
        }
    }

    /// Whether play time is frozen in the current play mode.
    fn is_time_frozen(&self) -> bool {
        let state = self.state;
        match state.play_mode {
            PlayMode::Initial | PlayMode::Finished => true,
            PlayMode::Ready | PlayMode::Set => {
                (state.is_play_off() && state.rules().play_off_time_stop)
                    || state.time_before_current_play_mode == 0
            }
            PlayMode::Playing => false,
        }
    }

    /// Seconds of the current period already played.
    #[must_use]
    pub fn time_played(&self) -> i32 {
        let state = self.state;
        if self.is_time_frozen() {
            let manual_running = if state.manual_play {
                self.wall - state.when_manual_clock_changed
            } else {
                0
            };
            ((state.time_before_current_play_mode
                + state.manual_remaining_offset
                + manual_running)
                / 1000) as i32
        } else {
            self.seconds_since(
                state.when_current_play_mode_began
                    - state.time_before_current_play_mode
                    - state.manual_remaining_offset,
            )
        }
    }

    /// Primary clock: seconds left in the current period (may be negative).
    #[must_use]
    pub fn remaining_game_time(&self) -> i32 {
        self.period_duration() - self.time_played()
    }

    /// Seconds left of the half-time or pre-shoot-out pause, if one is running.
    #[must_use]
    pub fn remaining_pause_time(&self) -> Option<i32> {
        let state = self.state;
        let rules = state.rules();
        let no_timeout = !state.team(Side::Left).timeout_active
            && !state.team(Side::Right).timeout_active;

        if state.period == Period::Normal
            && ((state.play_mode == PlayMode::Initial && !state.first_half && no_timeout)
                || (state.play_mode == PlayMode::Finished && state.first_half))
        {
            Some(self.remaining_seconds(state.when_current_play_mode_began, rules.pause_time))
        } else if rules.pause_penalty_shoot_out_time != 0
            && state.is_play_off()
            && state.scores_level()
            && ((state.play_mode == PlayMode::Initial
                && state.period == Period::PenaltyShootout
                && no_timeout)
                || (state.play_mode == PlayMode::Finished && !state.first_half))
        {
            Some(self.remaining_seconds(
                state.when_current_play_mode_began,
                rules.pause_penalty_shoot_out_time,
            ))
        } else {
            None
        }
    }

    /// The single secondary countdown shown to referees, if any.
    ///
    /// `kickoff_grace` is how many seconds past zero the kickoff-blocked
    /// countdown keeps suppressing the pause fallback.
    #[must_use]
    pub fn secondary_time(&self, kickoff_grace: i32) -> Option<i32> {
        let state = self.state;
        let rules = state.rules();
        let began = state.when_current_play_mode_began;

        let kickoff_blocked = if state.next_kick_off.is_some() {
            self.remaining_seconds(began, rules.kickoff_time)
        } else {
            0
        };
        let timeout_active = state.team(Side::Left).timeout_active
            || state.team(Side::Right).timeout_active;

        match state.play_mode {
            PlayMode::Initial if timeout_active => {
                Some(self.remaining_seconds(began, rules.timeout_time))
            }
            PlayMode::Initial if state.referee_timeout_active => {
                Some(self.remaining_seconds(began, rules.referee_timeout_time))
            }
            PlayMode::Ready => Some(self.remaining_seconds(began, rules.ready_time)),
            PlayMode::Playing
                if state.period != Period::PenaltyShootout
                    && kickoff_blocked >= -kickoff_grace =>
            {
                (kickoff_blocked > 0).then_some(kickoff_blocked)
            }
            _ => self.remaining_pause_time(),
        }
    }

    /// Seconds since the last drop-in, or -1 if there was none.
    #[must_use]
    pub fn drop_in_time(&self) -> i32 {
        if self.state.when_drop_in == 0 {
            -1
        } else {
            self.seconds_since(self.state.when_drop_in)
        }
    }

    /// Seconds the robot must stay penalised, never negative.
    ///
    /// Returns 0 for unknown robots.
    #[must_use]
    pub fn remaining_penalty_time(&self, side: Side, uniform: Uniform) -> i32 {
        let state = self.state;
        let Some(player) = state.team(side).robot(uniform) else {
            return 0;
        };
        let penalty = player.penalty;

        if matches!(penalty, Penalty::Manual | Penalty::Substitute | Penalty::None) {
            return 0;
        }

        let remaining = if state.play_mode == PlayMode::Ready
            && state.rules().returns_robots_on_stoppage
            && player.when_penalized >= state.when_current_play_mode_began
        {
            state.rules().ready_time - self.seconds_since(state.when_current_play_mode_began)
        } else {
            self.remaining_seconds(player.when_penalized, penalty.duration_secs())
        };
        remaining.max(0)
    }

    /// Whether the primary clock is counting down.
    #[must_use]
    pub fn is_running(&self) -> bool {
        let state = self.state;
        let stopped = match state.play_mode {
            PlayMode::Initial | PlayMode::Finished => true,
            PlayMode::Ready | PlayMode::Set => {
                (state.is_play_off() && state.rules().play_off_time_stop)
                    || state.time_before_current_play_mode == 0
            }
            PlayMode::Playing => false,
        };
        !(stopped || state.manual_pause) || state.manual_play
    }
}
