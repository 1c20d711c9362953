//! Period changes and timeouts.

use crate::core::{GameState, Period, PlayMode, Side, TeamColor};

use super::play_mode::{any_timeout_active, force_initial, force_ready};
use super::{ActionContext, Outcome};

/// Swap the teams' sides and reset everything that is counted per half.
///
/// Team state travels with the team; uniform colors are swapped only when
/// automatic color change is on and no shoot-out is running.
pub(crate) fn change_side(state: &mut GameState) {
    state.teams.swap();

    let in_shootout = state.period == Period::PenaltyShootout;
    if !in_shootout && state.color_change_auto() {
        let left = state.teams[Side::Left].color;
        state.teams[Side::Left].color = state.teams[Side::Right].color;
        state.teams[Side::Right].color = left;
    }

    if state.rules().timeout_per_half && !in_shootout {
        for (_, team) in state.teams.iter_mut() {
            team.timeout_taken = false;
        }
    }

    state.time_before_current_play_mode = 0;
    state.when_drop_in = 0;
    state.reset_penalties();
}

fn kick_off_side(state: &GameState) -> TeamColor {
    if state.left_side_kickoff {
        state.team(Side::Left).color
    } else {
        state.team(Side::Right).color
    }
}

fn overtime_reachable(state: &GameState) -> bool {
    state.rules().has_overtime
        && state.is_play_off()
        && state.period == Period::Normal
        && state.scores_level()
        && state.team(Side::Left).score > 0
}

// === Halves ===

pub(super) fn can_first_half(state: &GameState) -> bool {
    (state.first_half && state.period == Period::Normal) || state.test_mode
}

pub(super) fn can_second_half(state: &GameState) -> bool {
    (!state.first_half && state.period == Period::Normal)
        || (state.period == Period::Normal && state.play_mode == PlayMode::Finished)
        || state.test_mode
}

pub(super) fn can_first_half_overtime(state: &GameState) -> bool {
    (state.first_half && state.period == Period::Overtime)
        || (overtime_reachable(state)
            && state.play_mode == PlayMode::Finished
            && !state.first_half)
        || state.test_mode
}

pub(super) fn can_second_half_overtime(state: &GameState) -> bool {
    (!state.first_half && state.period == Period::Overtime)
        || (state.period == Period::Overtime && state.play_mode == PlayMode::Finished)
        || state.test_mode
}

pub(super) fn can_penalty_shootout(state: &GameState) -> bool {
    state.period == Period::PenaltyShootout
        || state.previous_period == Period::PenaltyShootout
        || (!state.first_half && state.play_mode == PlayMode::Finished && !overtime_reachable(state))
        || state.test_mode
}

/// Start a half. `whenCurrentPlayModeBegan` is left alone so the pause keeps
/// counting.
fn start_half(state: &mut GameState, first_half: bool, period: Period) {
    state.first_half = first_half;
    state.period = period;
    change_side(state);
    state.next_kick_off = Some(kick_off_side(state));
    state.play_mode = PlayMode::Initial;
}

fn reset_colors(state: &mut GameState) {
    if state.color_change_auto() {
        state.teams[Side::Left].color = TeamColor::Blue;
        state.teams[Side::Right].color = TeamColor::Red;
    }
}

pub(super) fn first_half(ctx: &mut ActionContext<'_>) -> Outcome {
    let state = &mut *ctx.state;
    if state.first_half && state.period != Period::PenaltyShootout {
        return Outcome::none();
    }
    start_half(state, true, Period::Normal);
    Outcome::labeled("1st Half")
}

pub(super) fn second_half(ctx: &mut ActionContext<'_>) -> Outcome {
    let state = &mut *ctx.state;
    if !state.first_half && state.period != Period::PenaltyShootout {
        return Outcome::none();
    }
    reset_colors(state);
    start_half(state, false, Period::Normal);
    Outcome::labeled("2nd Half")
}

pub(super) fn first_half_overtime(ctx: &mut ActionContext<'_>) -> Outcome {
    let state = &mut *ctx.state;
    if state.first_half && state.period != Period::PenaltyShootout {
        return Outcome::none();
    }
    reset_colors(state);
    start_half(state, true, Period::Overtime);
    Outcome::labeled("1st Half Extra Time")
}

pub(super) fn second_half_overtime(ctx: &mut ActionContext<'_>) -> Outcome {
    let state = &mut *ctx.state;
    if !state.first_half && state.period == Period::Overtime {
        return Outcome::none();
    }
    reset_colors(state);
    start_half(state, false, Period::Overtime);
    Outcome::labeled("2nd Half Extra Time")
}

pub(super) fn penalty_shootout(ctx: &mut ActionContext<'_>) -> Outcome {
    let state = &mut *ctx.state;
    if state.period == Period::PenaltyShootout {
        return Outcome::none();
    }
    state.period = Period::PenaltyShootout;
    state.play_mode = PlayMode::Initial;
    state.time_before_current_play_mode = 0;
    state.reset_penalties();
    if state.rules().timeout_per_half {
        for (_, team) in state.teams.iter_mut() {
            team.timeout_taken = false;
        }
    }
    Outcome::labeled("Penalty Shoot-out")
}

// === Timeouts ===

pub(super) fn can_timeout(state: &GameState, side: Side) -> bool {
    let team = state.team(side);
    team.timeout_active
        || (matches!(state.play_mode, PlayMode::Initial | PlayMode::Ready | PlayMode::Set)
            && !team.timeout_taken
            && !state.team(side.other()).timeout_active
            && state.period != Period::Timeout)
        || state.test_mode
}

/// Take away the shot of the team currently kicking.
fn void_current_shot(state: &mut GameState) {
    if let Some(kicker) = state.next_kick_off {
        let team = state.team_by_color_mut(kicker);
        team.penalty_shot_count = team.penalty_shot_count.saturating_sub(1);
    }
}

pub(super) fn timeout(ctx: &mut ActionContext<'_>, side: Side) -> Outcome {
    let color = ctx.state.team(side).color;

    if !ctx.state.team(side).timeout_active {
        let state = &mut *ctx.state;
        state.previous_period = state.period;
        state.period = Period::Timeout;
        let team = state.team_mut(side);
        team.timeout_active = true;
        team.timeout_taken = true;

        if state.previous_period != Period::PenaltyShootout {
            if state.rules().kickoff_to_opponent_after_timeout {
                state.next_kick_off = Some(color.other());
            }
        } else if state.play_mode == PlayMode::Set {
            void_current_shot(state);
        }

        force_initial(ctx);
        Outcome::labeled(format!("Timeout {}", color))
    } else {
        let state = &mut *ctx.state;
        state.period = state.previous_period;
        state.previous_period = Period::Timeout;
        state.team_mut(side).timeout_active = false;

        if state.period != Period::PenaltyShootout {
            force_ready(ctx);
        }
        Outcome::labeled(format!("End of Timeout {}", color))
    }
}

pub(super) fn can_referee_timeout(state: &GameState) -> bool {
    state.rules().referee_timeout_available
        && state.play_mode != PlayMode::Finished
        && !any_timeout_active(state)
}

pub(super) fn referee_timeout(ctx: &mut ActionContext<'_>) -> Outcome {
    let now = ctx.now();

    if !ctx.state.referee_timeout_active {
        let state = &mut *ctx.state;
        state.previous_period = state.period;
        state.period = Period::Timeout;
        state.referee_timeout_active = true;

        if state.play_mode == PlayMode::Playing {
            state.add_time_in_current_play_mode(now);
        }
        if state.previous_period == Period::PenaltyShootout
            && matches!(state.play_mode, PlayMode::Set | PlayMode::Playing)
        {
            void_current_shot(state);
        }

        force_initial(ctx);
        Outcome::labeled("Referee Timeout")
    } else {
        let state = &mut *ctx.state;
        state.period = state.previous_period;
        state.previous_period = Period::Timeout;
        state.referee_timeout_active = false;

        if state.period != Period::PenaltyShootout {
            force_ready(ctx);
        }
        Outcome::labeled("End of Referee Timeout")
    }
}
