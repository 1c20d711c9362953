//! Goals, kickoffs and ball events.

use crate::core::{GameState, Period, PlayMode, Side};

use super::play_mode::{force_finish, force_ready};
use super::{ActionContext, Outcome};

pub(super) fn is_ball_in_play(state: &GameState) -> bool {
    state.play_mode == PlayMode::Playing || state.test_mode
}

pub(super) fn can_goal(state: &GameState, side: Side, delta: i8) -> bool {
    if state.test_mode {
        return delta > 0 || state.team(side).score > 0;
    }
    delta == 1
        && state.play_mode == PlayMode::Playing
        && (state.period != Period::PenaltyShootout
            || state.next_kick_off == Some(state.team(side).color))
}

pub(super) fn goal(ctx: &mut ActionContext<'_>, side: Side, delta: i8) -> Outcome {
    let state = &mut *ctx.state;
    let team = state.team_mut(side);
    let color = team.color;
    team.score = team.score.saturating_add_signed(delta);

    if delta != 1 {
        return Outcome::labeled(format!("Goal decrease for {}", color));
    }

    if state.period != Period::PenaltyShootout {
        state.next_kick_off = Some(color.other());
        force_ready(ctx);
    } else {
        state.team_mut(side).add_penalty_goal();
        force_finish(ctx);
    }
    Outcome::labeled(format!("Goal for {}", color))
}

pub(super) fn can_kick_off(state: &GameState, side: Side) -> bool {
    let color = state.team(side).color;
    state.next_kick_off == Some(color) || kick_off_choice_open(state) || state.test_mode
}

fn kick_off_choice_open(state: &GameState) -> bool {
    state.rules().allows_kickoff_choice
        && state.period == Period::Normal
        && state.first_half
        && state.play_mode == PlayMode::Initial
}

pub(super) fn kick_off(ctx: &mut ActionContext<'_>, side: Side) -> Outcome {
    let state = &mut *ctx.state;
    let color = state.team(side).color;
    if state.next_kick_off == Some(color) {
        return Outcome::none();
    }
    state.next_kick_off = Some(color);
    if kick_off_choice_open(state) {
        state.left_side_kickoff = side == Side::Left;
    }
    Outcome::labeled(format!("Kickoff {}", color))
}

pub(super) fn global_stuck(ctx: &mut ActionContext<'_>, side: Side) -> Outcome {
    let clock = ctx.state.clock(ctx.wall);
    let rules = ctx.state.rules();
    let in_kickoff_window = clock.remaining_seconds(
        ctx.state.when_current_play_mode_began,
        rules.kickoff_time + rules.min_duration_before_stuck,
    ) > 0;

    let color = ctx.state.team(side).color;
    let kicker = color.other();
    ctx.state.next_kick_off = Some(kicker);
    force_ready(ctx);

    if in_kickoff_window {
        Outcome::labeled(format!("Kickoff Goal {}", color))
    } else {
        Outcome::labeled(format!("Global Game Stuck, Kickoff {}", kicker))
    }
}

pub(super) fn out(ctx: &mut ActionContext<'_>, side: Side) -> Outcome {
    let now = ctx.now();
    let state = &mut *ctx.state;
    let color = state.team(side).color;
    state.when_drop_in = now;
    state.last_drop_in = Some(color);
    Outcome::labeled(format!("Out by {}", color))
}

pub(super) fn drop_ball(ctx: &mut ActionContext<'_>) -> Outcome {
    ctx.state.next_kick_off = None;
    force_ready(ctx);
    Outcome::labeled("Dropped Ball")
}
