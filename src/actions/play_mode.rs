//! Play-mode transitions: Initial, Ready, Set, Playing, Finished.
//!
//! Each `fn x(ctx)` is a no-op returning `None` when the mode is already `x`.
//! `force_initial` and `force_ready` are shared with goals, timeouts and
//! stuck calls, which record their own label.

use crate::core::{GameState, Period, PlayMode, Side, TeamColor};

use super::period::change_side;
use super::ActionContext;

pub(super) fn can_initial(state: &GameState) -> bool {
    state.play_mode == PlayMode::Initial || state.test_mode
}

pub(super) fn can_ready(state: &GameState) -> bool {
    (state.play_mode == PlayMode::Initial
        && !any_timeout_active(state)
        && !state.referee_timeout_active
        && state.period != Period::PenaltyShootout)
        || state.play_mode == PlayMode::Ready
        || state.test_mode
}

pub(super) fn can_set(state: &GameState) -> bool {
    matches!(state.play_mode, PlayMode::Ready | PlayMode::Set)
        || (state.period == Period::PenaltyShootout
            && (state.play_mode != PlayMode::Playing || state.rules().penalty_shot_retries)
            && !any_timeout_active(state)
            && !state.referee_timeout_active)
        || state.test_mode
}

pub(super) fn can_play(state: &GameState) -> bool {
    matches!(state.play_mode, PlayMode::Set | PlayMode::Playing) || state.test_mode
}

pub(super) fn can_finish(state: &GameState) -> bool {
    state.play_mode != PlayMode::Initial || state.test_mode
}

pub(super) fn any_timeout_active(state: &GameState) -> bool {
    state.team(Side::Left).timeout_active || state.team(Side::Right).timeout_active
}

pub(super) fn initial(ctx: &mut ActionContext<'_>) -> Option<String> {
    if ctx.state.play_mode == PlayMode::Initial {
        return None;
    }
    force_initial(ctx);
    Some("Initial".into())
}

/// Enter Initial even if already there, restarting the mode timer.
pub(super) fn force_initial(ctx: &mut ActionContext<'_>) {
    let now = ctx.now();
    let state = &mut *ctx.state;
    if state.rules().returns_robots_on_stoppage {
        state.reset_penalty_times();
    }
    state.when_current_play_mode_began = now;
    state.play_mode = PlayMode::Initial;
}

pub(super) fn ready(ctx: &mut ActionContext<'_>) -> Option<String> {
    if ctx.state.play_mode == PlayMode::Ready {
        return None;
    }
    force_ready(ctx);
    Some("Ready".into())
}

/// Enter Ready unless already there. Returns whether the mode changed.
pub(super) fn force_ready(ctx: &mut ActionContext<'_>) -> bool {
    let now = ctx.now();
    let state = &mut *ctx.state;
    if state.play_mode == PlayMode::Ready {
        return false;
    }
    if state.rules().returns_robots_on_stoppage {
        state.reset_penalty_times();
    }
    if state.play_mode == PlayMode::Playing {
        state.add_time_in_current_play_mode(now);
    }
    state.when_current_play_mode_began = now;
    state.play_mode = PlayMode::Ready;
    true
}

pub(super) fn set(ctx: &mut ActionContext<'_>) -> Option<String> {
    let now = ctx.now();
    let state = &mut *ctx.state;
    if state.play_mode == PlayMode::Set {
        return None;
    }
    if state.rules().returns_robots_on_stoppage {
        state.reset_penalty_times();
    }
    if !state.is_play_off() && state.time_before_current_play_mode != 0 {
        state.add_time_in_current_play_mode(now);
    }
    state.when_current_play_mode_began = now;

    if state.period == Period::PenaltyShootout {
        state.time_before_current_play_mode = 0;
        if state.play_mode != PlayMode::Initial {
            state.next_kick_off = Some(match state.next_kick_off {
                Some(TeamColor::Blue) => TeamColor::Red,
                _ => TeamColor::Blue,
            });
            change_side(state);
        }
        if state.play_mode != PlayMode::Playing {
            if let Some(kicker) = state.next_kick_off {
                let team = state.team_by_color_mut(kicker);
                team.penalty_shot_count = team.penalty_shot_count.saturating_add(1);
            }
        }
    }

    state.play_mode = PlayMode::Set;
    Some("Set".into())
}

pub(super) fn play(ctx: &mut ActionContext<'_>) -> Option<String> {
    let now = ctx.now();
    let state = &mut *ctx.state;
    if state.play_mode == PlayMode::Playing {
        return None;
    }
    if !state.is_play_off() && state.time_before_current_play_mode != 0 {
        state.add_time_in_current_play_mode(now);
    }
    state.when_current_play_mode_began = now;
    state.play_mode = PlayMode::Playing;
    Some("Playing".into())
}

pub(super) fn finish(ctx: &mut ActionContext<'_>) -> Option<String> {
    if ctx.state.play_mode == PlayMode::Finished {
        return None;
    }
    force_finish(ctx);
    Some("Finished".into())
}

pub(super) fn force_finish(ctx: &mut ActionContext<'_>) {
    let now = ctx.now();
    let state = &mut *ctx.state;
    if state.rules().returns_robots_on_stoppage {
        state.reset_penalty_times();
    }
    state.add_time_in_current_play_mode(now);
    state.when_current_play_mode_began = now;
    state.play_mode = PlayMode::Finished;
}

#[cfg(test)]
mod tests {
    use crate::actions::test_support::*;
    use crate::actions::Action;
    use crate::core::{Period, PlayMode, Side, TeamColor, Uniform};
    use crate::rules::League;

    #[test]
    fn test_normal_sequence() {
        let mut state = new_state(League::Spl);

        assert_eq!(label(&mut state, &Action::Ready, T0 + 1_000).as_deref(), Some("Ready"));
        assert_eq!(state.play_mode, PlayMode::Ready);
        assert_eq!(state.when_current_play_mode_began, T0 + 1_000);

        assert_eq!(label(&mut state, &Action::Set, T0 + 2_000).as_deref(), Some("Set"));
        assert_eq!(label(&mut state, &Action::Play, T0 + 3_000).as_deref(), Some("Playing"));
        assert_eq!(state.play_mode, PlayMode::Playing);

        assert_eq!(label(&mut state, &Action::Finish, T0 + 63_000).as_deref(), Some("Finished"));
        assert_eq!(state.time_before_current_play_mode, 60_000);
    }

    #[test]
    fn test_illegal_transitions() {
        let mut state = new_state(League::Spl);
        assert_eq!(apply(&mut state, &Action::Set, None, T0), None);
        assert_eq!(apply(&mut state, &Action::Play, None, T0), None);
        assert_eq!(apply(&mut state, &Action::Finish, None, T0), None);
        assert_eq!(state.play_mode, PlayMode::Initial);
    }

    #[test]
    fn test_repeated_mode_is_no_op() {
        let mut state = new_state(League::Spl);
        label(&mut state, &Action::Ready, T0 + 1_000);
        assert_eq!(label(&mut state, &Action::Ready, T0 + 5_000), None);
        assert_eq!(state.when_current_play_mode_began, T0 + 1_000);
    }

    #[test]
    fn test_ready_blocked_during_timeout() {
        let mut state = new_state(League::Spl);
        state.teams[Side::Right].timeout_active = true;
        assert_eq!(apply(&mut state, &Action::Ready, None, T0), None);
    }

    #[test]
    fn test_ready_resets_penalty_times_when_robots_return() {
        let mut state = new_state(League::Spl);
        state.play_mode = PlayMode::Playing;
        state.teams[Side::Left]
            .robot_mut(Uniform::player(2))
            .unwrap()
            .penalize(crate::core::Penalty::SplInactivePlayer, T0);

        label(&mut state, &Action::Ready, T0 + 5_000);
        assert_eq!(state.team(Side::Left).robot(Uniform::player(2)).unwrap().when_penalized, 0);
    }

    #[test]
    fn test_shootout_set_counts_shot_and_switches_kicker() {
        let mut state = new_state(League::Spl);
        state.period = Period::PenaltyShootout;
        state.next_kick_off = Some(TeamColor::Blue);

        label(&mut state, &Action::Set, T0);
        assert_eq!(state.team_by_color(TeamColor::Blue).penalty_shot_count, 1);
        assert_eq!(state.next_kick_off, Some(TeamColor::Blue));

        label(&mut state, &Action::Play, T0 + 1_000);
        label(&mut state, &Action::Finish, T0 + 2_000);

        // Next shot: the other team kicks and the teams change sides.
        label(&mut state, &Action::Set, T0 + 3_000);
        assert_eq!(state.next_kick_off, Some(TeamColor::Red));
        assert_eq!(state.team_by_color(TeamColor::Red).penalty_shot_count, 1);
        assert_eq!(state.team(Side::Left).team_number, 9);
        assert_eq!(state.time_before_current_play_mode, 0);
    }

    #[test]
    fn test_testmode_allows_anything() {
        let mut state = new_state(League::Spl);
        state.test_mode = true;
        assert_eq!(label(&mut state, &Action::Play, T0).as_deref(), Some("Playing"));
        assert_eq!(label(&mut state, &Action::Initial, T0).as_deref(), Some("Initial"));
    }
}
