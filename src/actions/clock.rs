//! Clock tick and test-mode clock controls.

use crate::core::{GameState, PlayMode};

use super::{Action, ActionContext, Outcome};

/// Game time (ms) one `IncGameClock` gives back.
const GAME_CLOCK_INCREMENT: i64 = 60_000;

/// Periodic housekeeping: automatic Set after the ready time, the next half
/// after half the pause, and release of due coach messages.
pub(super) fn tick(ctx: &mut ActionContext<'_>) -> Outcome {
    let mut outcome = Outcome::none();
    let follow_up = next_automatic_action(ctx);

    if let Some(action) = follow_up {
        if action.can_execute(&ctx.view()) {
            tracing::debug!(action = %action.name(), "clock triggered action");
            outcome = action.execute(ctx);
        }
    }

    let released = ctx.state.release_coach_messages(ctx.wall);
    if released > 0 {
        tracing::trace!(released, "coach messages released");
    }
    outcome
}

fn next_automatic_action(ctx: &ActionContext<'_>) -> Option<Action> {
    let state = &*ctx.state;
    let clock = state.clock(ctx.wall);
    let rules = state.rules();

    match state.play_mode {
        PlayMode::Ready
            if clock.seconds_since(state.when_current_play_mode_began) >= rules.ready_time =>
        {
            Some(Action::Set)
        }
        PlayMode::Finished => {
            let pause = clock.remaining_pause_time()?;
            if state.first_half && pause <= rules.pause_time / 2 {
                Some(Action::SecondHalf)
            } else if !state.first_half && pause <= rules.pause_penalty_shoot_out_time / 2 {
                Some(Action::PenaltyShootout)
            } else {
                None
            }
        }
        _ => None,
    }
}

pub(super) fn reset(ctx: &mut ActionContext<'_>) -> Outcome {
    let now = ctx.now();
    let state = &mut *ctx.state;
    state.time_before_current_play_mode = 0;
    state.when_current_play_mode_began = now;
    state.when_manual_clock_changed = now;
    state.manual_remaining_offset = 0;
    Outcome::labeled("Time reset")
}

pub(super) fn pause(ctx: &mut ActionContext<'_>) -> Outcome {
    let now = ctx.now();
    let running = ctx.state.clock(ctx.wall).is_running();
    let state = &mut *ctx.state;

    if running {
        if state.manual_play {
            state.manual_remaining_offset += now - state.when_manual_clock_changed;
            state.manual_play = false;
        } else {
            state.when_manual_clock_changed = now;
            state.manual_pause = true;
        }
        Outcome::labeled("Time manual paused")
    } else {
        if state.manual_pause {
            // Game time stood still since the pause began.
            let unpaused = ctx.wall + state.manual_time_offset;
            state.manual_pause = false;
            state.manual_time_offset -= unpaused - state.when_manual_clock_changed;
        } else {
            state.when_manual_clock_changed = now;
            state.manual_play = true;
        }
        Outcome::labeled("Time manual running")
    }
}

pub(super) fn can_inc_game_clock(state: &GameState) -> bool {
    (state.play_mode != PlayMode::Playing
        && state.time_before_current_play_mode >= GAME_CLOCK_INCREMENT)
        || state.test_mode
}

pub(super) fn inc_game_clock(ctx: &mut ActionContext<'_>) -> Outcome {
    ctx.state.time_before_current_play_mode -= GAME_CLOCK_INCREMENT;
    Outcome::labeled("Increase Game Clock")
}

#[cfg(test)]
mod tests {
    use crate::actions::test_support::*;
    use crate::actions::Action;
    use crate::core::{PlayMode, Side, SplCoachMessage};
    use crate::rules::League;

    #[test]
    fn test_tick_sets_after_ready_time() {
        let mut state = new_state(League::Spl);
        label(&mut state, &Action::Ready, T0);

        assert_eq!(label(&mut state, &Action::ClockTick, T0 + 44_000), None);
        assert_eq!(state.play_mode, PlayMode::Ready);

        assert_eq!(label(&mut state, &Action::ClockTick, T0 + 45_000).as_deref(), Some("Set"));
        assert_eq!(state.play_mode, PlayMode::Set);
    }

    #[test]
    fn test_tick_starts_second_half_after_half_pause() {
        let mut state = new_state(League::Spl);
        state.play_mode = PlayMode::Finished;

        assert_eq!(label(&mut state, &Action::ClockTick, T0 + 200_000), None);
        assert!(state.first_half);

        let label = label(&mut state, &Action::ClockTick, T0 + 300_000);
        assert_eq!(label.as_deref(), Some("2nd Half"));
        assert!(!state.first_half);
    }

    #[test]
    fn test_tick_releases_coach_messages() {
        let mut state = new_state(League::Spl);
        let mut message = SplCoachMessage::new(9, b"attack");
        message.release_at = T0 + 3_000;
        state.coach_queue.push_back(message);

        label(&mut state, &Action::ClockTick, T0 + 1_000);
        assert_eq!(state.coach_queue.len(), 1);

        label(&mut state, &Action::ClockTick, T0 + 3_000);
        assert!(state.coach_queue.is_empty());
        assert_eq!(&state.team(Side::Right).coach_message.as_ref().unwrap()[..6], b"attack");
    }

    #[test]
    fn test_clock_controls_need_test_mode() {
        let mut state = new_state(League::Spl);
        assert_eq!(apply(&mut state, &Action::ClockReset, None, T0), None);
        assert_eq!(apply(&mut state, &Action::ClockPause, None, T0), None);
    }

    #[test]
    fn test_manual_pause_and_resume() {
        let mut state = new_state(League::Spl);
        state.test_mode = true;
        state.play_mode = PlayMode::Playing;

        assert_eq!(label(&mut state, &Action::ClockPause, T0 + 10_000).as_deref(), Some("Time manual paused"));
        assert!(state.manual_pause);
        assert_eq!(state.clock(T0 + 50_000).remaining_game_time(), 590);

        assert_eq!(label(&mut state, &Action::ClockPause, T0 + 50_000).as_deref(), Some("Time manual running"));
        assert!(!state.manual_pause);
        assert_eq!(state.manual_time_offset, -40_000);
        assert_eq!(state.clock(T0 + 55_000).remaining_game_time(), 585);
    }

    #[test]
    fn test_manual_run_while_stopped() {
        let mut state = new_state(League::Spl);
        state.test_mode = true;

        label(&mut state, &Action::ClockPause, T0);
        assert!(state.manual_play);
        assert!(state.clock(T0 + 20_000).is_running());
        assert_eq!(state.clock(T0 + 20_000).remaining_game_time(), 580);
    }

    #[test]
    fn test_clock_reset() {
        let mut state = new_state(League::Spl);
        state.test_mode = true;
        state.time_before_current_play_mode = 90_000;
        label(&mut state, &Action::ClockReset, T0 + 7_000);
        assert_eq!(state.time_before_current_play_mode, 0);
        assert_eq!(state.when_current_play_mode_began, T0 + 7_000);
    }

    #[test]
    fn test_inc_game_clock() {
        let mut state = new_state(League::Spl);
        state.play_mode = PlayMode::Ready;
        state.time_before_current_play_mode = 30_000;
        assert_eq!(apply(&mut state, &Action::IncGameClock, None, T0), None);

        state.time_before_current_play_mode = 90_000;
        label(&mut state, &Action::IncGameClock, T0);
        assert_eq!(state.time_before_current_play_mode, 30_000);
    }
}
