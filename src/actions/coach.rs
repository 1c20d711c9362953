//! Receipt of SPL coach messages.

use crate::core::{Penalty, SplCoachMessage, COACH_MESSAGE_RECEIVE_INTERVAL};

use super::{ActionContext, Outcome};

/// Queue a coach message for delayed release.
///
/// Messages from a coach penalised for coach motion, or arriving less than
/// `COACH_MESSAGE_RECEIVE_INTERVAL` after the team's last accepted one, are
/// dropped.
pub(super) fn receive(ctx: &mut ActionContext<'_>, message: &SplCoachMessage) -> Outcome {
    let wall = ctx.wall;
    let Some(side) = ctx.state.side_of_team_number(message.team_number) else {
        return Outcome::none();
    };

    let team = ctx.state.team_mut(side);
    let coach_penalised = team
        .coach
        .as_ref()
        .is_some_and(|coach| coach.penalty == Penalty::SplCoachMotion);
    if team.coach.is_none() || coach_penalised {
        tracing::trace!(team = message.team_number, "coach message from penalised coach dropped");
        return Outcome::none();
    }
    if wall - team.last_coach_message_received < COACH_MESSAGE_RECEIVE_INTERVAL {
        tracing::trace!(team = message.team_number, "coach message rate limited");
        return Outcome::none();
    }

    team.last_coach_message_received = wall;
    let mut queued = message.clone();
    queued.release_at = wall + ctx.rng.coach_delay();
    ctx.state.coach_queue.push_back(queued);
    Outcome::none()
}

#[cfg(test)]
mod tests {
    use crate::actions::test_support::*;
    use crate::actions::Action;
    use crate::core::{Penalty, Side, SplCoachMessage, Uniform, COACH_MESSAGE_MAX_DELAY, COACH_MESSAGE_MIN_DELAY};
    use crate::rules::League;

    #[test]
    fn test_message_queued_with_delay() {
        let mut state = new_state(League::Spl);
        let action = Action::CoachMessageReceived(SplCoachMessage::new(5, b"defend"));

        assert_eq!(apply(&mut state, &action, None, T0).unwrap().label, None);
        assert_eq!(state.coach_queue.len(), 1);

        let release = state.coach_queue[0].release_at - T0;
        assert!((COACH_MESSAGE_MIN_DELAY..COACH_MESSAGE_MAX_DELAY).contains(&release));
        assert_eq!(state.team(Side::Left).last_coach_message_received, T0);
    }

    #[test]
    fn test_rate_limit() {
        let mut state = new_state(League::Spl);
        let action = Action::CoachMessageReceived(SplCoachMessage::new(9, b"x"));

        apply(&mut state, &action, None, T0);
        apply(&mut state, &action, None, T0 + 9_999);
        assert_eq!(state.coach_queue.len(), 1);

        apply(&mut state, &action, None, T0 + 10_000);
        assert_eq!(state.coach_queue.len(), 2);
    }

    #[test]
    fn test_penalised_coach_ignored() {
        let mut state = new_state(League::Spl);
        state.teams[Side::Left]
            .robot_mut(Uniform::Coach)
            .unwrap()
            .penalize(Penalty::SplCoachMotion, T0);

        apply(&mut state, &Action::CoachMessageReceived(SplCoachMessage::new(5, b"x")), None, T0);
        assert!(state.coach_queue.is_empty());
    }

    #[test]
    fn test_unknown_team_illegal() {
        let mut state = new_state(League::Spl);
        let action = Action::CoachMessageReceived(SplCoachMessage::new(77, b"x"));
        assert_eq!(apply(&mut state, &action, None, T0), None);
    }
}
