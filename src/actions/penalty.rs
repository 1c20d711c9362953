//! Penalty calls and robot buttons.
//!
//! ## Two steps
//!
//! A referee first chooses a `PenaltyCall` (`Action::SelectPenalty`), then
//! presses the robot it applies to (`Action::RobotButton`). Without an armed
//! call the robot button unpenalises, or lets a substitute enter.
//!
//! ## Availability
//!
//! Calls exist per league family. A call of the other family is never legal,
//! so a Humanoid League match cannot end up holding an SPL penalty code.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Penalty, PlayMode, PlayerState, Side, Uniform};
use crate::rules::LeagueFamily;

use super::{ActionContext, Outcome, StateView};

/// A penalty kind a referee may arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PenaltyCall {
    // Both families
    Pushing,
    Substitute,

    // SPL
    Leaving,
    Fallen,
    Inactive,
    Defender,
    Holding,
    Hands,
    PickUpSpl,
    CoachMotion,
    TeammatePushing,

    // Humanoid League
    BallManipulation,
    Attack,
    Defense,
    PickUpHl,
    Service,
}

impl PenaltyCall {
    pub const ALL: [PenaltyCall; 16] = [
        PenaltyCall::Pushing,
        PenaltyCall::Substitute,
        PenaltyCall::Leaving,
        PenaltyCall::Fallen,
        PenaltyCall::Inactive,
        PenaltyCall::Defender,
        PenaltyCall::Holding,
        PenaltyCall::Hands,
        PenaltyCall::PickUpSpl,
        PenaltyCall::CoachMotion,
        PenaltyCall::TeammatePushing,
        PenaltyCall::BallManipulation,
        PenaltyCall::Attack,
        PenaltyCall::Defense,
        PenaltyCall::PickUpHl,
        PenaltyCall::Service,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PenaltyCall::Pushing => "pushing",
            PenaltyCall::Substitute => "substitute",
            PenaltyCall::Leaving => "leaving",
            PenaltyCall::Fallen => "fallen",
            PenaltyCall::Inactive => "inactive",
            PenaltyCall::Defender => "defender",
            PenaltyCall::Holding => "holding",
            PenaltyCall::Hands => "hands",
            PenaltyCall::PickUpSpl => "pick_up",
            PenaltyCall::CoachMotion => "coach_motion",
            PenaltyCall::TeammatePushing => "teammate_pushing",
            PenaltyCall::BallManipulation => "ball_manipulation",
            PenaltyCall::Attack => "attack",
            PenaltyCall::Defense => "defense",
            PenaltyCall::PickUpHl => "pick_up_hl",
            PenaltyCall::Service => "service",
        }
    }

    /// League family the call belongs to; `None` for calls of both.
    #[must_use]
    pub const fn family(self) -> Option<LeagueFamily> {
        match self {
            PenaltyCall::Pushing | PenaltyCall::Substitute => None,
            PenaltyCall::Leaving
            | PenaltyCall::Fallen
            | PenaltyCall::Inactive
            | PenaltyCall::Defender
            | PenaltyCall::Holding
            | PenaltyCall::Hands
            | PenaltyCall::PickUpSpl
            | PenaltyCall::CoachMotion
            | PenaltyCall::TeammatePushing => Some(LeagueFamily::Spl),
            PenaltyCall::BallManipulation
            | PenaltyCall::Attack
            | PenaltyCall::Defense
            | PenaltyCall::PickUpHl
            | PenaltyCall::Service => Some(LeagueFamily::Humanoid),
        }
    }

    /// Whether the call may be armed in the given state.
    #[must_use]
    pub fn can_execute(self, state: &GameState) -> bool {
        let family = state.league().family();
        if self.family().is_some_and(|f| f != family) {
            return false;
        }

        let rules = state.rules();
        let mode = state.play_mode;
        let in_mode = |modes: &[PlayMode]| modes.contains(&mode) || state.test_mode;

        match self {
            PenaltyCall::Pushing | PenaltyCall::Leaving | PenaltyCall::Inactive => {
                in_mode(&[PlayMode::Ready, PlayMode::Playing])
            }
            PenaltyCall::Fallen => in_mode(&[PlayMode::Ready, PlayMode::Set, PlayMode::Playing]),
            PenaltyCall::Defender
            | PenaltyCall::Holding
            | PenaltyCall::Hands
            | PenaltyCall::BallManipulation
            | PenaltyCall::Attack
            | PenaltyCall::Defense => in_mode(&[PlayMode::Playing]),
            PenaltyCall::PickUpSpl | PenaltyCall::PickUpHl | PenaltyCall::Service => true,
            PenaltyCall::CoachMotion => rules.has_coach,
            PenaltyCall::Substitute => rules.has_substitutes(),
            PenaltyCall::TeammatePushing => {
                rules.drop_in_mode && in_mode(&[PlayMode::Ready, PlayMode::Playing])
            }
        }
    }

    /// Whether the armed call may be applied to a robot with `penalty`.
    fn applies_to(self, penalty: Penalty, uniform: Uniform, state: &GameState) -> bool {
        let coach = uniform.is_coach();
        match self {
            PenaltyCall::PickUpHl | PenaltyCall::Service => {
                penalty != Penalty::HlService && penalty != Penalty::Substitute
            }
            PenaltyCall::PickUpSpl => {
                penalty != Penalty::SplRequestForPickup && penalty != Penalty::Substitute
            }
            PenaltyCall::Substitute => {
                let spl_keeper =
                    state.league().is_spl_family() && uniform == Uniform::player(1);
                penalty != Penalty::Substitute && !coach && !spl_keeper
            }
            PenaltyCall::CoachMotion => coach && penalty != Penalty::SplCoachMotion,
            _ => penalty == Penalty::None && !coach,
        }
    }

    /// Stamp this call onto one robot.
    fn apply(self, ctx: &mut ActionContext<'_>, side: Side, uniform: Uniform) -> Outcome {
        let now = ctx.now();
        let state = &mut *ctx.state;
        let family = state.league().family();
        let playing = state.play_mode == PlayMode::Playing;
        let ejection_thresholds = state.rules().pushes_to_ejection;

        let team = state.team_mut(side);
        let color = team.color;
        let robot_label = |what: &str| format!("{} {} {}", what, color, uniform);

        if self == PenaltyCall::Substitute {
            let current = team
                .robot(uniform)
                .map(|p| (p.when_penalized, p.penalty))
                .filter(|(_, penalty)| *penalty != Penalty::None);
            if let Some((when, penalty)) = current {
                team.enqueue_penalty(when, penalty);
            }
        }

        if self == PenaltyCall::Pushing && playing {
            team.push_count += 1;
        }
        let push_count = team.push_count;

        let Some(player) = team.robot_mut(uniform) else {
            return Outcome::none();
        };

        let label = match self {
            PenaltyCall::Pushing => {
                let (penalty, what) = match family {
                    LeagueFamily::Spl => (Penalty::SplPlayerPushing, "Player Pushing"),
                    LeagueFamily::Humanoid => (Penalty::HlPhysicalContact, "Physical Contact"),
                };
                player.penalize(penalty, now);
                if playing && ejection_thresholds.contains(&push_count) {
                    player.ejected = true;
                }
                robot_label(what)
            }
            PenaltyCall::CoachMotion => {
                player.penalize(Penalty::SplCoachMotion, now);
                player.ejected = true;
                format!("Coach Motion {}", color)
            }
            PenaltyCall::TeammatePushing => robot_label("Teammate Pushing"),
            PenaltyCall::PickUpSpl => {
                if player.penalty == Penalty::None {
                    player.when_penalized = now;
                }
                player.penalty = Penalty::SplRequestForPickup;
                robot_label("Request for PickUp")
            }
            PenaltyCall::PickUpHl => {
                if player.penalty == Penalty::None {
                    player.when_penalized = now;
                }
                player.penalty = Penalty::HlPickupOrIncapable;
                robot_label("Request for PickUp / Incapable Player")
            }
            PenaltyCall::Service => {
                let what = if player.penalty == Penalty::None {
                    player.when_penalized = now;
                    "Request for Service"
                } else {
                    "Additional Request for Service"
                };
                player.penalty = Penalty::HlService;
                robot_label(what)
            }
            PenaltyCall::Leaving => stamp(player, Penalty::SplLeavingTheField, now, robot_label("Leaving the Field")),
            PenaltyCall::Fallen => stamp(player, Penalty::SplObstruction, now, robot_label("Fallen Robot")),
            PenaltyCall::Inactive => stamp(player, Penalty::SplInactivePlayer, now, robot_label("Inactive Player")),
            PenaltyCall::Defender => stamp(player, Penalty::SplIllegalDefender, now, robot_label("Illegal Defender")),
            PenaltyCall::Holding => stamp(player, Penalty::SplBallHolding, now, robot_label("Ball Holding")),
            PenaltyCall::Hands => stamp(player, Penalty::SplPlayingWithHands, now, robot_label("Playing with Hands")),
            PenaltyCall::BallManipulation => {
                stamp(player, Penalty::HlBallManipulation, now, robot_label("Ball Manipulation"))
            }
            PenaltyCall::Attack => stamp(player, Penalty::HlIllegalAttack, now, robot_label("Illegal Attack")),
            PenaltyCall::Defense => stamp(player, Penalty::HlIllegalDefense, now, robot_label("Illegal Defense")),
            PenaltyCall::Substitute => stamp(player, Penalty::Substitute, now, robot_label("Leaving Player")),
        };
        Outcome::labeled(label)
    }
}

fn stamp(player: &mut PlayerState, penalty: Penalty, now: i64, label: String) -> String {
    player.penalize(penalty, now);
    label
}

/// Legality of pressing a robot's button.
pub(super) fn can_press_robot(view: &StateView<'_>, side: Side, uniform: Uniform) -> bool {
    let state = view.state;
    let Some(robot) = state.team(side).robot(uniform) else {
        return false;
    };
    if state.test_mode {
        return true;
    }
    if robot.ejected {
        return false;
    }

    let penalty = robot.penalty;
    match view.armed_penalty() {
        Some(call) => call.applies_to(penalty, uniform, state),
        None => {
            let rules = state.rules();
            let served = view.clock().remaining_penalty_time(side, uniform) == 0
                || state.league().family() == LeagueFamily::Humanoid;
            let bench_has_room = penalty != Penalty::Substitute
                || state.team(side).robots_in_play() < usize::from(rules.robots_playing);
            penalty != Penalty::None && served && bench_has_room && !uniform.is_coach()
        }
    }
}

/// Press a robot's button: substitute entry, armed call, or unpenalise.
pub(super) fn press_robot(ctx: &mut ActionContext<'_>, side: Side, uniform: Uniform) -> Outcome {
    let now = ctx.now();
    let armed = ctx.view().armed_penalty();
    let humanoid = ctx.state.league().family() == LeagueFamily::Humanoid;
    let color = ctx.state.team(side).color;
    let Some(penalty) = ctx.state.team(side).robot(uniform).map(|p| p.penalty) else {
        return Outcome::none();
    };

    if penalty == Penalty::Substitute && !uniform.is_coach() {
        let team = ctx.state.team_mut(side);
        let entry = team.pop_queued_penalty();
        if let Some(player) = team.robot_mut(uniform) {
            match entry {
                Some(queued) => player.penalize(queued.penalty, queued.when_penalized),
                None if humanoid => player.penalize(Penalty::None, now),
                None => player.penalize(Penalty::SplRequestForPickup, now),
            }
        }
        return Outcome::labeled(format!("Entering Player {} {}", color, uniform));
    }

    if let Some(call) = armed {
        return call.apply(ctx, side, uniform);
    }

    if penalty == Penalty::None {
        return Outcome::none();
    }
    if let Some(player) = ctx.state.team_mut(side).robot_mut(uniform) {
        player.penalty = Penalty::None;
    }
    Outcome::labeled(format!("Unpenalised {} {}", color, uniform))
}

/// A robot penalised or unpenalised itself.
pub(super) fn manual(ctx: &mut ActionContext<'_>, side: Side, uniform: Uniform, unpenalise: bool) -> Outcome {
    let now = ctx.now();
    let state = &mut *ctx.state;
    let logged = !matches!(state.play_mode, PlayMode::Initial | PlayMode::Finished);
    let team = state.team_mut(side);
    let color = team.color;
    let Some(player) = team.robot_mut(uniform) else {
        return Outcome::none();
    };

    let what = if unpenalise {
        player.penalty = Penalty::None;
        "Manually Unpenalised"
    } else {
        player.penalize(Penalty::Manual, now);
        "Manually Penalised"
    };

    if logged {
        Outcome::labeled(format!("{} {} {}", what, color, uniform))
    } else {
        Outcome::none()
    }
}
