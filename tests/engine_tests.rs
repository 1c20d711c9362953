//! Match flow integration tests.
//!
//! These tests drive `Game` through whole match sequences the way a
//! referee would, checking legality, undo and what robots would see.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use game_controller::actions::{Action, ActionBoard, ActionTrigger, PenaltyCall};
use game_controller::config::{GameOptions, TeamInfo};
use game_controller::core::{
    ControllerRng, ManualClock, Penalty, Period, PlayMode, Side, TeamColor, Uniform, WallClock,
};
use game_controller::engine::Game;
use game_controller::net::{GameStateProtocol, GameStateProtocol9, GameStateSnapshot, ReceivingProtocol, RobotMessage, RobotStatus};
use game_controller::rules::League;
use game_controller::watcher::RobotWatcher;

const T0: i64 = 5_000_000;

fn game(league: League) -> (Game, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let options = GameOptions::new(league, TeamInfo::new(5, "Left"), TeamInfo::new(9, "Right"));
    let game = Game::new(&options, Arc::clone(&clock) as Arc<dyn WallClock>, ControllerRng::new(7));
    (game, clock)
}

fn user(game: &Game, action: Action) -> bool {
    game.apply(&action, ActionTrigger::User)
}

fn kick_off(game: &Game, clock: &ManualClock) {
    assert!(user(game, Action::Ready));
    clock.advance(10_000);
    assert!(user(game, Action::Set));
    clock.advance(5_000);
    assert!(user(game, Action::Play));
}

fn penalise(game: &Game, call: PenaltyCall, side: Side, number: u8) -> bool {
    user(game, Action::SelectPenalty(call))
        && user(
            game,
            Action::RobotButton {
                side,
                uniform: Uniform::player(number),
            },
        )
}

// =============================================================================
// Match Flow Tests
// =============================================================================

/// Test that a goal gives the kickoff to the conceding team and restarts in Ready.
#[test]
fn test_goal_flow() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    clock.advance(40_000);

    assert!(user(&game, Action::Goal { side: Side::Right, delta: 1 }));
    let state = game.snapshot();
    assert_eq!(state.team(Side::Right).score, 1);
    assert_eq!(state.play_mode, PlayMode::Ready);
    assert_eq!(state.next_kick_off, Some(state.team(Side::Left).color));

    clock.advance(10_000);
    assert!(user(&game, Action::Set));
    assert!(user(&game, Action::Play));
    assert_eq!(game.snapshot().play_mode, PlayMode::Playing);
}

/// Test that Ready after a goal only freezes the clock in play-off games.
#[test]
fn test_clock_in_ready_after_goal() {
    for (play_off, expected) in [(false, 510), (true, 540)] {
        let clock = Arc::new(ManualClock::new(T0));
        let options = GameOptions::new(League::Spl, TeamInfo::new(5, "Left"), TeamInfo::new(9, "Right"))
            .with_play_off(play_off);
        let game = Game::new(&options, Arc::clone(&clock) as Arc<dyn WallClock>, ControllerRng::new(7));
        kick_off(&game, &clock);
        clock.advance(60_000);
        user(&game, Action::Goal { side: Side::Left, delta: 1 });

        assert_eq!(game.snapshot().clock(clock.now_millis()).remaining_game_time(), 540);
        clock.advance(30_000);
        assert_eq!(
            game.snapshot().clock(clock.now_millis()).remaining_game_time(),
            expected,
            "play_off = {play_off}"
        );
    }
}

/// Test that a team timeout interrupts and resumes the normal period.
#[test]
fn test_timeout_interrupts_period() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    // Not while the ball is in play.
    assert!(!user(&game, Action::Timeout(Side::Right)));

    user(&game, Action::Goal { side: Side::Left, delta: 1 });
    assert!(user(&game, Action::Timeout(Side::Right)));
    assert_eq!(game.snapshot().period, Period::Timeout);
    assert_eq!(game.snapshot().play_mode, PlayMode::Initial);

    assert!(user(&game, Action::Timeout(Side::Right)));
    let state = game.snapshot();
    assert_eq!(state.period, Period::Normal);
    assert!(state.team(Side::Right).timeout_taken);
    // One per half.
    assert!(!game.can_execute(&Action::Timeout(Side::Right)));
}

/// Test that the second half swaps the teams' sides.
#[test]
fn test_half_time_swaps_sides() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    clock.advance(30_000);
    user(&game, Action::Goal { side: Side::Left, delta: 1 });
    assert!(user(&game, Action::Finish));

    assert!(user(&game, Action::SecondHalf));
    let state = game.snapshot();
    assert!(!state.first_half);
    assert_eq!(state.play_mode, PlayMode::Initial);
    assert_eq!(state.team(Side::Left).team_number, 9);
    assert_eq!(state.team(Side::Right).team_number, 5);
    assert_eq!(state.team(Side::Right).score, 1);
}

// =============================================================================
// Legality Tests
// =============================================================================

/// Test that rejected actions leave the state, timeline and subscribers untouched.
#[test]
fn test_illegal_actions_are_inert() {
    let (game, _) = game(League::HlAdult);
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    game.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let before = game.snapshot();

    for action in [
        Action::Play,
        Action::Goal { side: Side::Left, delta: 1 },
        Action::Out(Side::Right),
        Action::SelectPenalty(PenaltyCall::Holding),
        Action::SecondHalfOvertime,
    ] {
        assert!(!game.can_execute(&action), "{} should be illegal", action.name());
        assert!(!user(&game, action));
    }

    assert_eq!(*game.snapshot(), *before);
    assert_eq!(game.timeline().len(), 1);
    assert_eq!(notified.load(Ordering::SeqCst), 0);
}

/// Test that the action board only offers calls of the league's family.
#[test]
fn test_board_matches_league() {
    let spl = ActionBoard::new(League::Spl);
    let hl = ActionBoard::new(League::HlKid);

    assert!(spl.get("penalty.holding").is_some());
    assert!(spl.get("penalty.attack").is_none());
    assert!(spl.get("robot.left.coach").is_some());
    assert!(hl.get("penalty.attack").is_some());
    assert!(hl.get("penalty.holding").is_none());
    assert!(hl.get("robot.left.coach").is_none());

    for name in spl.names() {
        assert_eq!(spl.get(name).map(Action::name).as_deref(), Some(name));
    }
}

// =============================================================================
// Penalty Tests
// =============================================================================

/// Test that the fourth push of a team ejects the pushing robot.
#[test]
fn test_push_counting_through_engine() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);

    for number in 1..=4 {
        assert!(penalise(&game, PenaltyCall::Pushing, Side::Right, number));
    }
    let state = game.snapshot();
    let team = state.team(Side::Right);
    assert_eq!(team.push_count, 4);
    assert!(!team.robot(Uniform::player(3)).unwrap().ejected);
    assert!(team.robot(Uniform::player(4)).unwrap().ejected);
    assert_eq!(state.team(Side::Left).push_count, 0);
}

/// Test that ejections happen exactly at the league's push thresholds.
#[test]
fn test_push_thresholds() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    let thresholds = League::Spl.rules().pushes_to_ejection;

    for push in 1..=12u32 {
        let state = game.snapshot();
        let number = (1..=5u8)
            .find(|&n| !state.team(Side::Left).robot(Uniform::player(n)).unwrap().ejected)
            .unwrap();
        assert!(penalise(&game, PenaltyCall::Pushing, Side::Left, number));

        let state = game.snapshot();
        let robot = state.team(Side::Left).robot(Uniform::player(number)).unwrap();
        assert_eq!(state.team(Side::Left).push_count, push);
        assert_eq!(robot.ejected, thresholds.contains(&push), "push {push}");

        if !robot.ejected {
            clock.advance(46_000);
            assert!(user(
                &game,
                Action::RobotButton {
                    side: Side::Left,
                    uniform: Uniform::player(number),
                }
            ));
        }
    }
}

/// Test that penalty time counts down to zero and never below.
#[test]
fn test_penalty_countdown() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    assert!(penalise(&game, PenaltyCall::Holding, Side::Left, 2));

    let remaining = |game: &Game| {
        game.snapshot()
            .clock(clock.now_millis())
            .remaining_penalty_time(Side::Left, Uniform::player(2))
    };
    assert_eq!(remaining(&game), 45);
    clock.advance(20_000);
    assert_eq!(remaining(&game), 25);
    clock.advance(60_000);
    assert_eq!(remaining(&game), 0);

    // Free to come back.
    assert!(user(
        &game,
        Action::RobotButton {
            side: Side::Left,
            uniform: Uniform::player(2),
        }
    ));
    let state = game.snapshot();
    assert_eq!(state.team(Side::Left).robot(Uniform::player(2)).unwrap().penalty, Penalty::None);
}

/// Test that robot requests reach the game through the watcher after a side swap.
#[test]
fn test_watcher_follows_team_after_swap() {
    let (game, clock) = game(League::Spl);
    let watcher = RobotWatcher::new(League::Spl, [5, 9], Arc::clone(&clock) as Arc<dyn WallClock>);
    kick_off(&game, &clock);
    user(&game, Action::Finish);
    user(&game, Action::SecondHalf);

    let message = RobotMessage {
        team_number: 5,
        player_number: 3,
        status: RobotStatus::ManuallyPenalised,
    };
    assert!(watcher.update(&game, &message));

    let state = game.snapshot();
    let robot = state.team(Side::Right).robot(Uniform::player(3)).unwrap();
    assert_eq!(robot.penalty, Penalty::Manual);
    assert_eq!(state.team(Side::Left).robot(Uniform::player(3)).unwrap().penalty, Penalty::None);
}

// =============================================================================
// Undo Tests
// =============================================================================

/// Test that undo rewinds several entries with one confirmation.
#[test]
fn test_undo_several_entries() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    clock.advance(10_000);
    user(&game, Action::Out(Side::Left));
    user(&game, Action::Goal { side: Side::Right, delta: 1 });
    assert_eq!(game.timeline().len(), 6);

    assert!(user(&game, Action::Undo(3)));
    assert!(user(&game, Action::Undo(3)));
    let state = game.snapshot();
    assert_eq!(state.play_mode, PlayMode::Set);
    assert_eq!(state.team(Side::Right).score, 0);
    assert_eq!(game.timeline().len(), 3);
}

/// Test that the network keeps running while an undo waits for confirmation.
#[test]
fn test_network_action_while_undo_armed() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    user(&game, Action::Undo(1));

    let manual = Action::Manual {
        side: Side::Left,
        uniform: Uniform::player(4),
        unpenalise: false,
    };
    assert!(game.apply(&manual, ActionTrigger::Network));
    assert_eq!(game.undo_preview(), Some(1));

    // The confirmation rewinds the manual penalty it now follows.
    assert!(user(&game, Action::Undo(1)));
    let state = game.snapshot();
    assert_eq!(state.play_mode, PlayMode::Playing);
    assert_eq!(state.team(Side::Left).robot(Uniform::player(4)).unwrap().penalty, Penalty::None);
}

// =============================================================================
// Wire View Tests
// =============================================================================

/// Test that a mid-match state survives version 9 encoding.
#[test]
fn test_match_state_on_the_wire() {
    let (game, clock) = game(League::Spl);
    kick_off(&game, &clock);
    clock.advance(15_000);
    user(&game, Action::Goal { side: Side::Left, delta: 1 });
    penalise(&game, PenaltyCall::PickUpSpl, Side::Right, 5);

    let state = game.snapshot();
    let snapshot = GameStateSnapshot::capture(&state, clock.now_millis(), 15);
    let protocol = GameStateProtocol9::new(League::Spl, 77);
    let decoded = protocol.decode(&protocol.encode(&snapshot)).unwrap();

    assert_eq!(decoded.play_mode, PlayMode::Ready);
    assert_eq!(decoded.game_id, state.game_id());
    assert_eq!(decoded.instance_id, Some(77));
    let blue = decoded.team_by_color(TeamColor::Blue);
    assert_eq!(blue.team_number, 5);
    assert_eq!(blue.score, 1);
    let red = decoded.team_by_number(9).unwrap();
    assert_eq!(red.players[4].penalty, Penalty::SplRequestForPickup);
    assert!(red.players[4].secs_till_unpenalised > 0);
}
