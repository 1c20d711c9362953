//! Cost of one broadcast cycle: snapshot capture plus encoding per version.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use game_controller::actions::{Action, ActionTrigger, PenaltyCall};
use game_controller::config::{GameOptions, TeamInfo};
use game_controller::core::{ControllerRng, ManualClock, Side, Uniform, WallClock};
use game_controller::engine::Game;
use game_controller::net::{protocols_for, GameStateProtocol, GameStateSnapshot, ReceivingProtocol};
use game_controller::rules::League;

fn busy_game(league: League, call: PenaltyCall) -> (Game, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let options = GameOptions::new(league, TeamInfo::new(3, "Home"), TeamInfo::new(8, "Away"));
    let game = Game::new(&options, Arc::clone(&clock) as Arc<dyn WallClock>, ControllerRng::new(1));

    for action in [Action::Ready, Action::Set, Action::Play] {
        game.apply(&action, ActionTrigger::User);
        clock.advance(2_000);
    }
    game.apply(&Action::SelectPenalty(call), ActionTrigger::User);
    game.apply(
        &Action::RobotButton {
            side: Side::Right,
            uniform: Uniform::player(2),
        },
        ActionTrigger::User,
    );
    game.apply(&Action::Out(Side::Left), ActionTrigger::User);
    clock.advance(5_000);
    (game, clock)
}

fn bench_capture(c: &mut Criterion) {
    let (game, clock) = busy_game(League::Spl, PenaltyCall::Holding);
    let state = game.snapshot();
    c.bench_function("capture_spl", |b| {
        b.iter(|| GameStateSnapshot::capture(black_box(&state), clock.now_millis(), 15));
    });
}

fn bench_encode(c: &mut Criterion) {
    for (league, call) in [
        (League::Spl, PenaltyCall::Holding),
        (League::HlKid, PenaltyCall::Attack),
    ] {
        let (game, clock) = busy_game(league, call);
        let snapshot = GameStateSnapshot::capture(&game.snapshot(), clock.now_millis(), 15);

        let mut group = c.benchmark_group(format!("encode_{}", league.name()));
        for protocol in protocols_for(league, 0x5EED) {
            group.bench_function(format!("v{}", protocol.version()), |b| {
                b.iter(|| protocol.encode(black_box(&snapshot)));
            });
        }
        group.finish();
    }
}

fn bench_decode(c: &mut Criterion) {
    let (game, clock) = busy_game(League::HlKid, PenaltyCall::Attack);
    let snapshot = GameStateSnapshot::capture(&game.snapshot(), clock.now_millis(), 15);

    let mut group = c.benchmark_group("decode_hl_kid");
    for protocol in protocols_for(League::HlKid, 0x5EED) {
        let bytes = protocol.encode(&snapshot);
        group.bench_function(format!("v{}", protocol.version()), |b| {
            b.iter(|| protocol.decode(black_box(&bytes)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_capture, bench_encode, bench_decode);
criterion_main!(benches);
