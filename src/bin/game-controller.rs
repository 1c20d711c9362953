//! Headless game controller.
//!
//! Usage: `game-controller [league] [left team] [right team]`
//!
//! Defaults to an SPL match between teams 1 and 2. Actions are read from
//! stdin, one name per line (`ready`, `goal_inc.left`, `penalty.pushing`,
//! `robot.right.3`, ...). `labels` prints the recent history, end of input
//! stops the controller. Set `RUST_LOG` to change the log level.

use std::io::{self, BufRead};
use std::process::ExitCode;

use game_controller::actions::{ActionBoard, ActionTrigger};
use game_controller::config::{ControllerConfig, GameOptions, TeamInfo};
use game_controller::rules::League;
use game_controller::runtime::Controller;
use tracing_subscriber::EnvFilter;

fn parse_args() -> Result<GameOptions, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let league = match args.first() {
        Some(name) => League::from_name(name).ok_or_else(|| {
            let known: Vec<&str> = League::ALL.iter().map(|l| l.name()).collect();
            format!("unknown league {name:?}, expected one of {known:?}")
        })?,
        None => League::Spl,
    };
    let team = |index: usize, default: u8| -> Result<u8, String> {
        args.get(index)
            .map_or(Ok(default), |arg| arg.parse().map_err(|e| format!("bad team number {arg:?}: {e}")))
    };
    let left = team(1, 1)?;
    let right = team(2, 2)?;

    Ok(GameOptions::new(
        league,
        TeamInfo::new(left, format!("Team {left}")),
        TeamInfo::new(right, format!("Team {right}")),
    ))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let controller = match Controller::start(&ControllerConfig::default(), &options) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!(error = %e, "could not start");
            return ExitCode::FAILURE;
        }
    };
    let board = ActionBoard::new(options.league);
    let game = controller.game();

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let name = line.trim();
        match name {
            "" => {}
            "labels" => {
                for label in game.last_labels(10).iter().filter(|l| !l.is_empty()) {
                    println!("{label}");
                }
            }
            _ => match board.get(name) {
                Some(action) if game.apply(action, ActionTrigger::User) => {}
                Some(_) => println!("{name}: not allowed now"),
                None => println!("{name}: unknown action"),
            },
        }
        if controller.other_instance_active() {
            tracing::warn!("another game controller is active on this network");
        }
    }

    controller.shutdown();
    ExitCode::SUCCESS
}
