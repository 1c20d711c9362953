//! Process wiring for one match.
//!
//! `Controller::start` binds every socket first, so a port that cannot be
//! bound fails startup before any thread runs. It then starts:
//!
//! | Thread | Job |
//! |--------|-----|
//! | `gc-clock` | `ClockTick` every tick period, liveness sweep |
//! | `gc-sender` | game-state broadcast |
//! | `gc-status` | robot status packets into the `RobotWatcher` |
//! | `gc-coach` | coach packets into the game (leagues with a coach) |
//! | `gc-instances` | other-controller detection (optional) |
//!
//! Dropping the controller raises the stop flag and joins every thread; each
//! loop notices within one receive timeout or period.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::actions::{Action, ActionTrigger};
use crate::config::{ControllerConfig, GameOptions};
use crate::core::{ControllerRng, SplCoachMessage, SystemClock, WallClock};
use crate::engine::Game;
use crate::error::{Error, Result};
use crate::net::{
    protocols_for, robot_status_protocols, Broadcaster, InstanceWatcher, MessageReceiver,
    Protocols, SplCoachProtocol2,
};
use crate::watcher::RobotWatcher;

/// A running match with all of its network threads.
pub struct Controller {
    game: Arc<Game>,
    watcher: Arc<RobotWatcher>,
    instances: Option<Arc<InstanceWatcher>>,
    instance_id: u32,
    robot_status_port: u16,
    coach_port: Option<u16>,
    stop: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
}

impl Controller {
    /// Start a match on the system clock.
    pub fn start(config: &ControllerConfig, options: &GameOptions) -> Result<Self> {
        Self::start_with_clock(config, options, Arc::new(SystemClock))
    }

    /// Start a match on the given clock.
    pub fn start_with_clock(
        config: &ControllerConfig,
        options: &GameOptions,
        clock: Arc<dyn WallClock>,
    ) -> Result<Self> {
        let league = options.league;
        let teams = [options.left.number, options.right.number];
        let timeout = Duration::from_millis(config.receive_timeout_ms);

        let mut rng = ControllerRng::from_optional_seed(config.seed);
        let instance_id = rng.next_id();
        let game = Arc::new(Game::new(options, Arc::clone(&clock), rng));
        let watcher = Arc::new(RobotWatcher::new(league, teams, Arc::clone(&clock)));

        let broadcaster = Broadcaster::bind(
            SocketAddr::from((config.broadcast_address, config.game_state_port)),
            protocols_for(league, instance_id),
            config.kickoff_grace_secs,
        )?;
        let status = MessageReceiver::bind(
            "gc-status",
            config.robot_status_port,
            timeout,
            robot_status_protocols(),
        )?;
        let coach = if league.rules().has_coach {
            let protocols: Protocols<SplCoachMessage> = vec![Box::new(SplCoachProtocol2::new(teams))];
            Some(MessageReceiver::bind("gc-coach", config.coach_port, timeout, protocols)?)
        } else {
            None
        };
        let instances = if config.detect_other_instances {
            match InstanceWatcher::bind(league, config.game_state_port, timeout) {
                Ok(receiver) => {
                    let watcher = InstanceWatcher::new(instance_id, config.instance_window_ms, Arc::clone(&clock));
                    Some((Arc::new(watcher), receiver))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "other controllers will not be detected");
                    None
                }
            }
        } else {
            None
        };

        let mut controller = Self {
            game,
            watcher,
            instances: instances.as_ref().map(|(watcher, _)| Arc::clone(watcher)),
            instance_id,
            robot_status_port: status.local_addr()?.port(),
            coach_port: coach.as_ref().map(|c| c.local_addr()).transpose()?.map(|a| a.port()),
            stop: Arc::new(AtomicBool::new(false)),
            threads: Vec::new(),
        };

        // A failed spawn drops `controller`, which stops what already runs.
        controller.spawn_ticker(Duration::from_millis(config.tick_period_ms))?;
        let handle = broadcaster.spawn(
            Arc::clone(&controller.game),
            Duration::from_millis(config.send_period_ms),
            Arc::clone(&controller.stop),
        )?;
        controller.threads.push(handle);

        let (game, watcher) = (Arc::clone(&controller.game), Arc::clone(&controller.watcher));
        let handle = status.spawn(Arc::clone(&controller.stop), move |message| {
            watcher.update(&game, &message);
        })?;
        controller.threads.push(handle);

        if let Some(coach) = coach {
            let (game, watcher) = (Arc::clone(&controller.game), Arc::clone(&controller.watcher));
            let handle = coach.spawn(Arc::clone(&controller.stop), move |message: SplCoachMessage| {
                watcher.update_coach(message.team_number);
                game.apply(&Action::CoachMessageReceived(message), ActionTrigger::Network);
            })?;
            controller.threads.push(handle);
        }

        if let Some((watcher, receiver)) = instances {
            let handle = watcher.spawn(receiver, Arc::clone(&controller.stop))?;
            controller.threads.push(handle);
        }

        tracing::info!(
            league = league.name(),
            instance_id,
            robot_status_port = controller.robot_status_port,
            "controller started"
        );
        Ok(controller)
    }

    fn spawn_ticker(&mut self, period: Duration) -> Result<()> {
        let name = "gc-clock";
        let game = Arc::clone(&self.game);
        let watcher = Arc::clone(&self.watcher);
        let stop = Arc::clone(&self.stop);

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                tracing::debug!("clock started");
                while !stop.load(Ordering::Relaxed) {
                    game.apply(&Action::ClockTick, ActionTrigger::Clock);
                    watcher.sweep();
                    thread::sleep(period);
                }
                tracing::debug!("clock stopped");
            })
            .map_err(|source| Error::Spawn { name, source })?;
        self.threads.push(handle);
        Ok(())
    }

    #[must_use]
    pub fn game(&self) -> &Arc<Game> {
        &self.game
    }

    #[must_use]
    pub fn watcher(&self) -> &Arc<RobotWatcher> {
        &self.watcher
    }

    /// Random id this controller appends to its version 9 packets.
    #[must_use]
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Whether another controller was heard recently. Always false when
    /// detection is off.
    #[must_use]
    pub fn other_instance_active(&self) -> bool {
        self.instances
            .as_ref()
            .is_some_and(|watcher| watcher.is_other_active())
    }

    /// Port the robot status receiver is bound to.
    #[must_use]
    pub fn robot_status_port(&self) -> u16 {
        self.robot_status_port
    }

    /// Port the coach receiver is bound to, in leagues with a coach.
    #[must_use]
    pub fn coach_port(&self) -> Option<u16> {
        self.coach_port
    }

    /// Stop every thread and wait for them.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                tracing::error!("controller thread panicked");
            }
        }
        tracing::debug!("controller stopped");
    }
}
