//! Detection of other controllers on the same network.
//!
//! Every controller appends its random instance id to its version 9 packets.
//! The watcher listens on the game-state port and remembers when it last saw
//! a packet carrying a different id.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::core::WallClock;
use crate::error::{Error, NetError};
use crate::rules::League;

use super::game_state::{GameStateProtocol9, GameStateSnapshot};
use super::receiver::{MessageReceiver, Protocols};

/// Sentinel for "no foreign controller seen yet".
const NEVER: i64 = i64::MIN;

/// Shared contention flag, updated by the receive thread.
pub struct InstanceWatcher {
    instance_id: u32,
    window_ms: i64,
    last_foreign: AtomicI64,
    clock: Arc<dyn WallClock>,
}

impl InstanceWatcher {
    #[must_use]
    pub fn new(instance_id: u32, window_ms: i64, clock: Arc<dyn WallClock>) -> Self {
        Self {
            instance_id,
            window_ms,
            last_foreign: AtomicI64::new(NEVER),
            clock,
        }
    }

    #[must_use]
    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// Note a received game-state packet.
    pub fn observe(&self, snapshot: &GameStateSnapshot) {
        match snapshot.instance_id {
            Some(id) if id != self.instance_id => {
                tracing::debug!(instance_id = id, "packet from another controller");
                self.last_foreign.store(self.clock.now_millis(), Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Whether another controller was heard within the window.
    #[must_use]
    pub fn is_other_active(&self) -> bool {
        let last = self.last_foreign.load(Ordering::Relaxed);
        last != NEVER && self.clock.now_millis() - last < self.window_ms
    }

    /// Listen on `port` for version 9 packets of `league`.
    pub fn bind(league: League, port: u16, timeout: Duration) -> Result<MessageReceiver<GameStateSnapshot>, NetError> {
        let protocols: Protocols<GameStateSnapshot> = vec![Box::new(GameStateProtocol9::new(league, 0))];
        MessageReceiver::bind("gc-instances", port, timeout, protocols)
    }

    /// Feed `receiver` into this watcher on its own thread.
    pub fn spawn(
        self: &Arc<Self>,
        receiver: MessageReceiver<GameStateSnapshot>,
        stop: Arc<AtomicBool>,
    ) -> Result<JoinHandle<()>, Error> {
        let watcher = Arc::clone(self);
        receiver.spawn(stop, move |snapshot| watcher.observe(&snapshot))
    }
}
