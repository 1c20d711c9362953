//! Periodic game-state broadcast.
//!
//! Each cycle captures one `GameStateSnapshot` of the latest published state
//! and sends it in every enabled version. A version's packet number advances
//! only after its packet was actually sent, so gaps seen by receivers mean
//! lost sends.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::core::GameState;
use crate::engine::Game;
use crate::error::{Error, NetError};

use super::game_state::GameStateSnapshot;
use super::protocol::GameStateProtocol;

struct Channel {
    protocol: Box<dyn GameStateProtocol>,
    packet_number: u8,
}

/// Sender of game-state packets.
pub struct Broadcaster {
    socket: UdpSocket,
    target: SocketAddr,
    channels: Vec<Channel>,
    kickoff_grace: i32,
}

impl Broadcaster {
    /// Open a broadcast-enabled socket on an ephemeral port.
    pub fn bind(
        target: SocketAddr,
        protocols: Vec<Box<dyn GameStateProtocol>>,
        kickoff_grace: i32,
    ) -> Result<Self, NetError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .map_err(|source| NetError::Bind { port: 0, source })?;
        socket.set_broadcast(true)?;

        Ok(Self {
            socket,
            target,
            channels: protocols
                .into_iter()
                .map(|protocol| Channel {
                    protocol,
                    packet_number: 0,
                })
                .collect(),
            kickoff_grace,
        })
    }

    /// Send one packet per version. Returns how many were sent.
    pub fn send(&mut self, state: &GameState, wall: i64) -> usize {
        let mut snapshot = GameStateSnapshot::capture(state, wall, self.kickoff_grace);
        let mut sent = 0;

        for channel in &mut self.channels {
            snapshot.packet_number = channel.packet_number;
            let bytes = channel.protocol.encode(&snapshot);
            match self.socket.send_to(&bytes, self.target) {
                Ok(_) => {
                    channel.packet_number = channel.packet_number.wrapping_add(1);
                    sent += 1;
                }
                Err(source) => {
                    let e = NetError::Send {
                        addr: self.target,
                        source,
                    };
                    tracing::warn!(version = channel.protocol.version(), error = %e, "game state not sent");
                }
            }
        }
        sent
    }

    /// Next packet number of a version, if that version is enabled.
    #[must_use]
    pub fn packet_number(&self, version: u8) -> Option<u8> {
        self.channels
            .iter()
            .find(|c| c.protocol.version() == version)
            .map(|c| c.packet_number)
    }

    /// Broadcast `game` every `period` until `stop` is set.
    pub fn spawn(
        mut self,
        game: Arc<Game>,
        period: Duration,
        stop: Arc<AtomicBool>,
    ) -> Result<JoinHandle<()>, Error> {
        let name = "gc-sender";
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                tracing::debug!(target_addr = %self.target, "broadcaster started");
                while !stop.load(Ordering::Relaxed) {
                    let state = game.snapshot();
                    self.send(&state, game.wall());
                    thread::sleep(period);
                }
                tracing::debug!("broadcaster stopped");
            })
            .map_err(|source| Error::Spawn { name, source })
    }
}
