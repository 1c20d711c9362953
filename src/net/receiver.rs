//! Blocking UDP receive loop.
//!
//! A `MessageReceiver` owns one socket and an ordered list of protocols. Each
//! datagram is offered to the protocols in order; the first that decodes it
//! wins and the message goes to the handler. Undecodable datagrams are
//! dropped.
//!
//! The socket has a read timeout, so the loop notices a stop request within
//! one timeout window without any other cancellation mechanism.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Error, NetError};

use super::protocol::ReceivingProtocol;

/// Ordered decoders of one message type.
pub type Protocols<T> = Vec<Box<dyn ReceivingProtocol<Message = T>>>;

pub struct MessageReceiver<T> {
    name: &'static str,
    socket: UdpSocket,
    protocols: Protocols<T>,
    buffer_size: usize,
}

impl<T: 'static> MessageReceiver<T> {
    /// Bind `port` on all interfaces. Port 0 picks a free port.
    pub fn bind(
        name: &'static str,
        port: u16,
        timeout: Duration,
        protocols: Protocols<T>,
    ) -> Result<Self, NetError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))
            .map_err(|source| NetError::Bind { port, source })?;
        socket.set_read_timeout(Some(timeout))?;

        let buffer_size = protocols.iter().map(|p| p.size()).max().unwrap_or(0);

        Ok(Self {
            name,
            socket,
            protocols,
            buffer_size,
        })
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, NetError> {
        Ok(self.socket.local_addr()?)
    }

    /// Wait up to one timeout window for a decodable packet.
    ///
    /// `Ok(None)` covers both a timeout and a packet no protocol accepted.
    pub fn receive(&self) -> Result<Option<T>, NetError> {
        let mut buf = vec![0u8; self.buffer_size];
        let (len, from) = match self.socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let packet = &buf[..len];
        let message = self.protocols.iter().find_map(|p| p.decode(packet));
        if message.is_none() {
            tracing::trace!(receiver = self.name, %from, len, "discarded packet");
        }
        Ok(message)
    }

    /// Run the receive loop on its own thread until `stop` is set.
    pub fn spawn<F>(self, stop: Arc<AtomicBool>, mut handler: F) -> Result<JoinHandle<()>, Error>
    where
        F: FnMut(T) + Send + 'static,
        T: Send,
    {
        let name = self.name;
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                tracing::debug!(receiver = name, "receiver started");
                while !stop.load(Ordering::Relaxed) {
                    match self.receive() {
                        Ok(Some(message)) => handler(message),
                        Ok(None) => {}
                        Err(e) => tracing::error!(receiver = name, error = %e, "receive failed"),
                    }
                }
                tracing::debug!(receiver = name, "receiver stopped");
            })
            .map_err(|source| Error::Spawn { name, source })
    }
}
