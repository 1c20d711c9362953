//! Error types.
//!
//! Decode failures never reach the receive loops as errors: decoders expose
//! `try_decode -> Result<_, DecodeError>` for diagnostics and the `Option`
//! returning `decode` that the loops use. Socket failures are `NetError`.

use std::io;
use std::net::SocketAddr;

/// Why a packet could not be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Packet header does not match")]
    BadHeader,

    #[error("Unexpected protocol version: {0}")]
    BadVersion(u32),

    #[error("Packet truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Packet is for league {0}, not the active league")]
    LeagueMismatch(u8),

    #[error("Invalid value {value} for field {field}")]
    InvalidValue { field: &'static str, value: i64 },

    #[error("Decoding protocol version {0} is not supported")]
    Unsupported(u8),

    #[error("Team {0} does not play in this match")]
    UnknownTeam(u8),
}

/// Socket failures.
#[derive(thiserror::Error, Debug)]
pub enum NetError {
    #[error("Could not bind UDP port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("Could not send to {addr}: {source}")]
    Send {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Umbrella error of the crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error("Could not spawn thread {name}: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
