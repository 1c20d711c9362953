//! SPL coach messages.

use serde::{Deserialize, Serialize};

/// Size of a coach message payload in bytes.
pub const COACH_MESSAGE_SIZE: usize = 40;

/// Minimum time (ms) between two accepted messages from the same coach.
pub const COACH_MESSAGE_RECEIVE_INTERVAL: i64 = 10_000;

/// Release delay range (ms) applied to every accepted message.
pub const COACH_MESSAGE_MIN_DELAY: i64 = 3_000;
pub const COACH_MESSAGE_MAX_DELAY: i64 = 6_000;

/// A message from a team's coach, held back until `release_at`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplCoachMessage {
    /// Team the coach belongs to.
    pub team_number: u8,

    /// Payload of `COACH_MESSAGE_SIZE` bytes, zeroed after the first zero byte.
    pub payload: Vec<u8>,

    /// Wall-clock ms at which the message may be broadcast (0 until accepted).
    pub release_at: i64,
}

impl SplCoachMessage {
    /// Create a message, truncating the payload at its first zero byte.
    ///
    /// Short payloads are zero-padded and long ones cut to size.
    #[must_use]
    pub fn new(team_number: u8, payload: &[u8]) -> Self {
        let mut bytes = vec![0u8; COACH_MESSAGE_SIZE];
        let end = payload
            .iter()
            .take(COACH_MESSAGE_SIZE)
            .position(|&b| b == 0)
            .unwrap_or(payload.len().min(COACH_MESSAGE_SIZE));
        bytes[..end].copy_from_slice(&payload[..end]);

        Self {
            team_number,
            payload: bytes,
            release_at: 0,
        }
    }

    /// Milliseconds until the message may be sent, floored at 0.
    #[must_use]
    pub fn remaining_delay(&self, wall: i64) -> i64 {
        (self.release_at - wall).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_after_first_zero() {
        let mut raw = [b'x'; COACH_MESSAGE_SIZE];
        raw[3] = 0;
        let msg = SplCoachMessage::new(7, &raw);

        assert_eq!(msg.payload.len(), COACH_MESSAGE_SIZE);
        assert_eq!(&msg.payload[..3], b"xxx");
        assert!(msg.payload[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pads_short_payload() {
        let msg = SplCoachMessage::new(7, b"go");
        assert_eq!(msg.payload.len(), COACH_MESSAGE_SIZE);
        assert_eq!(&msg.payload[..2], b"go");
        assert_eq!(msg.payload[2], 0);
    }

    #[test]
    fn test_full_payload_kept() {
        let raw = [b'a'; COACH_MESSAGE_SIZE + 5];
        let msg = SplCoachMessage::new(1, &raw);
        assert_eq!(msg.payload, vec![b'a'; COACH_MESSAGE_SIZE]);
    }

    #[test]
    fn test_remaining_delay() {
        let mut msg = SplCoachMessage::new(1, b"hi");
        msg.release_at = 5_000;
        assert_eq!(msg.remaining_delay(1_000), 4_000);
        assert_eq!(msg.remaining_delay(9_000), 0);
    }
}
