//! SPL coach packets (`"SPLC"`), version 2.

use crate::core::{SplCoachMessage, COACH_MESSAGE_SIZE};
use crate::error::DecodeError;

use super::bytes::PacketReader;
use super::protocol::ReceivingProtocol;

/// Magic of every coach packet.
pub const COACH_HEADER: &[u8; 4] = b"SPLC";

const VERSION: u8 = 2;

/// Decodes coach packets of the two teams of one match.
///
/// Packets from any other team are rejected with `UnknownTeam`.
#[derive(Clone, Copy, Debug)]
pub struct SplCoachProtocol2 {
    teams: [u8; 2],
}

impl SplCoachProtocol2 {
    #[must_use]
    pub fn new(teams: [u8; 2]) -> Self {
        Self { teams }
    }
}

impl ReceivingProtocol for SplCoachProtocol2 {
    type Message = SplCoachMessage;

    fn version(&self) -> u8 {
        VERSION
    }

    fn size(&self) -> usize {
        4 + 1 + 1 + COACH_MESSAGE_SIZE
    }

    fn try_decode(&self, bytes: &[u8]) -> Result<SplCoachMessage, DecodeError> {
        let mut r = PacketReader::new(bytes, self.size())?;
        r.expect_header(COACH_HEADER)?;
        let version = r.u8()?;
        if version != VERSION {
            return Err(DecodeError::BadVersion(u32::from(version)));
        }
        let team = r.u8()?;
        if !self.teams.contains(&team) {
            return Err(DecodeError::UnknownTeam(team));
        }
        Ok(SplCoachMessage::new(team, r.bytes(COACH_MESSAGE_SIZE)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(team: u8, text: &[u8]) -> Vec<u8> {
        let mut bytes = b"SPLC".to_vec();
        bytes.push(2);
        bytes.push(team);
        let mut payload = [0u8; COACH_MESSAGE_SIZE];
        payload[..text.len()].copy_from_slice(text);
        bytes.extend_from_slice(&payload);
        bytes
    }

    #[test]
    fn test_size() {
        assert_eq!(SplCoachProtocol2::new([1, 2]).size(), 46);
    }

    #[test]
    fn test_decode() {
        let protocol = SplCoachProtocol2::new([5, 9]);
        let message = protocol.decode(&packet(9, b"go left")).unwrap();
        assert_eq!(message.team_number, 9);
        assert_eq!(&message.payload[..7], b"go left");
        assert!(message.payload[7..].iter().all(|&b| b == 0));
        assert_eq!(message.release_at, 0);
    }

    #[test]
    fn test_rejects_unknown_team() {
        let protocol = SplCoachProtocol2::new([5, 9]);
        assert_eq!(protocol.try_decode(&packet(3, b"x")), Err(DecodeError::UnknownTeam(3)));
    }

    #[test]
    fn test_rejects_other_version() {
        let protocol = SplCoachProtocol2::new([5, 9]);
        let mut bytes = packet(5, b"x");
        bytes[4] = 3;
        assert_eq!(protocol.try_decode(&bytes), Err(DecodeError::BadVersion(3)));
    }

    #[test]
    fn test_payload_cut_at_first_zero() {
        let protocol = SplCoachProtocol2::new([5, 9]);
        let message = protocol.decode(&packet(5, b"ab\0cd")).unwrap();
        assert_eq!(&message.payload[..5], b"ab\0\0\0");
    }
}
