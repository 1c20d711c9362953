//! Version 7: the legacy Humanoid League layout.

use crate::core::TeamColor;
use crate::error::DecodeError;
use crate::net::bytes::PacketWriter;
use crate::net::protocol::{GameStateProtocol, ReceivingProtocol};
use crate::rules::League;

use super::{clamp_i16, put_player_wide, GameStateSnapshot, TeamSnapshot, GAME_STATE_HEADER, PLAYER_SLOTS};

const VERSION: u8 = 7;

const TEAM_SIZE: usize = 4 + PLAYER_SLOTS * 4;
const PACKET_SIZE: usize = 4 + 4 + 6 + 2 + 4 + 2 * TEAM_SIZE;

/// Encode-only. Teams are ordered by color (blue first) and a goal color
/// byte follows each team color.
#[derive(Clone, Debug)]
pub struct GameStateProtocol7 {
    league: League,
}

impl GameStateProtocol7 {
    #[must_use]
    pub fn new(league: League) -> Self {
        Self { league }
    }

    fn put_team(&self, w: &mut PacketWriter, team: &TeamSnapshot) {
        let family = self.league.family();
        w.put_u8(team.team_number);
        w.put_u8(team.color.value());
        // Goal color, always yellow.
        w.put_u8(1);
        w.put_u8(team.score);
        for slot in 0..PLAYER_SLOTS {
            put_player_wide(w, team.players.get(slot), family);
        }
    }
}

impl ReceivingProtocol for GameStateProtocol7 {
    type Message = GameStateSnapshot;

    fn version(&self) -> u8 {
        VERSION
    }

    fn size(&self) -> usize {
        PACKET_SIZE
    }

    /// Always `Unsupported`: nothing consumes version 7 packets.
    fn try_decode(&self, _bytes: &[u8]) -> Result<GameStateSnapshot, DecodeError> {
        Err(DecodeError::Unsupported(VERSION))
    }
}

impl GameStateProtocol for GameStateProtocol7 {
    fn encode(&self, snapshot: &GameStateSnapshot) -> Vec<u8> {
        let mut w = PacketWriter::with_capacity(PACKET_SIZE);
        w.put_bytes(GAME_STATE_HEADER);
        w.put_i32(i32::from(VERSION));
        w.put_u8(self.league.rules().team_size);
        w.put_u8(snapshot.play_mode.value());
        w.put_bool(snapshot.first_half);
        w.put_u8(TeamColor::optional_value(snapshot.next_kick_off));
        w.put_u8(snapshot.period.value());
        w.put_u8(snapshot.last_drop_in.map_or(0, TeamColor::value));
        w.put_i16(clamp_i16(snapshot.drop_in_time));
        w.put_i32(snapshot.secs_remaining);

        self.put_team(&mut w, snapshot.team_by_color(TeamColor::Blue));
        self.put_team(&mut w, snapshot.team_by_color(TeamColor::Red));

        debug_assert_eq!(w.len(), PACKET_SIZE);
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::core::Side;

    #[test]
    fn test_size() {
        assert_eq!(GameStateProtocol7::new(League::HlKid).size(), 116);
    }

    #[test]
    fn test_layout() {
        let mut state = busy_state(League::HlKid);
        state.teams.swap();
        assert_eq!(state.team(Side::Right).color, TeamColor::Blue);

        let snapshot = GameStateSnapshot::capture(&state, T0 + 11_000, 15);
        let bytes = GameStateProtocol7::new(League::HlKid).encode(&snapshot);

        assert_eq!(bytes.len(), 116);
        assert_eq!(&bytes[..4], b"RGme");
        assert_eq!(&bytes[4..8], &[7, 0, 0, 0]);
        assert_eq!(bytes[8], 6);
        assert_eq!(bytes[9], 3);
        assert_eq!(bytes[11], 1);
        assert_eq!(bytes[13], 0);
        assert_eq!(&bytes[14..16], &9i16.to_le_bytes());
        assert_eq!(&bytes[16..20], &(600 - 71i32).to_le_bytes());

        // Blue team first even though it plays on the right.
        assert_eq!(bytes[20], 9);
        assert_eq!(bytes[21], 0);
        assert_eq!(bytes[22], 1);
        assert_eq!(bytes[20 + TEAM_SIZE], 5);
        assert_eq!(bytes[20 + TEAM_SIZE + 3], 2);
        // First left-team robot: physical contact, 30 - 10 s left.
        assert_eq!(&bytes[24 + TEAM_SIZE..28 + TEAM_SIZE], &[2, 0, 20, 0]);
    }

    #[test]
    fn test_no_drop_in_sent_as_blue() {
        let mut state = busy_state(League::HlKid);
        state.last_drop_in = None;
        let snapshot = GameStateSnapshot::capture(&state, T0, 15);
        let bytes = GameStateProtocol7::new(League::HlKid).encode(&snapshot);
        assert_eq!(bytes[13], 0);
    }

    #[test]
    fn test_decode_unsupported() {
        let protocol = GameStateProtocol7::new(League::HlKid);
        let snapshot = GameStateSnapshot::capture(&busy_state(League::HlKid), T0, 15);
        let bytes = protocol.encode(&snapshot);
        assert_eq!(protocol.try_decode(&bytes), Err(DecodeError::Unsupported(7)));
        assert!(protocol.decode(&bytes).is_none());
    }
}
