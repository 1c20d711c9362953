//! Version 8: left/right team order, coach block in every league.
//!
//! On decode the packet number and team size are read but not trusted: the
//! snapshot carries 0 and the league's team size instead. A missing drop-in
//! is sent as blue, so it decodes as blue.

use crate::core::TeamColor;
use crate::core::COACH_MESSAGE_SIZE;
use crate::error::DecodeError;
use crate::net::bytes::{PacketReader, PacketWriter};
use crate::net::protocol::{GameStateProtocol, ReceivingProtocol};
use crate::rules::League;

use super::{
    clamp_i16, expect_version, put_player, put_players, read_color, read_optional_color,
    read_period, read_play_mode, read_player, read_players, GameStateSnapshot, TeamSnapshot,
    GAME_STATE_HEADER, PLAYER_SLOTS,
};

const VERSION: u8 = 8;

const TEAM_SIZE: usize = 6 + COACH_MESSAGE_SIZE + 2 + PLAYER_SLOTS * 2;
const PACKET_SIZE: usize = 4 + 1 + 1 + 1 + 5 + 2 * 3 + 2 * TEAM_SIZE;

#[derive(Clone, Debug)]
pub struct GameStateProtocol8 {
    league: League,
}

impl GameStateProtocol8 {
    #[must_use]
    pub fn new(league: League) -> Self {
        Self { league }
    }

    fn put_team(&self, w: &mut PacketWriter, team: &TeamSnapshot) {
        let family = self.league.family();
        w.put_u8(team.team_number);
        w.put_u8(team.color.value());
        w.put_u8(team.score);
        w.put_u8(team.penalty_shot_count);
        w.put_u16(team.penalty_shot_flags);
        w.put_fixed(team.coach_message.as_deref().unwrap_or_default(), COACH_MESSAGE_SIZE);
        put_player(w, team.coach.as_ref(), family);
        put_players(w, team, family);
    }

    fn read_team(&self, r: &mut PacketReader<'_>) -> Result<TeamSnapshot, DecodeError> {
        let family = self.league.family();
        let rules = self.league.rules();

        let team_number = r.u8()?;
        let color = read_color(r, "team_color")?;
        let score = r.u8()?;
        let penalty_shot_count = r.u8()?;
        let penalty_shot_flags = r.u16()?;
        let coach_message = r.bytes(COACH_MESSAGE_SIZE)?.to_vec();
        let coach = read_player(r, family)?;
        let players = read_players(r, family, rules.team_size)?;

        Ok(TeamSnapshot {
            team_number,
            color,
            score,
            penalty_shot_count,
            penalty_shot_flags,
            coach_message: rules.has_coach.then_some(coach_message),
            coach: rules.has_coach.then_some(coach),
            players,
        })
    }
}

impl ReceivingProtocol for GameStateProtocol8 {
    type Message = GameStateSnapshot;

    fn version(&self) -> u8 {
        VERSION
    }

    fn size(&self) -> usize {
        PACKET_SIZE
    }

    fn try_decode(&self, bytes: &[u8]) -> Result<GameStateSnapshot, DecodeError> {
        let mut r = PacketReader::new(bytes, PACKET_SIZE)?;
        r.expect_header(GAME_STATE_HEADER)?;
        expect_version(&mut r, VERSION)?;

        let _packet_number = r.u8()?;
        let _players_per_team = r.u8()?;
        let play_mode = read_play_mode(&mut r)?;
        let first_half = r.bool()?;
        let next_kick_off = read_optional_color(&mut r, "next_kick_off")?;
        let period = read_period(&mut r)?;
        let last_drop_in = read_color(&mut r, "last_drop_in")?;
        let drop_in_time = r.i16()?;
        let secs_remaining = r.i16()?;
        let secondary_time = r.i16()?;
        let left = self.read_team(&mut r)?;
        let right = self.read_team(&mut r)?;

        Ok(GameStateSnapshot {
            league: self.league,
            packet_number: 0,
            players_per_team: self.league.rules().team_size,
            game_id: 0,
            play_mode,
            first_half,
            next_kick_off,
            period,
            last_drop_in: Some(last_drop_in),
            play_off: false,
            drop_in_time: i32::from(drop_in_time),
            secs_remaining: i32::from(secs_remaining),
            secondary_time: i32::from(secondary_time),
            teams: [left, right],
            instance_id: None,
        })
    }
}

impl GameStateProtocol for GameStateProtocol8 {
    fn encode(&self, snapshot: &GameStateSnapshot) -> Vec<u8> {
        let mut w = PacketWriter::with_capacity(PACKET_SIZE);
        w.put_bytes(GAME_STATE_HEADER);
        w.put_u8(VERSION);
        w.put_u8(snapshot.packet_number);
        w.put_u8(self.league.rules().team_size);
        w.put_u8(snapshot.play_mode.value());
        w.put_bool(snapshot.first_half);
        w.put_u8(TeamColor::optional_value(snapshot.next_kick_off));
        w.put_u8(snapshot.period.value());
        w.put_u8(snapshot.last_drop_in.map_or(0, TeamColor::value));
        w.put_i16(clamp_i16(snapshot.drop_in_time));
        w.put_i16(clamp_i16(snapshot.secs_remaining));
        w.put_i16(clamp_i16(snapshot.secondary_time));

        for team in &snapshot.teams {
            self.put_team(&mut w, team);
        }

        debug_assert_eq!(w.len(), PACKET_SIZE);
        w.finish()
    }
}
