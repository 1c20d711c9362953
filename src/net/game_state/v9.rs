//! Version 9: the current layout.
//!
//! Adds the league number, the game id, the play-off flag and a proper "no
//! drop-in" value. Teams carry the coach block only in the SPL family. The
//! sending controller's instance id is appended after the second team.

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

const VERSION: u8 = 9;

const HEADER_SIZE: usize = 4 + 1 + 1 + 1 + 1 + 4 + 6 + 2 * 3;

#[derive(Clone, Debug)]
pub struct GameStateProtocol9 {
    league: League,
    instance_id: u32,
}

impl GameStateProtocol9 {
    /// `instance_id` identifies this controller process on the network.
    #[must_use]
    pub fn new(league: League, instance_id: u32) -> Self {
        Self { league, instance_id }
    }

    fn has_coach_block(&self) -> bool {
        self.league.is_spl_family()
    }

    fn team_size(&self) -> usize {
        let coach = if self.has_coach_block() {
            COACH_MESSAGE_SIZE + 2
        } else {
            0
        };
        6 + coach + PLAYER_SLOTS * 2
    }

    fn put_team(&self, w: &mut PacketWriter, team: &TeamSnapshot) {
        let family = self.league.family();
        w.put_u8(team.team_number);
        w.put_u8(team.color.value());
        w.put_u8(team.score);
        w.put_u8(team.penalty_shot_count);
        w.put_u16(team.penalty_shot_flags);
        if self.has_coach_block() {
            w.put_fixed(team.coach_message.as_deref().unwrap_or_default(), COACH_MESSAGE_SIZE);
            put_player(w, team.coach.as_ref(), family);
        }
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

        let (mut coach_message, mut coach) = (None, None);
        if self.has_coach_block() {
            let message = r.bytes(COACH_MESSAGE_SIZE)?.to_vec();
            let player = read_player(r, family)?;
            if rules.has_coach {
                coach_message = Some(message);
                coach = Some(player);
            }
        }
        let players = read_players(r, family, rules.team_size)?;

        Ok(TeamSnapshot {
            team_number,
            color,
            score,
            penalty_shot_count,
            penalty_shot_flags,
            coach_message,
            coach,
            players,
        })
    }
}

impl ReceivingProtocol for GameStateProtocol9 {
    type Message = GameStateSnapshot;

    fn version(&self) -> u8 {
        VERSION
    }

    fn size(&self) -> usize {
        HEADER_SIZE + 2 * self.team_size() + 4
    }

    fn try_decode(&self, bytes: &[u8]) -> Result<GameStateSnapshot, DecodeError> {
        let mut r = PacketReader::new(bytes, self.size())?;
        r.expect_header(GAME_STATE_HEADER)?;
        expect_version(&mut r, VERSION)?;

        let league_number = r.u8()?;
        if league_number != self.league.number() {
            return Err(DecodeError::LeagueMismatch(league_number));
        }

        let packet_number = r.u8()?;
        let _players_per_team = r.u8()?;
        let game_id = r.u32()?;
        let play_mode = read_play_mode(&mut r)?;
        let first_half = r.bool()?;
        let next_kick_off = read_optional_color(&mut r, "next_kick_off")?;
        let period = read_period(&mut r)?;
        let last_drop_in = read_optional_color(&mut r, "last_drop_in")?;
        let play_off = r.bool()?;
        let drop_in_time = r.i16()?;
        let secs_remaining = r.i16()?;
        let secondary_time = r.i16()?;
        let left = self.read_team(&mut r)?;
        let right = self.read_team(&mut r)?;
        let instance_id = r.u32()?;

        Ok(GameStateSnapshot {
            league: self.league,
            packet_number,
            players_per_team: self.league.rules().team_size,
            game_id,
            play_mode,
            first_half,
            next_kick_off,
            period,
            last_drop_in,
            play_off,
            drop_in_time: i32::from(drop_in_time),
            secs_remaining: i32::from(secs_remaining),
            secondary_time: i32::from(secondary_time),
            teams: [left, right],
            instance_id: Some(instance_id),
        })
    }
}

impl GameStateProtocol for GameStateProtocol9 {
    fn encode(&self, snapshot: &GameStateSnapshot) -> Vec<u8> {
        let mut w = PacketWriter::with_capacity(self.size());
        w.put_bytes(GAME_STATE_HEADER);
        w.put_u8(VERSION);
        w.put_u8(self.league.number());
        w.put_u8(snapshot.packet_number);
        w.put_u8(self.league.rules().team_size);
        w.put_u32(snapshot.game_id);
        w.put_u8(snapshot.play_mode.value());
        w.put_bool(snapshot.first_half);
        w.put_u8(TeamColor::optional_value(snapshot.next_kick_off));
        w.put_u8(snapshot.period.value());
        w.put_u8(TeamColor::optional_value(snapshot.last_drop_in));
        w.put_bool(snapshot.play_off);
        w.put_i16(clamp_i16(snapshot.drop_in_time));
        w.put_i16(clamp_i16(snapshot.secs_remaining));
        w.put_i16(clamp_i16(snapshot.secondary_time));

        for team in &snapshot.teams {
            self.put_team(&mut w, team);
        }
        w.put_u32(self.instance_id);

        debug_assert_eq!(w.len(), self.size());
        w.finish()
    }
}
