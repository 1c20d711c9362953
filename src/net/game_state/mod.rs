//! Game-state packets (`"RGme"`), versions 7, 8 and 9.
//!
//! ## Snapshot
//!
//! `GameStateSnapshot` is the wire view of a `GameState`: every derived time
//! already computed in whole seconds, teams in left/right order. The
//! broadcaster captures one snapshot per send cycle and hands it to every
//! enabled version, so all versions of one cycle agree.
//!
//! ## Versions
//!
//! | Version | Decode | Notes |
//! |---------|--------|-------|
//! | 7 | unsupported | teams by color, 2-byte player fields, 4-byte clock |
//! | 8 | yes | packet number and team size not trusted, drop-in none sent as 0 |
//! | 9 | yes | league, game id, play-off flag, instance id; coach block SPL only |
//!
//! Decoders read all eleven player slots and keep the league's team size.
//! Coach fields are kept only for leagues with a coach.

mod v7;
mod v8;
mod v9;

use serde::{Deserialize, Serialize};

use crate::core::{ClockView, GameState, Penalty, Period, PlayMode, PlayerState, Side, TeamColor};
use crate::error::DecodeError;
use crate::rules::{League, LeagueFamily};

use super::bytes::{PacketReader, PacketWriter};
use super::protocol::GameStateProtocol;

pub use v7::GameStateProtocol7;
pub use v8::GameStateProtocol8;
pub use v9::GameStateProtocol9;

/// Magic of every game-state packet.
pub const GAME_STATE_HEADER: &[u8; 4] = b"RGme";

/// Player slots per team on the wire, whatever the league's team size.
pub const PLAYER_SLOTS: usize = 11;

/// One robot as sent on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub penalty: Penalty,
    pub secs_till_unpenalised: u8,
}

impl PlayerSnapshot {
    fn capture(player: &PlayerState, side: Side, clock: &ClockView<'_>) -> Self {
        let remaining = clock.remaining_penalty_time(side, player.uniform);
        Self {
            penalty: player.penalty,
            secs_till_unpenalised: u8::try_from(remaining).unwrap_or(u8::MAX),
        }
    }
}

/// One team as sent on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team_number: u8,
    pub color: TeamColor,
    pub score: u8,
    pub penalty_shot_count: u8,
    pub penalty_shot_flags: u16,
    /// Released coach message (leagues with a coach).
    pub coach_message: Option<Vec<u8>>,
    pub coach: Option<PlayerSnapshot>,
    /// One entry per roster slot, uniform number 1 first.
    pub players: Vec<PlayerSnapshot>,
}

impl TeamSnapshot {
    fn capture(state: &GameState, side: Side, clock: &ClockView<'_>) -> Self {
        let team = state.team(side);
        Self {
            team_number: team.team_number,
            color: team.color,
            score: team.score,
            penalty_shot_count: team.penalty_shot_count,
            penalty_shot_flags: team.penalty_shot_flags,
            coach_message: team.coach_message.clone(),
            coach: team
                .coach
                .as_ref()
                .map(|coach| PlayerSnapshot::capture(coach, side, clock)),
            players: team
                .players
                .iter()
                .map(|player| PlayerSnapshot::capture(player, side, clock))
                .collect(),
        }
    }
}

/// Wire view of a match at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub league: League,
    /// Sequence number of the packet; set per version by the sender.
    pub packet_number: u8,
    pub players_per_team: u8,
    pub game_id: u32,
    pub play_mode: PlayMode,
    pub first_half: bool,
    pub next_kick_off: Option<TeamColor>,
    pub period: Period,
    pub last_drop_in: Option<TeamColor>,
    pub play_off: bool,
    /// Seconds since the last drop-in, -1 if none.
    pub drop_in_time: i32,
    pub secs_remaining: i32,
    /// Secondary countdown, 0 if none.
    pub secondary_time: i32,
    /// Left team first.
    pub teams: [TeamSnapshot; 2],
    /// Id of the sending controller (version 9 only).
    pub instance_id: Option<u32>,
}

impl GameStateSnapshot {
    /// Compute the wire view of `state` at wall-clock `wall`.
    ///
    /// `kickoff_grace` is forwarded to `ClockView::secondary_time`.
    #[must_use]
    pub fn capture(state: &GameState, wall: i64, kickoff_grace: i32) -> Self {
        let clock = state.clock(wall);
        Self {
            league: state.league(),
            packet_number: 0,
            players_per_team: state.rules().team_size,
            game_id: state.game_id(),
            play_mode: state.play_mode,
            first_half: state.first_half,
            next_kick_off: state.next_kick_off,
            period: state.period,
            last_drop_in: state.last_drop_in,
            play_off: state.is_play_off(),
            drop_in_time: clock.drop_in_time(),
            secs_remaining: clock.remaining_game_time(),
            secondary_time: clock.secondary_time(kickoff_grace).unwrap_or(0),
            teams: Side::BOTH.map(|side| TeamSnapshot::capture(state, side, &clock)),
            instance_id: None,
        }
    }

    /// The team wearing `color`, left team if neither does.
    #[must_use]
    pub fn team_by_color(&self, color: TeamColor) -> &TeamSnapshot {
        self.teams
            .iter()
            .find(|team| team.color == color)
            .unwrap_or(&self.teams[0])
    }

    #[must_use]
    pub fn team_by_number(&self, team_number: u8) -> Option<&TeamSnapshot> {
        self.teams.iter().find(|team| team.team_number == team_number)
    }
}

/// Every game-state version the league broadcasts, oldest first.
#[must_use]
pub fn protocols_for(league: League, instance_id: u32) -> Vec<Box<dyn GameStateProtocol>> {
    let rules = league.rules();
    let mut protocols: Vec<Box<dyn GameStateProtocol>> = Vec::new();
    if rules.supports_game_state_v7 {
        protocols.push(Box::new(GameStateProtocol7::new(league)));
    }
    if rules.supports_game_state_v8 {
        protocols.push(Box::new(GameStateProtocol8::new(league)));
    }
    protocols.push(Box::new(GameStateProtocol9::new(league, instance_id)));
    protocols
}

// === Shared field codecs ===

/// Saturate a clock value into a 2-byte field.
pub(crate) fn clamp_i16(value: i32) -> i16 {
    i16::try_from(value).unwrap_or(if value < 0 { i16::MIN } else { i16::MAX })
}

fn check_penalty(penalty: Penalty, family: LeagueFamily) {
    assert!(
        penalty.is_valid_for(family),
        "Penalty {penalty:?} does not exist in the {family:?} league family"
    );
}

/// Write penalty code and seconds, one byte each; `None` writes an empty slot.
pub(crate) fn put_player(w: &mut PacketWriter, player: Option<&PlayerSnapshot>, family: LeagueFamily) {
    match player {
        Some(player) => {
            check_penalty(player.penalty, family);
            w.put_u8(player.penalty.code());
            w.put_u8(player.secs_till_unpenalised);
        }
        None => {
            w.put_u8(0);
            w.put_u8(0);
        }
    }
}

/// Write all player slots, padding past the roster.
pub(crate) fn put_players(w: &mut PacketWriter, team: &TeamSnapshot, family: LeagueFamily) {
    for slot in 0..PLAYER_SLOTS {
        put_player(w, team.players.get(slot), family);
    }
}

/// Two-byte penalty and seconds fields of version 7.
pub(crate) fn put_player_wide(w: &mut PacketWriter, player: Option<&PlayerSnapshot>, family: LeagueFamily) {
    match player {
        Some(player) => {
            check_penalty(player.penalty, family);
            w.put_i16(i16::from(player.penalty.code()));
            w.put_i16(i16::from(player.secs_till_unpenalised));
        }
        None => {
            w.put_i16(0);
            w.put_i16(0);
        }
    }
}

pub(crate) fn read_player(r: &mut PacketReader<'_>, family: LeagueFamily) -> Result<PlayerSnapshot, DecodeError> {
    let code = r.u8()?;
    let penalty = Penalty::from_code(family, code).ok_or(DecodeError::InvalidValue {
        field: "penalty",
        value: i64::from(code),
    })?;
    Ok(PlayerSnapshot {
        penalty,
        secs_till_unpenalised: r.u8()?,
    })
}

/// Read all player slots and keep the first `team_size`.
pub(crate) fn read_players(
    r: &mut PacketReader<'_>,
    family: LeagueFamily,
    team_size: u8,
) -> Result<Vec<PlayerSnapshot>, DecodeError> {
    let mut players = Vec::with_capacity(usize::from(team_size));
    for slot in 0..PLAYER_SLOTS {
        let player = read_player(r, family)?;
        if slot < usize::from(team_size) {
            players.push(player);
        }
    }
    Ok(players)
}

pub(crate) fn read_color(r: &mut PacketReader<'_>, field: &'static str) -> Result<TeamColor, DecodeError> {
    let value = r.u8()?;
    TeamColor::from_value(value).ok_or(DecodeError::InvalidValue {
        field,
        value: i64::from(value),
    })
}

/// Read a color where `TeamColor::NONE_VALUE` means none.
pub(crate) fn read_optional_color(
    r: &mut PacketReader<'_>,
    field: &'static str,
) -> Result<Option<TeamColor>, DecodeError> {
    let value = r.u8()?;
    if value == TeamColor::NONE_VALUE {
        return Ok(None);
    }
    TeamColor::from_value(value)
        .map(Some)
        .ok_or(DecodeError::InvalidValue {
            field,
            value: i64::from(value),
        })
}

pub(crate) fn read_play_mode(r: &mut PacketReader<'_>) -> Result<PlayMode, DecodeError> {
    let value = r.u8()?;
    PlayMode::from_value(value).ok_or(DecodeError::InvalidValue {
        field: "play_mode",
        value: i64::from(value),
    })
}

pub(crate) fn read_period(r: &mut PacketReader<'_>) -> Result<Period, DecodeError> {
    let value = r.u8()?;
    Period::from_value(value).ok_or(DecodeError::InvalidValue {
        field: "period",
        value: i64::from(value),
    })
}

/// Check the version byte that follows the header.
pub(crate) fn expect_version(r: &mut PacketReader<'_>, version: u8) -> Result<(), DecodeError> {
    let found = r.u8()?;
    if found == version {
        Ok(())
    } else {
        Err(DecodeError::BadVersion(u32::from(found)))
    }
}
