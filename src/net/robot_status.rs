//! Robot status packets (`"RGrt"`), versions 1 and 2.
//!
//! Robots send these to request or acknowledge a manual penalty and as a
//! heartbeat. Both versions carry the same three fields; version 1 uses wider
//! integers.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

use super::bytes::{narrow, PacketReader};
use super::protocol::ReceivingProtocol;

/// Magic of every robot status packet.
pub const ROBOT_STATUS_HEADER: &[u8; 4] = b"RGrt";

/// What a robot reports about itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotStatus {
    ManuallyPenalised,
    ManuallyUnpenalised,
    Alive,
}

impl RobotStatus {
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            RobotStatus::ManuallyPenalised => 0,
            RobotStatus::ManuallyUnpenalised => 1,
            RobotStatus::Alive => 2,
        }
    }

    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(RobotStatus::ManuallyPenalised),
            1 => Some(RobotStatus::ManuallyUnpenalised),
            2 => Some(RobotStatus::Alive),
            _ => None,
        }
    }
}

/// A decoded robot status packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotMessage {
    pub team_number: u8,
    pub player_number: u8,
    pub status: RobotStatus,
}

fn status(value: u8) -> Result<RobotStatus, DecodeError> {
    RobotStatus::from_value(value).ok_or(DecodeError::InvalidValue {
        field: "status",
        value: i64::from(value),
    })
}

/// Version 1: 4-byte version, 2-byte team and player, 4-byte status.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobotStatusProtocol1;

impl ReceivingProtocol for RobotStatusProtocol1 {
    type Message = RobotMessage;

    fn version(&self) -> u8 {
        1
    }

    fn size(&self) -> usize {
        16
    }

    fn try_decode(&self, bytes: &[u8]) -> Result<RobotMessage, DecodeError> {
        let mut r = PacketReader::new(bytes, self.size())?;
        r.expect_header(ROBOT_STATUS_HEADER)?;
        let version = r.i32()?;
        if version != 1 {
            return Err(DecodeError::BadVersion(version as u32));
        }
        let team_number = narrow("team", r.i16()?)?;
        let player_number = narrow("player", r.i16()?)?;
        let status = status(narrow("status", r.i32()?)?)?;

        Ok(RobotMessage {
            team_number,
            player_number,
            status,
        })
    }
}

/// Version 2: one byte per field.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobotStatusProtocol2;

impl ReceivingProtocol for RobotStatusProtocol2 {
    type Message = RobotMessage;

    fn version(&self) -> u8 {
        2
    }

    fn size(&self) -> usize {
        8
    }

    fn try_decode(&self, bytes: &[u8]) -> Result<RobotMessage, DecodeError> {
        let mut r = PacketReader::new(bytes, self.size())?;
        r.expect_header(ROBOT_STATUS_HEADER)?;
        let version = r.u8()?;
        if version != 2 {
            return Err(DecodeError::BadVersion(u32::from(version)));
        }

        Ok(RobotMessage {
            team_number: r.u8()?,
            player_number: r.u8()?,
            status: status(r.u8()?)?,
        })
    }
}

/// Every robot status version, newest first.
#[must_use]
pub fn robot_status_protocols() -> Vec<Box<dyn ReceivingProtocol<Message = RobotMessage>>> {
    vec![Box::new(RobotStatusProtocol2), Box::new(RobotStatusProtocol1)]
}
