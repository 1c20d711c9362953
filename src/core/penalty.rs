//! Penalties.
//!
//! The active set of penalty kinds depends on the league family. Wire codes
//! overlap between families (code 1 is ball holding in the SPL but ball
//! manipulation in the Humanoid League), so decoding always takes a
//! `LeagueFamily`.

use serde::{Deserialize, Serialize};

use crate::rules::LeagueFamily;

/// Penalty state of a robot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Penalty {
    #[default]
    None,

    // SPL
    SplBallHolding,
    SplPlayerPushing,
    SplObstruction,
    SplInactivePlayer,
    SplIllegalDefender,
    SplLeavingTheField,
    SplPlayingWithHands,
    SplRequestForPickup,
    SplCoachMotion,

    // Humanoid League
    HlBallManipulation,
    HlPhysicalContact,
    HlIllegalAttack,
    HlIllegalDefense,
    HlPickupOrIncapable,
    HlService,

    /// Waiting off the field to enter the game.
    Substitute,
    /// Penalised by the robot's own request.
    Manual,
}

impl Penalty {
    const SPL_KINDS: [Penalty; 9] = [
        Penalty::SplBallHolding,
        Penalty::SplPlayerPushing,
        Penalty::SplObstruction,
        Penalty::SplInactivePlayer,
        Penalty::SplIllegalDefender,
        Penalty::SplLeavingTheField,
        Penalty::SplPlayingWithHands,
        Penalty::SplRequestForPickup,
        Penalty::SplCoachMotion,
    ];

    const HL_KINDS: [Penalty; 6] = [
        Penalty::HlBallManipulation,
        Penalty::HlPhysicalContact,
        Penalty::HlIllegalAttack,
        Penalty::HlIllegalDefense,
        Penalty::HlPickupOrIncapable,
        Penalty::HlService,
    ];

    /// Wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Penalty::None => 0,
            Penalty::SplBallHolding | Penalty::HlBallManipulation => 1,
            Penalty::SplPlayerPushing | Penalty::HlPhysicalContact => 2,
            Penalty::SplObstruction | Penalty::HlIllegalAttack => 3,
            Penalty::SplInactivePlayer | Penalty::HlIllegalDefense => 4,
            Penalty::SplIllegalDefender | Penalty::HlPickupOrIncapable => 5,
            Penalty::SplLeavingTheField | Penalty::HlService => 6,
            Penalty::SplPlayingWithHands => 7,
            Penalty::SplRequestForPickup => 8,
            Penalty::SplCoachMotion => 9,
            Penalty::Substitute => 14,
            Penalty::Manual => 15,
        }
    }

    /// Decode a wire code for the given league family.
    #[must_use]
    pub fn from_code(family: LeagueFamily, code: u8) -> Option<Self> {
        match code {
            0 => Some(Penalty::None),
            14 => Some(Penalty::Substitute),
            15 => Some(Penalty::Manual),
            _ => {
                let kinds: &[Penalty] = match family {
                    LeagueFamily::Spl => &Self::SPL_KINDS,
                    LeagueFamily::Humanoid => &Self::HL_KINDS,
                };
                kinds.iter().copied().find(|p| p.code() == code)
            }
        }
    }

    /// Fixed duration in seconds, or -1 when the penalty is not timed.
    #[must_use]
    pub const fn duration_secs(self) -> i32 {
        match self {
            Penalty::None => 0,
            Penalty::SplCoachMotion => 1200,
            Penalty::SplBallHolding
            | Penalty::SplPlayerPushing
            | Penalty::SplObstruction
            | Penalty::SplInactivePlayer
            | Penalty::SplIllegalDefender
            | Penalty::SplLeavingTheField
            | Penalty::SplPlayingWithHands
            | Penalty::SplRequestForPickup => 45,
            Penalty::HlService => 60,
            Penalty::HlBallManipulation
            | Penalty::HlPhysicalContact
            | Penalty::HlIllegalAttack
            | Penalty::HlIllegalDefense
            | Penalty::HlPickupOrIncapable => 30,
            Penalty::Substitute | Penalty::Manual => -1,
        }
    }

    /// Whether this penalty exists in the given league family.
    #[must_use]
    pub fn is_valid_for(self, family: LeagueFamily) -> bool {
        match self {
            Penalty::None | Penalty::Substitute | Penalty::Manual => true,
            _ => match family {
                LeagueFamily::Spl => Self::SPL_KINDS.contains(&self),
                LeagueFamily::Humanoid => Self::HL_KINDS.contains(&self),
            },
        }
    }

    /// Whether the penalty is tracked by a countdown.
    #[must_use]
    pub const fn is_timed(self) -> bool {
        self.duration_secs() >= 0
    }
}
