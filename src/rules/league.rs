//! The fixed set of supported leagues.

use serde::{Deserialize, Serialize};

use super::ruleset::{RuleSet, HL_ADULT, HL_KID, HL_TEEN, SPL, SPL_DROP_IN};

/// League family. Penalty codes on the wire are interpreted per family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueFamily {
    /// Standard Platform League variants.
    Spl,
    /// Humanoid League variants.
    Humanoid,
}

/// A competition variant with its own rule set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    Spl,
    SplDropIn,
    HlKid,
    HlTeen,
    HlAdult,
}

impl League {
    /// All leagues, in menu order.
    pub const ALL: [League; 5] = [
        League::Spl,
        League::SplDropIn,
        League::HlKid,
        League::HlTeen,
        League::HlAdult,
    ];

    /// Number identifying the league on the wire.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            League::Spl => 1,
            League::SplDropIn => 2,
            League::HlKid => 17,
            League::HlTeen => 18,
            League::HlAdult => 19,
        }
    }

    /// Look up a league by its wire number.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.number() == number)
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            League::Spl => "SPL",
            League::SplDropIn => "SPL Drop-in",
            League::HlKid => "HL Kid",
            League::HlTeen => "HL Teen",
            League::HlAdult => "HL Adult",
        }
    }

    /// Look up a league by display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    #[must_use]
    pub const fn family(self) -> LeagueFamily {
        match self {
            League::Spl | League::SplDropIn => LeagueFamily::Spl,
            League::HlKid | League::HlTeen | League::HlAdult => LeagueFamily::Humanoid,
        }
    }

    #[must_use]
    pub const fn is_spl_family(self) -> bool {
        matches!(self.family(), LeagueFamily::Spl)
    }

    #[must_use]
    pub const fn is_hl_family(self) -> bool {
        matches!(self.family(), LeagueFamily::Humanoid)
    }

    /// The league's immutable rule set.
    #[must_use]
    pub const fn rules(self) -> &'static RuleSet {
        match self {
            League::Spl => &SPL,
            League::SplDropIn => &SPL_DROP_IN,
            League::HlKid => &HL_KID,
            League::HlTeen => &HL_TEEN,
            League::HlAdult => &HL_ADULT,
        }
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_numbers() {
        assert_eq!(League::Spl.number(), 1);
        assert_eq!(League::SplDropIn.number(), 2);
        assert_eq!(League::HlKid.number(), 17);
        assert_eq!(League::HlTeen.number(), 18);
        assert_eq!(League::HlAdult.number(), 19);

        for league in League::ALL {
            assert_eq!(League::from_number(league.number()), Some(league));
        }
        assert_eq!(League::from_number(3), None);
    }

    #[test]
    fn test_league_names() {
        assert_eq!(League::from_name("HL Teen"), Some(League::HlTeen));
        assert_eq!(League::from_name("Small Size"), None);
        assert_eq!(format!("{}", League::SplDropIn), "SPL Drop-in");
    }

    #[test]
    fn test_league_family() {
        assert!(League::Spl.is_spl_family());
        assert!(League::SplDropIn.is_spl_family());
        assert!(League::HlKid.is_hl_family());
        assert!(League::HlAdult.is_hl_family());
        assert_eq!(League::HlTeen.family(), LeagueFamily::Humanoid);
    }
}
