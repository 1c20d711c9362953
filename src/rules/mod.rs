//! League rule sets.
//!
//! Each supported league maps to one immutable `RuleSet`. The table is fixed
//! at compile time; a match selects its league once at startup.

mod league;
mod ruleset;

pub use league::{League, LeagueFamily};
pub use ruleset::RuleSet;
