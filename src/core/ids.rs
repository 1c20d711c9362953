//! Identifiers for teams and robots.
//!
//! ## Side vs. Color
//!
//! A team is addressed two ways: by the physical `Side` of the field it
//! defends (a UI-facing notion, swapped at half time) and by its uniform
//! `TeamColor` (a game-facing notion used on the wire). `SidePair<T>` stores
//! one value per side and is indexed by `Side`.
//!
//! ## PlayerNumber
//!
//! Type-safe uniform number. Uniform numbers are 1-based: the first robot is
//! `PlayerNumber(1)`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Physical side of the field, as seen from the referee's desk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// The opposite side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Slot index (left = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Lower-case name used in action names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Uniform color of a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Blue,
    Red,
}

impl TeamColor {
    /// Wire value used when no color applies (drop ball, no drop-in yet).
    pub const NONE_VALUE: u8 = 2;

    /// The opposing color.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            TeamColor::Blue => TeamColor::Red,
            TeamColor::Red => TeamColor::Blue,
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            TeamColor::Blue => 0,
            TeamColor::Red => 1,
        }
    }

    /// Decode a wire value.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(TeamColor::Blue),
            1 => Some(TeamColor::Red),
            _ => None,
        }
    }

    /// Wire value of an optional color, `2` meaning none.
    #[must_use]
    pub fn optional_value(color: Option<TeamColor>) -> u8 {
        color.map_or(Self::NONE_VALUE, TeamColor::value)
    }
}

impl std::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamColor::Blue => write!(f, "Blue"),
            TeamColor::Red => write!(f, "Red"),
        }
    }
}

/// Uniform number of a field player (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerNumber(pub u8);

impl PlayerNumber {
    /// Create a new uniform number.
    ///
    /// Panics on 0: uniform numbers start at 1.
    #[must_use]
    pub fn new(number: u8) -> Self {
        assert!(number > 0, "Uniform number must be greater than zero");
        Self(number)
    }

    /// Get the raw uniform number.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Get the 0-based slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Iterate over all uniform numbers of a team of `team_size` robots.
    pub fn all(team_size: u8) -> impl Iterator<Item = PlayerNumber> {
        (1..=team_size).map(PlayerNumber)
    }
}

impl std::fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A robot slot on a team: a field player or the coach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Uniform {
    Player(PlayerNumber),
    Coach,
}

impl Uniform {
    /// Shorthand for `Uniform::Player(PlayerNumber::new(n))`.
    #[must_use]
    pub fn player(number: u8) -> Self {
        Uniform::Player(PlayerNumber::new(number))
    }

    #[must_use]
    pub const fn is_coach(self) -> bool {
        matches!(self, Uniform::Coach)
    }
}

impl std::fmt::Display for Uniform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Uniform::Player(n) => write!(f, "{}", n),
            Uniform::Coach => write!(f, "Coach"),
        }
    }
}

/// One value per field side.
///
/// ```
/// use game_controller::core::{Side, SidePair};
///
/// let mut goals = SidePair::new(0, 0);
/// goals[Side::Left] += 1;
/// assert_eq!(goals[Side::Left], 1);
/// goals.swap();
/// assert_eq!(goals[Side::Right], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SidePair<T> {
    data: [T; 2],
}

impl<T> SidePair<T> {
    /// Create from left and right values.
    pub fn new(left: T, right: T) -> Self {
        Self { data: [left, right] }
    }

    /// Create with a factory receiving each side.
    pub fn from_fn(factory: impl Fn(Side) -> T) -> Self {
        Self::new(factory(Side::Left), factory(Side::Right))
    }

    /// Exchange the left and right values.
    pub fn swap(&mut self) {
        self.data.swap(0, 1);
    }

    /// Iterate over (Side, &T) pairs, left first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs, left first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::BOTH.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> Index<Side> for SidePair<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        &self.data[side.index()]
    }
}

impl<T> IndexMut<Side> for SidePair<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        &mut self.data[side.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Left.other(), Side::Right);
        assert_eq!(Side::Right.other(), Side::Left);
        assert_eq!(Side::Left.index(), 0);
        assert_eq!(Side::Right.name(), "right");
    }

    #[test]
    fn test_team_color_values() {
        assert_eq!(TeamColor::Blue.value(), 0);
        assert_eq!(TeamColor::Red.value(), 1);
        assert_eq!(TeamColor::from_value(1), Some(TeamColor::Red));
        assert_eq!(TeamColor::from_value(2), None);
        assert_eq!(TeamColor::optional_value(None), 2);
        assert_eq!(TeamColor::Blue.other(), TeamColor::Red);
        assert_eq!(format!("{}", TeamColor::Red), "Red");
    }

    #[test]
    fn test_player_number() {
        let n = PlayerNumber::new(3);
        assert_eq!(n.raw(), 3);
        assert_eq!(n.index(), 2);
        assert_eq!(format!("{}", n), "3");

        let all: Vec<_> = PlayerNumber::all(4).collect();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], PlayerNumber(1));
        assert_eq!(all[3], PlayerNumber(4));
    }

    #[test]
    #[should_panic(expected = "Uniform number must be greater than zero")]
    fn test_player_number_zero() {
        let _ = PlayerNumber::new(0);
    }

    #[test]
    fn test_uniform_display() {
        assert_eq!(format!("{}", Uniform::player(5)), "5");
        assert_eq!(format!("{}", Uniform::Coach), "Coach");
        assert!(Uniform::Coach.is_coach());
    }

    #[test]
    fn test_side_pair_swap() {
        let mut pair = SidePair::new("a", "b");
        assert_eq!(pair[Side::Left], "a");
        pair.swap();
        assert_eq!(pair[Side::Left], "b");
        assert_eq!(pair[Side::Right], "a");

        let sides: Vec<_> = pair.iter().map(|(s, _)| s).collect();
        assert_eq!(sides, vec![Side::Left, Side::Right]);
    }

    #[test]
    fn test_side_pair_serialization() {
        let pair = SidePair::from_fn(|s| s.index() as i32);
        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: SidePair<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, deserialized);
    }
}
