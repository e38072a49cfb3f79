use std::fmt;

/// Unique identifier for any robot or tree tracked in the state.
///
/// Robots and trees draw from the same allocator; IDs are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Round counter. Round 1 is the first simulated round.
pub type Round = u32;

/// Discrete grid position expressed in tile coordinates.
///
/// `y` grows southwards, matching the row order of terrain grids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance. All range checks use this.
    #[inline]
    pub const fn distance_squared(self, other: Position) -> i32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Neighbouring tile in `direction`. `Direction::None` returns `self`.
    #[inline]
    pub const fn add(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    #[inline]
    pub const fn is_adjacent(self, other: Position) -> bool {
        let d = self.distance_squared(other);
        d == 1 || d == 2
    }

    /// Compass direction that best approximates the bearing to `other`.
    pub fn direction_to(self, other: Position) -> Direction {
        let dx = (other.x - self.x).signum();
        let dy = (other.y - self.y).signum();
        Direction::from_delta(dx, dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Facing direction: eight compass points plus `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    #[default]
    None,
}

impl Direction {
    /// The eight real directions in clockwise order starting at north.
    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::None => (0, 0),
        }
    }

    pub const fn from_delta(dx: i32, dy: i32) -> Direction {
        match (dx, dy) {
            (0, -1) => Direction::North,
            (1, -1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, 1) => Direction::SouthEast,
            (0, 1) => Direction::South,
            (-1, 1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, -1) => Direction::NorthWest,
            _ => Direction::None,
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast
                | Direction::SouthEast
                | Direction::SouthWest
                | Direction::NorthWest
        )
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Direction::None)
    }

    pub const fn opposite(self) -> Direction {
        let (dx, dy) = self.delta();
        Direction::from_delta(-dx, -dy)
    }
}

/// Team affiliation. `Neutral` owns unclaimed trees and neutral spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    A,
    B,
    Neutral,
}

impl Team {
    /// The two competing teams, in ledger order.
    pub const PLAYERS: [Team; 2] = [Team::A, Team::B];

    pub const fn opponent(self) -> Option<Team> {
        match self {
            Team::A => Some(Team::B),
            Team::B => Some(Team::A),
            Team::Neutral => None,
        }
    }

    pub const fn is_player(self) -> bool {
        !matches!(self, Team::Neutral)
    }

    /// Ledger slot for the two competing teams.
    pub(crate) const fn index(self) -> Option<usize> {
        match self {
            Team::A => Some(0),
            Team::B => Some(1),
            Team::Neutral => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Team::A => "A",
            Team::B => "B",
            Team::Neutral => "neutral",
        };
        write!(f, "{label}")
    }
}

/// Height layer an entity occupies. Each tile holds at most one of each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    Ground,
    Air,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_neighbours_are_adjacent() {
        let origin = Position::new(3, 3);
        for dir in Direction::COMPASS {
            let next = origin.add(dir);
            assert!(origin.is_adjacent(next), "{dir:?}");
            assert_eq!(origin.direction_to(next), dir);
            assert_eq!(dir.is_diagonal(), origin.distance_squared(next) == 2);
        }
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn opposite_round_trips() {
        for dir in Direction::COMPASS {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
        assert_eq!(Direction::None.opposite(), Direction::None);
    }
}
