use crate::error::IntersectionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four approaches to the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The three directions a vehicle arriving from `self` may leave towards.
    pub fn others(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| *d != self)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        f.pad(name)
    }
}

/// One vehicle's planned traversal, from the approach it arrives on to the
/// approach it leaves by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    origin: Direction,
    destination: Direction,
}

impl Route {
    /// Builds a route, rejecting u-turns.
    pub fn new(origin: Direction, destination: Direction) -> Result<Self, IntersectionError> {
        if origin == destination {
            return Err(IntersectionError::UTurn(origin));
        }
        Ok(Self {
            origin,
            destination,
        })
    }

    pub fn origin(&self) -> Direction {
        self.origin
    }

    pub fn destination(&self) -> Direction {
        self.destination
    }

    /// True exactly for the four turns that keep to the near corner of the
    /// intersection. Matched by name so the result never depends on how
    /// `Direction` happens to be laid out.
    pub fn is_right_turn(&self) -> bool {
        matches!(
            (self.origin, self.destination),
            (Direction::West, Direction::South)
                | (Direction::South, Direction::East)
                | (Direction::East, Direction::North)
                | (Direction::North, Direction::West)
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.origin, self.destination)
    }
}
