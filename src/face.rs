//! Face designators, turn directions and turns.
//!
//! The six faces are a closed set, so an invalid face can only come from
//! text or key input. Both paths go through [`Face::try_from`] and are
//! rejected there, before they reach layer selection.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use strum::{Display, EnumIter, EnumString};

use crate::error::ParseFaceError;
use crate::pieces::Coord;

/// Coordinate axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of `coord` along this axis.
    #[inline]
    pub fn component(self, (x, y, z): Coord) -> i32 {
        match self {
            Axis::X => x,
            Axis::Y => y,
            Axis::Z => z,
        }
    }
}

/// One of the six turnable outer layers.
#[derive(Debug, Display, EnumIter, EnumString, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    R,
    L,
    U,
    D,
    F,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::R, Face::L, Face::U, Face::D, Face::F, Face::B];

    /// Axis perpendicular to the face.
    pub fn axis(self) -> Axis {
        match self {
            Face::R | Face::L => Axis::X,
            Face::U | Face::D => Axis::Y,
            Face::F | Face::B => Axis::Z,
        }
    }

    /// Coordinate shared by every piece in the face's layer.
    pub fn selector_value(self) -> i32 {
        match self {
            Face::R | Face::U | Face::F => 1,
            Face::L | Face::D | Face::B => -1,
        }
    }

    /// Outward unit normal as a grid coordinate.
    pub fn normal(self) -> Coord {
        let v = self.selector_value();
        match self.axis() {
            Axis::X => (v, 0, 0),
            Axis::Y => (0, v, 0),
            Axis::Z => (0, 0, v),
        }
    }

    /// Axis the layer turns about. Points out of the face.
    pub fn rotation_axis(self) -> Vec3 {
        crate::geometry::coord_to_vec3(self.normal())
    }

    /// Face whose outward normal is `normal`.
    pub fn from_normal(normal: Coord) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.normal() == normal)
    }
}

impl TryFrom<char> for Face {
    type Error = ParseFaceError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'R' => Ok(Face::R),
            'L' => Ok(Face::L),
            'U' => Ok(Face::U),
            'D' => Ok(Face::D),
            'F' => Ok(Face::F),
            'B' => Ok(Face::B),
            _ => Err(ParseFaceError::UnknownFace(c)),
        }
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Clockwise as seen looking at the face from outside the cube.
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// `+1` for clockwise, `-1` for counterclockwise.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// A quarter turn of one face.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Turn {
    pub face: Face,
    pub direction: Direction,
}

impl Turn {
    pub const fn new(face: Face, direction: Direction) -> Self {
        Self { face, direction }
    }

    /// Turn that undoes this one.
    pub fn inverse(self) -> Self {
        Self::new(self.face, self.direction.inverse())
    }

    /// Translates a key press into a turn.
    ///
    /// An unmodified face key turns clockwise; with shift held it turns
    /// counterclockwise. Keys that don't name a face return `None`.
    pub fn from_key(key: char, shifted: bool) -> Option<Self> {
        let face = Face::try_from(key).ok()?;
        let direction = if shifted {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        };
        Some(Self::new(face, direction))
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Clockwise => write!(f, "{}", self.face),
            Direction::CounterClockwise => write!(f, "{}'", self.face),
        }
    }
}

impl FromStr for Turn {
    type Err = ParseFaceError;

    /// Parses a face letter with an optional trailing `'`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .ok_or_else(|| ParseFaceError::Malformed(s.to_owned()))
            .and_then(Face::try_from)?;
        let direction = match chars.as_str() {
            "" => Direction::Clockwise,
            "'" => Direction::CounterClockwise,
            _ => return Err(ParseFaceError::Malformed(s.to_owned())),
        };
        Ok(Self::new(face, direction))
    }
}

/// Parses a whitespace-separated sequence of turns such as `R U R' U'`.
pub fn parse_turns(s: &str) -> Result<Vec<Turn>, ParseFaceError> {
    s.split_whitespace().map(str::parse).collect()
}
