//! Twister Library
//!
//! Models a 3x3x3 twisty cube: 26 pieces on an integer grid, selection of the
//! nine pieces in a face layer, quarter-turn rotation of that layer, and a
//! controller that animates one turn at a time or applies scrambles
//! instantly.

pub mod controller;
pub mod error;
pub mod face;
pub mod geometry;
pub mod grid;
pub mod layer;
pub mod pieces;
pub mod scramble;

pub use controller::{
    Easing, Phase, PieceSnapshot, TickOutcome, TurnConfig, TurnController, TurnRequest,
};
pub use error::{InvariantViolation, ParseFaceError, ScrambleError};
pub use face::{Direction, Face, Turn};
pub use pieces::{Coord, Cube, Piece, PieceId};
pub use scramble::{IntervalPolicy, ScrambleParams, ScrambleProgress};
