//! Error types for the cube model.

use crate::pieces::{Coord, PieceId};

/// A broken cube invariant.
///
/// These indicate a defect in the rotation math, not bad input. Nothing in
/// the crate recovers from them; they are propagated to the caller so that
/// the front end can abort loudly.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("piece {piece} was rotated to {coord:?}, outside the 3x3x3 grid")]
    OutOfGrid { piece: PieceId, coord: Coord },
    #[error("pieces {first} and {second} both occupy {coord:?}")]
    Collision {
        first: PieceId,
        second: PieceId,
        coord: Coord,
    },
    #[error("expected 26 pieces, found {0}")]
    PieceCount(usize),
}

/// Text that does not name one of the six faces.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFaceError {
    #[error("{0:?} is not a face (expected one of R, L, U, D, F, B)")]
    UnknownFace(char),
    #[error("turn {0:?} is malformed")]
    Malformed(String),
}

/// Scramble parameters that cannot produce a scramble.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrambleError {
    #[error("scramble needs at least one face to turn")]
    NoFaces,
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}
