//! Piece definitions and the coordinate model.
//!
//! Each of the 26 movable pieces sits at an integer grid position in
//! `{-1, 0, 1}^3` minus the center. A piece is created once when the cube is
//! built and is never recreated; turns only move it and rotate it.

use std::fmt;

use glam::Quat;
use rustc_hash::FxHashMap;

use crate::error::InvariantViolation;
use crate::geometry::{rotate_coord, snap_orientation};

/// A 3D grid coordinate, each component in `-1..=1`.
pub type Coord = (i32, i32, i32);

/// Number of movable pieces in a 3x3x3 cube.
pub const NUM_PIECES: usize = 26;

/// Every legal piece position, in x-major order.
///
/// Piece `i` starts (and is solved) at `GRID_POSITIONS[i]`.
pub const GRID_POSITIONS: [Coord; NUM_PIECES] = build_grid_positions();

const fn build_grid_positions() -> [Coord; NUM_PIECES] {
    let mut positions = [(0, 0, 0); NUM_PIECES];
    let mut i = 0;
    let mut cell = 0;
    while cell < 27 {
        let x = (cell / 9) as i32 - 1;
        let y = ((cell / 3) % 3) as i32 - 1;
        let z = (cell % 3) as i32 - 1;
        // the center is not a movable piece
        if !(x == 0 && y == 0 && z == 0) {
            positions[i] = (x, y, z);
            i += 1;
        }
        cell += 1;
    }
    positions
}

/// Returns whether `coord` is one of the 26 legal piece positions.
#[inline]
pub fn is_grid_position(coord: Coord) -> bool {
    let (x, y, z) = coord;
    let in_range = |c: i32| (-1..=1).contains(&c);
    in_range(x) && in_range(y) && in_range(z) && coord != (0, 0, 0)
}

/// Stable identity of a piece.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub(crate) u8);

impl PieceId {
    /// Returns the id with the given index, or `None` past the last piece.
    pub fn new(index: usize) -> Option<Self> {
        (index < NUM_PIECES).then(|| Self(index as u8))
    }

    /// Index into [`Cube::pieces`].
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-letter label (`a` through `z`) used in text layouts.
    pub fn letter(self) -> char {
        char::from(b'a' + self.0)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One movable piece of the cube.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub id: PieceId,
    /// Position in the solved cube. Determines which stickers the piece has.
    pub home: Coord,
    /// Current logical position. Only changes when a turn commits.
    pub position: Coord,
    /// Accumulated rotation relative to the solved cube. Mid-turn this is the
    /// live, interpolated value.
    pub orientation: Quat,
}

impl Piece {
    /// Outward normals of the stickers painted on this piece when the cube
    /// was built, in the piece's home frame.
    ///
    /// Corners have three, edges two and centers one.
    pub fn stickers(&self) -> impl Iterator<Item = Coord> {
        let (x, y, z) = self.home;
        [(x, 0, 0), (0, y, 0), (0, 0, z)]
            .into_iter()
            .filter(|&normal| normal != (0, 0, 0))
    }
}

/// The full cube state: all 26 pieces and where they are.
///
/// Invariant: piece positions are a permutation of [`GRID_POSITIONS`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pieces: Vec<Piece>,
}

impl Default for Cube {
    fn default() -> Self {
        Self::solved()
    }
}

impl Cube {
    /// Builds a cube in the solved state.
    pub fn solved() -> Self {
        let pieces = GRID_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, &home)| Piece {
                id: PieceId(i as u8),
                home,
                position: home,
                orientation: Quat::IDENTITY,
            })
            .collect();
        Self { pieces }
    }

    /// Returns all 26 pieces, indexed by [`PieceId`].
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Returns the piece currently occupying `coord`, if any.
    pub fn piece_at(&self, coord: Coord) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.position == coord)
    }

    /// Returns whether every piece is at home with identity orientation.
    pub fn is_solved(&self) -> bool {
        self.pieces.iter().all(|piece| {
            piece.position == piece.home
                && crate::geometry::same_rotation(piece.orientation, Quat::IDENTITY)
        })
    }

    /// Checks that the pieces occupy every legal position exactly once.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        check_bijection(self.pieces.iter().map(|piece| (piece.id, piece.position)))
    }

    /// Overwrites the live orientation of a piece. Used while a turn animates;
    /// positions are left alone.
    pub(crate) fn set_orientation(&mut self, id: PieceId, orientation: Quat) {
        self.pieces[id.index()].orientation = orientation;
    }

    fn set_position(&mut self, id: PieceId, coord: Coord) {
        self.pieces[id.index()].position = coord;
    }

    /// Commits a turn of `layer` by `rotation`.
    ///
    /// `base_orientations[i]` is the pre-turn orientation of `layer[i]`. All
    /// new positions are computed from the pre-turn positions and checked
    /// before anything is written, so a failed commit leaves the cube as it
    /// was.
    pub(crate) fn commit_turn(
        &mut self,
        layer: &[PieceId],
        rotation: Quat,
        base_orientations: &[Quat],
    ) -> Result<(), InvariantViolation> {
        debug_assert_eq!(layer.len(), base_orientations.len());

        let mut new_positions: Vec<Coord> = self.pieces.iter().map(|p| p.position).collect();
        for &id in layer {
            new_positions[id.index()] = rotate_coord(self.piece(id).position, rotation);
        }
        check_bijection(
            new_positions
                .iter()
                .enumerate()
                .map(|(i, &coord)| (PieceId(i as u8), coord)),
        )?;

        for (&id, &base) in layer.iter().zip(base_orientations) {
            self.set_position(id, new_positions[id.index()]);
            self.set_orientation(id, snap_orientation(rotation * base));
        }
        Ok(())
    }
}

fn check_bijection(
    positions: impl Iterator<Item = (PieceId, Coord)>,
) -> Result<(), InvariantViolation> {
    let mut occupied: FxHashMap<Coord, PieceId> = FxHashMap::default();
    for (id, coord) in positions {
        if !is_grid_position(coord) {
            return Err(InvariantViolation::OutOfGrid { piece: id, coord });
        }
        if let Some(&first) = occupied.get(&coord) {
            return Err(InvariantViolation::Collision {
                first,
                second: id,
                coord,
            });
        }
        occupied.insert(coord, id);
    }
    // no duplicates and all in range, so 26 entries means no gaps
    if occupied.len() != NUM_PIECES {
        return Err(InvariantViolation::PieceCount(occupied.len()));
    }
    Ok(())
}
