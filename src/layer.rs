//! Layer selection.

use glam::Vec3;

use crate::face::Face;
use crate::pieces::{Cube, PieceId};

/// The pieces in one face layer, together with the axis the layer turns
/// about.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub face: Face,
    pub pieces: Vec<PieceId>,
    pub axis: Vec3,
}

/// Selects the pieces whose position along the face's axis equals the face's
/// selector value.
///
/// Only logical positions are consulted, never orientations.
pub fn select_layer(cube: &Cube, face: Face) -> Layer {
    let axis = face.axis();
    let value = face.selector_value();
    let pieces = cube
        .pieces()
        .iter()
        .filter(|piece| axis.component(piece.position) == value)
        .map(|piece| piece.id)
        .collect();

    Layer {
        face,
        pieces,
        axis: face.rotation_axis(),
    }
}
