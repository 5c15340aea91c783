//! 3D rotation utilities for layer turns.
//!
//! Orientations are unit quaternions. A committed orientation is always one
//! of the 24 rotations of a cube, so it is snapped back onto that group after
//! every turn instead of letting float error accumulate.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Quat, Vec3};

use crate::face::Turn;
use crate::pieces::Coord;

/// Converts a grid coordinate to a vector.
#[inline]
pub fn coord_to_vec3((x, y, z): Coord) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Rounds each component of a vector to the nearest integer.
#[inline]
pub fn round_to_coord(v: Vec3) -> Coord {
    (v.x.round() as i32, v.y.round() as i32, v.z.round() as i32)
}

/// Full rotation performed by a turn.
///
/// A clockwise turn (as seen from outside the face) is a negative rotation
/// about the face's outward axis, so `+1` follows the usual R/U/F notation
/// rather than the right-hand rule about that axis.
pub fn turn_rotation(turn: Turn) -> Quat {
    let angle = -(turn.direction.sign() as f32) * FRAC_PI_2;
    Quat::from_axis_angle(turn.face.rotation_axis(), angle)
}

/// Fraction `t` of `rotation`, spherically interpolated from the identity.
#[inline]
pub fn partial_rotation(rotation: Quat, t: f32) -> Quat {
    Quat::IDENTITY.slerp(rotation, t.clamp(0.0, 1.0))
}

/// Applies `rotation` to a grid coordinate (or a face normal) and rounds the
/// result.
///
/// The caller is responsible for checking that the result is still on the
/// grid; for a quarter turn about a coordinate axis it always is.
pub fn rotate_coord(coord: Coord, rotation: Quat) -> Coord {
    round_to_coord(rotation * coord_to_vec3(coord))
}

/// Snaps an orientation to the nearest rotation whose matrix has entries in
/// `{-1, 0, 1}`.
pub fn snap_orientation(orientation: Quat) -> Quat {
    let m = Mat3::from_quat(orientation.normalize());
    let snap = |v: Vec3| Vec3::new(v.x.round(), v.y.round(), v.z.round());
    let snapped = Mat3::from_cols(snap(m.x_axis), snap(m.y_axis), snap(m.z_axis));
    Quat::from_mat3(&snapped).normalize()
}

/// Returns whether two quaternions describe the same rotation.
///
/// `q` and `-q` are the same rotation.
#[inline]
pub fn same_rotation(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - 1e-4
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::face::{Direction, Face};
    use crate::pieces::GRID_POSITIONS;

    /// Exact integer clockwise quarter turn for each face.
    fn clockwise_exact(face: Face, (x, y, z): Coord) -> Coord {
        match face {
            Face::R => (x, z, -y),
            Face::L => (x, -z, y),
            Face::U => (-z, y, x),
            Face::D => (z, y, -x),
            Face::F => (y, -x, z),
            Face::B => (-y, x, z),
        }
    }

    #[test]
    fn test_rotation_matches_exact_formulas() {
        for face in Face::iter() {
            let rotation = turn_rotation(Turn::new(face, Direction::Clockwise));
            for &coord in &GRID_POSITIONS {
                assert_eq!(
                    rotate_coord(coord, rotation),
                    clockwise_exact(face, coord),
                    "{face} moved {coord:?} incorrectly"
                );
            }
        }
    }

    #[test]
    fn test_counterclockwise_is_inverse() {
        for face in Face::iter() {
            let cw = turn_rotation(Turn::new(face, Direction::Clockwise));
            let ccw = turn_rotation(Turn::new(face, Direction::CounterClockwise));
            assert!(same_rotation(cw * ccw, Quat::IDENTITY));
        }
    }

    #[test]
    fn test_partial_rotation_endpoints() {
        let rotation = turn_rotation(Turn::new(Face::U, Direction::Clockwise));
        assert!(same_rotation(partial_rotation(rotation, 0.0), Quat::IDENTITY));
        assert!(same_rotation(partial_rotation(rotation, 1.0), rotation));
        assert!(same_rotation(partial_rotation(rotation, 7.0), rotation));

        let half = partial_rotation(rotation, 0.5);
        assert!((half.angle_between(Quat::IDENTITY) - FRAC_PI_2 / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_snap_removes_drift() {
        let rotation = turn_rotation(Turn::new(Face::F, Direction::Clockwise));
        let drifted = Quat::from_rotation_x(0.003) * rotation;
        let snapped = snap_orientation(drifted);
        assert!(same_rotation(snapped, rotation));
        assert!(snapped.dot(rotation).abs() > 1.0 - 1e-6);
    }

    #[test]
    fn test_face_normals_follow_turn() {
        // R sends the up sticker of the right layer to the back
        let rotation = turn_rotation(Turn::new(Face::R, Direction::Clockwise));
        assert_eq!(rotate_coord((0, 1, 0), rotation), (0, 0, -1));
        assert_eq!(rotate_coord((0, 0, 1), rotation), (0, 1, 0));
        assert_eq!(rotate_coord((1, 0, 0), rotation), (1, 0, 0));
    }
}
