//! Text renderings of the cube state.
//!
//! [`format_layout`] shows which piece sits where, one z-slice per block.
//! [`facelets`] and [`format_facelets`] show the sticker colors, using the
//! usual URFDLB facelet order where each face is read row by row as seen from
//! outside the cube (U with B at the top, D with F at the top, the four side
//! faces with U at the top).

use crate::face::Face;
use crate::geometry::rotate_coord;
use crate::pieces::{Coord, Cube};

/// Face order used by facelet strings.
pub const FACELET_ORDER: [Face; 6] = [Face::U, Face::R, Face::F, Face::D, Face::L, Face::B];

/// Formats piece positions as three z-slices side by side.
///
/// Each piece is shown by its letter (`a` for piece 0 through `z` for piece
/// 25). Rows run from `y = 1` at the top to `y = -1`, columns from `x = -1`
/// to `x = 1`. The center cell shows as `.`.
pub fn format_layout(cube: &Cube) -> String {
    let mut output = format!("{:<3}  {:<3}  {}\n", "z-", "z0", "z+");

    for y in [1, 0, -1] {
        for z in [-1, 0, 1] {
            if z > -1 {
                output.push_str("  ");
            }
            for x in [-1, 0, 1] {
                let display_char = match cube.piece_at((x, y, z)) {
                    Some(piece) => piece.id.letter(),
                    None => '.',
                };
                output.push(display_char);
            }
        }
        output.push('\n');
    }

    output
}

/// Right and down directions across a face, as seen from outside.
fn face_frame(face: Face) -> (Coord, Coord) {
    match face {
        Face::U => ((1, 0, 0), (0, 0, 1)),
        Face::D => ((1, 0, 0), (0, 0, -1)),
        Face::R => ((0, 0, -1), (0, -1, 0)),
        Face::L => ((0, 0, 1), (0, -1, 0)),
        Face::F => ((1, 0, 0), (0, -1, 0)),
        Face::B => ((-1, 0, 0), (0, -1, 0)),
    }
}

/// Sticker color at row `row`, column `col` of `face`, named by the face it
/// belongs to in the solved cube.
///
/// Only meaningful between turns; mid-turn orientations are not on the grid.
fn facelet(cube: &Cube, face: Face, row: i32, col: i32) -> Option<Face> {
    let (nx, ny, nz) = face.normal();
    let ((rx, ry, rz), (dx, dy, dz)) = face_frame(face);
    let (c, r) = (col - 1, row - 1);
    let position = (nx + c * rx + r * dx, ny + c * ry + r * dy, nz + c * rz + r * dz);

    let piece = cube.piece_at(position)?;
    piece
        .stickers()
        .find(|&sticker| rotate_coord(sticker, piece.orientation) == face.normal())
        .and_then(Face::from_normal)
}

fn facelet_rows(cube: &Cube, face: Face) -> [String; 3] {
    [0, 1, 2].map(|row| {
        (0..3)
            .map(|col| facelet(cube, face, row, col).map_or('?', face_char))
            .collect()
    })
}

fn face_char(face: Face) -> char {
    face.to_string().chars().next().unwrap_or('?')
}

/// Returns the 54 sticker colors in URFDLB order.
pub fn facelets(cube: &Cube) -> String {
    FACELET_ORDER
        .iter()
        .flat_map(|&face| facelet_rows(cube, face))
        .collect()
}

/// Formats the sticker colors with one line per face, rows separated by `/`.
pub fn format_facelets(cube: &Cube) -> String {
    let mut output = String::new();
    for face in FACELET_ORDER {
        output.push_str(&format!("{face}: {}\n", facelet_rows(cube, face).join("/")));
    }
    output
}
