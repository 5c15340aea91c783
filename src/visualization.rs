//! Interactive 3D view of the cube using kiss3d.

use std::time::{Duration, Instant};

use kiss3d::prelude::*;

use twister::controller::{Phase, PieceSnapshot, TurnController};
use twister::face::{Face, Turn};
use twister::pieces::Coord;
use twister::scramble::{IntervalPolicy, ScrambleParams, DEFAULT_SCRAMBLE_LENGTH};

/// Size of each rendered piece (slightly smaller than 1.0 for visible gaps).
const PIECE_SIZE: f32 = 0.9;
/// Distance between neighboring grid cells.
const CELL_SPACING: f32 = 1.0;
/// Delay between moves of a scramble started from the viewer.
const SCRAMBLE_INTERVAL: Duration = Duration::from_millis(60);

/// Sticker color for each face of the solved cube.
fn face_color(face: Face) -> Color {
    match face {
        Face::R => Color::new(1.0, 0.0, 0.0, 1.0),  // red
        Face::L => Color::new(1.0, 0.55, 0.0, 1.0), // orange
        Face::U => Color::new(0.0, 1.0, 0.0, 1.0),  // green
        Face::D => Color::new(0.0, 0.0, 1.0, 1.0),  // blue
        Face::F => Color::new(1.0, 1.0, 1.0, 1.0),  // white
        Face::B => Color::new(1.0, 1.0, 0.0, 1.0),  // yellow
    }
}

/// Maps a key to the face letter it turns.
fn key_char(key: kiss3d::event::Key) -> Option<char> {
    use kiss3d::event::Key;
    match key {
        Key::R => Some('R'),
        Key::L => Some('L'),
        Key::U => Some('U'),
        Key::D => Some('D'),
        Key::F => Some('F'),
        Key::B => Some('B'),
        _ => None,
    }
}

/// A rendered piece: a dark body with its stickers attached as children.
struct RenderedPiece {
    node: SceneNode3d,
}

fn to_vec3((x, y, z): Coord) -> Vec3 {
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Builds one node per piece, with a thin colored plate for each sticker.
///
/// Sticker plates are placed in the piece's home frame; rotating the body
/// carries them along.
fn build_scene(scene: &mut SceneNode3d, controller: &TurnController) -> Vec<RenderedPiece> {
    /// Sticker plate edge length.
    const STICKER_SIZE: f32 = 0.8;
    /// Sticker plate thickness.
    const STICKER_DEPTH: f32 = 0.04;

    controller
        .cube()
        .pieces()
        .iter()
        .map(|piece| {
            let mut node = scene
                .add_cube(PIECE_SIZE, PIECE_SIZE, PIECE_SIZE)
                .set_color(Color::new(0.07, 0.07, 0.07, 1.0));

            for normal in piece.stickers() {
                let Some(face) = Face::from_normal(normal) else {
                    continue;
                };
                let n = to_vec3(normal);
                let extent = |component: f32| {
                    if component == 0.0 {
                        STICKER_SIZE
                    } else {
                        STICKER_DEPTH
                    }
                };
                node.add_cube(extent(n.x), extent(n.y), extent(n.z))
                    .set_color(face_color(face))
                    .set_position(n * (PIECE_SIZE / 2.0));
            }

            RenderedPiece { node }
        })
        .collect()
}

/// Moves and rotates every piece node to match a snapshot.
fn sync_scene(pieces: &mut [RenderedPiece], snapshot: &[PieceSnapshot]) {
    for (rendered, piece) in pieces.iter_mut().zip(snapshot) {
        let p = piece.display_position;
        let q = piece.orientation;
        rendered
            .node
            .set_position(Vec3::new(p.x, p.y, p.z) * CELL_SPACING);
        rendered.node.set_rotation(Quat::from_xyzw(q.x, q.y, q.z, q.w));
    }
}

fn window_title(controller: &TurnController) -> String {
    match controller.phase() {
        Phase::Idle if controller.cube().is_solved() => "Twister - solved".to_owned(),
        Phase::Idle => format!("Twister - {} turns", controller.turns_committed()),
        Phase::Animating => "Twister - turning".to_owned(),
        Phase::Scrambling => match controller.scramble_progress() {
            Some(progress) => format!(
                "Twister - scrambling {}/{}",
                progress.applied, progress.total
            ),
            None => "Twister - scrambling".to_owned(),
        },
    }
}

/// Runs the interactive viewer until the window is closed.
pub fn display(controller: TurnController) -> eyre::Result<()> {
    pollster::block_on(display_async(controller))
}

async fn display_async(mut controller: TurnController) -> eyre::Result<()> {
    let mut window = Window::new(&window_title(&controller)).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(8.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 5.0, 5.0));

    let mut rendered_pieces = build_scene(&mut scene, &controller);
    let clock = Instant::now();
    let mut title = window_title(&controller);

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, modifiers) = event.value {
                use kiss3d::event::{Action, Key, Modifiers};
                if action != Action::Press {
                    continue;
                }
                if key == Key::Space {
                    let params = ScrambleParams::new(DEFAULT_SCRAMBLE_LENGTH)
                        .with_interval(IntervalPolicy::Fixed(SCRAMBLE_INTERVAL));
                    let _ = controller.start_scramble(params, clock.elapsed())?;
                    continue;
                }
                // keys that don't name a face never reach the controller
                let shifted = modifiers.contains(Modifiers::Shift);
                if let Some(turn) = key_char(key).and_then(|c| Turn::from_key(c, shifted)) {
                    let _ = controller.request_turn(turn, clock.elapsed());
                }
            }
        }

        controller.tick(clock.elapsed())?;
        sync_scene(&mut rendered_pieces, &controller.snapshot());

        let new_title = window_title(&controller);
        if new_title != title {
            window.set_title(&new_title);
            title = new_title;
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
    Ok(())
}
