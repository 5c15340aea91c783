//! Turn controller: sequences animated turns and enforces that at most one
//! turn (or scramble) is active at a time.
//!
//! All state changes happen on the caller's thread, driven by
//! [`TurnController::tick`]. Between ticks every logical piece position is a
//! committed integer coordinate; only the orientations of pieces in the
//! turning layer are mid-interpolation.

use std::time::Duration;

use glam::{Quat, Vec3};
use strum::{Display, EnumString};

use crate::error::InvariantViolation;
use crate::face::Turn;
use crate::geometry::{coord_to_vec3, partial_rotation, turn_rotation};
use crate::layer::{select_layer, Layer};
use crate::pieces::{Coord, Cube, PieceId};
use crate::scramble::{ScrambleProgress, ScrambleRun};

/// Default time for one animated quarter turn.
pub const DEFAULT_TURN_DURATION: Duration = Duration::from_millis(250);

/// Interpolation curve applied to turn progress.
#[derive(Debug, Display, EnumString, Default, Copy, Clone, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Easing {
    /// Constant angular speed.
    Linear,
    /// Eases in and out.
    #[default]
    Cosine,
}

impl Easing {
    /// Maps linear progress in `0.0..=1.0` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Cosine => (1.0 - (t * std::f32::consts::PI).cos()) / 2.0,
        }
    }
}

/// Animation settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TurnConfig {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_TURN_DURATION,
            easing: Easing::default(),
        }
    }
}

/// Answer to a turn, scramble or reset request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[must_use]
pub enum TurnRequest {
    Accepted,
    /// Another turn or a scramble is in progress. Nothing changed; the
    /// caller may retry or drop the input.
    Busy,
}

/// What a call to [`TurnController::tick`] did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing is in progress.
    Idle,
    /// A turn is still animating.
    Animating { turn: Turn, progress: f32 },
    /// A turn finished and its positions were written back.
    Committed(Turn),
    /// A spaced-out scramble is still running.
    Scrambling(ScrambleProgress),
    /// A spaced-out scramble applied its last move.
    ScrambleFinished { moves: usize },
}

/// Coarse controller state, for display and queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Animating,
    Scrambling,
}

/// A turn that has been accepted and is animating.
#[derive(Debug, Clone)]
pub struct ActiveTurn {
    pub turn: Turn,
    pub started_at: Duration,
    pub layer: Layer,
    /// Full rotation applied at commit.
    rotation: Quat,
    /// Orientation of each layer piece when the turn started.
    base_orientations: Vec<Quat>,
    /// Rotation of the layer as of the last tick.
    live_rotation: Quat,
}

impl ActiveTurn {
    /// Linear progress at `now`, clamped to `0.0..=1.0`.
    fn progress_at(&self, now: Duration, duration: Duration) -> f32 {
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Current rotation of the turning layer.
    pub fn live_rotation(&self) -> Quat {
        self.live_rotation
    }
}

/// Controller state machine.
#[derive(Debug, Clone, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Animating(ActiveTurn),
    Scrambling(ScrambleRun),
}

/// Read-only view of one piece for drawing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub home: Coord,
    /// Logical position as of the last commit.
    pub position: Coord,
    /// Live orientation, possibly mid-turn.
    pub orientation: Quat,
    /// Live position in grid units, possibly mid-turn.
    pub display_position: Vec3,
}

/// Owns a [`Cube`] and is the only thing that turns it.
#[derive(Debug, Clone, Default)]
pub struct TurnController {
    cube: Cube,
    pub(crate) state: TurnState,
    config: TurnConfig,
    turns_committed: u64,
    pub(crate) last_scramble: Vec<Turn>,
}

impl TurnController {
    /// Constructs a controller for a solved cube.
    pub fn new(config: TurnConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> TurnConfig {
        self.config
    }

    /// Read-only access to the cube.
    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            TurnState::Idle => Phase::Idle,
            TurnState::Animating(_) => Phase::Animating,
            TurnState::Scrambling(_) => Phase::Scrambling,
        }
    }

    /// Returns whether a turn or scramble is in progress.
    pub fn is_busy(&self) -> bool {
        !matches!(self.state, TurnState::Idle)
    }

    /// Number of turns committed since the controller was created or reset,
    /// animated and instant alike.
    pub fn turns_committed(&self) -> u64 {
        self.turns_committed
    }

    /// Starts an animated turn at `now`.
    ///
    /// Rejected without effect if anything is already in progress; requests
    /// are never queued.
    pub fn request_turn(&mut self, turn: Turn, now: Duration) -> TurnRequest {
        if self.is_busy() {
            log::trace!("rejecting {turn}: busy");
            return TurnRequest::Busy;
        }

        let layer = select_layer(&self.cube, turn.face);
        let base_orientations = layer
            .pieces
            .iter()
            .map(|&id| self.cube.piece(id).orientation)
            .collect();
        log::debug!("starting {turn} on {} pieces", layer.pieces.len());

        self.state = TurnState::Animating(ActiveTurn {
            turn,
            started_at: now,
            layer,
            rotation: turn_rotation(turn),
            base_orientations,
            live_rotation: Quat::IDENTITY,
        });
        TurnRequest::Accepted
    }

    /// Applies a whole turn immediately, with no animation.
    ///
    /// Subject to the same exclusion as [`Self::request_turn`].
    pub fn apply_instant(&mut self, turn: Turn) -> Result<TurnRequest, InvariantViolation> {
        if self.is_busy() {
            log::trace!("rejecting instant {turn}: busy");
            return Ok(TurnRequest::Busy);
        }
        self.commit_instant(turn)?;
        Ok(TurnRequest::Accepted)
    }

    /// Selects, rotates and commits a layer in one step. Skips the busy check;
    /// scrambles call this while they hold the controller.
    pub(crate) fn commit_instant(&mut self, turn: Turn) -> Result<(), InvariantViolation> {
        let layer = select_layer(&self.cube, turn.face);
        let base_orientations: Vec<Quat> = layer
            .pieces
            .iter()
            .map(|&id| self.cube.piece(id).orientation)
            .collect();
        self.cube
            .commit_turn(&layer.pieces, turn_rotation(turn), &base_orientations)?;
        self.turns_committed += 1;
        Ok(())
    }

    /// Advances whatever is in progress to `now`.
    pub fn tick(&mut self, now: Duration) -> Result<TickOutcome, InvariantViolation> {
        match self.state {
            TurnState::Idle => Ok(TickOutcome::Idle),
            TurnState::Animating(_) => self.tick_turn(now),
            TurnState::Scrambling(_) => self.tick_scramble(now),
        }
    }

    fn tick_turn(&mut self, now: Duration) -> Result<TickOutcome, InvariantViolation> {
        let easing = self.config.easing;
        let duration = self.config.duration;

        if let TurnState::Animating(active) = &mut self.state {
            let progress = active.progress_at(now, duration);
            if progress < 1.0 {
                // from the pre-turn orientation each frame, so error never compounds
                active.live_rotation = partial_rotation(active.rotation, easing.apply(progress));
                for (&id, &base) in active.layer.pieces.iter().zip(&active.base_orientations) {
                    self.cube.set_orientation(id, active.live_rotation * base);
                }
                return Ok(TickOutcome::Animating {
                    turn: active.turn,
                    progress,
                });
            }
        }

        let TurnState::Animating(active) = std::mem::take(&mut self.state) else {
            return Ok(TickOutcome::Idle);
        };
        if let Err(e) = self.cube.commit_turn(
            &active.layer.pieces,
            active.rotation,
            &active.base_orientations,
        ) {
            // undo the live interpolation so the cube is left as it was
            for (&id, &base) in active.layer.pieces.iter().zip(&active.base_orientations) {
                self.cube.set_orientation(id, base);
            }
            return Err(e);
        }
        self.turns_committed += 1;
        log::debug!("committed {}", active.turn);
        Ok(TickOutcome::Committed(active.turn))
    }

    /// Snapshot of every piece for drawing.
    pub fn snapshot(&self) -> Vec<PieceSnapshot> {
        let active = match &self.state {
            TurnState::Animating(active) => Some(active),
            _ => None,
        };
        self.cube
            .pieces()
            .iter()
            .map(|piece| {
                let mut display_position = coord_to_vec3(piece.position);
                if let Some(active) = active {
                    if active.layer.pieces.contains(&piece.id) {
                        display_position = active.live_rotation * display_position;
                    }
                }
                PieceSnapshot {
                    id: piece.id,
                    home: piece.home,
                    position: piece.position,
                    orientation: piece.orientation,
                    display_position,
                }
            })
            .collect()
    }

    /// Progress of a running spaced-out scramble.
    pub fn scramble_progress(&self) -> Option<ScrambleProgress> {
        match &self.state {
            TurnState::Scrambling(run) => Some(run.progress()),
            _ => None,
        }
    }

    /// Turns applied by the most recent scramble.
    pub fn last_scramble(&self) -> &[Turn] {
        &self.last_scramble
    }

    /// Returns the cube to the solved state.
    pub fn reset(&mut self) -> TurnRequest {
        if self.is_busy() {
            return TurnRequest::Busy;
        }
        log::info!("resetting cube");
        self.cube = Cube::solved();
        self.turns_committed = 0;
        self.last_scramble.clear();
        TurnRequest::Accepted
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::face::{Direction, Face};
    use crate::geometry::same_rotation;
    use crate::pieces::GRID_POSITIONS;

    const R: Turn = Turn::new(Face::R, Direction::Clockwise);
    const R_PRIME: Turn = Turn::new(Face::R, Direction::CounterClockwise);
    const U: Turn = Turn::new(Face::U, Direction::Clockwise);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn linear() -> TurnController {
        TurnController::new(TurnConfig {
            duration: ms(250),
            easing: Easing::Linear,
        })
    }

    fn positions(controller: &TurnController) -> Vec<Coord> {
        controller.cube().pieces().iter().map(|p| p.position).collect()
    }

    /// Runs an animated turn to completion.
    fn animate(controller: &mut TurnController, turn: Turn, start: Duration) {
        assert_eq!(controller.request_turn(turn, start), TurnRequest::Accepted);
        assert_eq!(
            controller.tick(start + controller.config().duration).unwrap(),
            TickOutcome::Committed(turn)
        );
    }

    #[test]
    fn test_request_makes_controller_busy() {
        let mut controller = linear();
        assert!(!controller.is_busy());
        assert_eq!(controller.request_turn(R, ms(0)), TurnRequest::Accepted);
        assert!(controller.is_busy());
        assert_eq!(controller.phase(), Phase::Animating);
    }

    #[test]
    fn test_request_while_busy_is_ignored() {
        let mut controller = linear();
        let _ = controller.request_turn(R, ms(0));
        let before = positions(&controller);

        assert_eq!(controller.request_turn(U, ms(10)), TurnRequest::Busy);
        assert_eq!(controller.apply_instant(U), Ok(TurnRequest::Busy));
        assert_eq!(controller.reset(), TurnRequest::Busy);
        assert_eq!(positions(&controller), before);

        // the first turn is the one that commits
        assert_eq!(controller.tick(ms(250)), Ok(TickOutcome::Committed(R)));
        assert_eq!(controller.turns_committed(), 1);
    }

    #[test]
    fn test_positions_do_not_move_mid_turn() {
        let mut controller = linear();
        let _ = controller.request_turn(R, ms(1000));
        let before = positions(&controller);

        for t in [1000, 1050, 1125, 1249] {
            let outcome = controller.tick(ms(t)).unwrap();
            assert!(matches!(outcome, TickOutcome::Animating { .. }));
            assert_eq!(positions(&controller), before);
            assert_eq!(controller.cube().validate(), Ok(()));
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut controller = linear();
        let _ = controller.request_turn(R, ms(500));
        // a clock reading before the start counts as no progress
        assert_eq!(
            controller.tick(ms(100)),
            Ok(TickOutcome::Animating {
                turn: R,
                progress: 0.0
            })
        );
        assert_eq!(controller.tick(ms(10_000)), Ok(TickOutcome::Committed(R)));
        assert_eq!(controller.tick(ms(10_001)), Ok(TickOutcome::Idle));
    }

    #[test]
    fn test_live_orientation_interpolates() {
        let mut controller = linear();
        let corner = controller.cube().piece_at((1, 1, 1)).unwrap().id;
        let _ = controller.request_turn(R, ms(0));
        let _ = controller.tick(ms(125)).unwrap();

        let orientation = controller.cube().piece(corner).orientation;
        let expected = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4);
        assert!(same_rotation(orientation, expected));

        let snapshot = controller.snapshot();
        let live = snapshot[corner.index()].display_position;
        assert!((live - Vec3::new(1.0, 2f32.sqrt(), 0.0)).length() < 1e-4);
        assert_eq!(snapshot[corner.index()].position, (1, 1, 1));
    }

    #[test]
    fn test_untouched_pieces_keep_orientation() {
        let mut controller = linear();
        let _ = controller.request_turn(R, ms(0));
        let _ = controller.tick(ms(100)).unwrap();
        for piece in controller.cube().pieces() {
            if piece.position.0 != 1 {
                assert_eq!(piece.orientation, Quat::IDENTITY);
            }
        }
    }

    #[test]
    fn test_right_turn_mapping() {
        let mut controller = TurnController::default();
        animate(&mut controller, R, ms(0));

        let cube = controller.cube();
        let mut moved: Vec<(Coord, Coord)> = cube
            .pieces()
            .iter()
            .filter(|p| p.home.0 == 1)
            .map(|p| (p.home, p.position))
            .collect();
        moved.sort();
        assert_eq!(
            moved,
            vec![
                ((1, -1, -1), (1, -1, 1)),
                ((1, -1, 0), (1, 0, 1)),
                ((1, -1, 1), (1, 1, 1)),
                ((1, 0, -1), (1, -1, 0)),
                ((1, 0, 0), (1, 0, 0)),
                ((1, 0, 1), (1, 1, 0)),
                ((1, 1, -1), (1, -1, -1)),
                ((1, 1, 0), (1, 0, -1)),
                ((1, 1, 1), (1, 1, -1)),
            ]
        );
        for piece in cube.pieces().iter().filter(|p| p.home.0 != 1) {
            assert_eq!(piece.position, piece.home);
        }
        assert_eq!(cube.validate(), Ok(()));
    }

    #[test]
    fn test_round_trip() {
        for face in Face::iter() {
            let turn = Turn::new(face, Direction::Clockwise);
            let mut controller = TurnController::default();
            animate(&mut controller, U, ms(0));
            let before = controller.cube().clone();

            animate(&mut controller, turn, ms(1000));
            animate(&mut controller, turn.inverse(), ms(2000));

            for (piece, original) in controller.cube().pieces().iter().zip(before.pieces()) {
                assert_eq!(piece.position, original.position);
                assert!(same_rotation(piece.orientation, original.orientation));
            }
        }
    }

    #[test]
    fn test_four_turns_are_identity() {
        for face in Face::iter() {
            let turn = Turn::new(face, Direction::Clockwise);
            let mut controller = TurnController::default();
            for i in 0..4 {
                animate(&mut controller, turn, ms(i * 300));
            }
            assert!(controller.cube().is_solved(), "{face}4 should be solved");
        }
    }

    #[test]
    fn test_zero_duration_commits_on_first_tick() {
        let mut controller = TurnController::new(TurnConfig {
            duration: Duration::ZERO,
            easing: Easing::Cosine,
        });
        let _ = controller.request_turn(R_PRIME, ms(5));
        assert_eq!(controller.tick(ms(5)), Ok(TickOutcome::Committed(R_PRIME)));
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_instant_matches_animated() {
        let mut animated = TurnController::default();
        let mut instant = TurnController::default();
        for (i, turn) in [R, U, R_PRIME].into_iter().enumerate() {
            animate(&mut animated, turn, ms(i as u64 * 1000));
            assert_eq!(instant.apply_instant(turn), Ok(TurnRequest::Accepted));
        }
        assert_eq!(positions(&animated), positions(&instant));
        for (a, b) in animated.cube().pieces().iter().zip(instant.cube().pieces()) {
            assert!(same_rotation(a.orientation, b.orientation));
        }
    }

    #[test]
    fn test_failed_commit_restores_orientations() {
        let mut controller = linear();
        let _ = controller.request_turn(U, ms(0));
        // a quarter turn about x carries the U layer onto the F layer
        if let TurnState::Animating(active) = &mut controller.state {
            active.rotation = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        }
        let _ = controller.tick(ms(100)).unwrap();
        let before = positions(&controller);

        let result = controller.tick(ms(250));
        assert!(matches!(result, Err(InvariantViolation::Collision { .. })));
        assert!(!controller.is_busy());
        assert_eq!(positions(&controller), before);
        assert_eq!(controller.turns_committed(), 0);
        for piece in controller.cube().pieces() {
            assert!(same_rotation(piece.orientation, Quat::IDENTITY));
        }
    }

    #[test]
    fn test_reset() {
        let mut controller = TurnController::default();
        let _ = controller.apply_instant(R).unwrap();
        assert!(!controller.cube().is_solved());
        assert_eq!(controller.reset(), TurnRequest::Accepted);
        assert!(controller.cube().is_solved());
        assert_eq!(controller.turns_committed(), 0);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::Cosine] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-6);
        }
        assert!(Easing::Cosine.apply(0.1) < Easing::Linear.apply(0.1));
        assert_eq!("linear".parse::<Easing>(), Ok(Easing::Linear));
    }

    fn arb_turn() -> impl Strategy<Value = Turn> {
        (0..6usize, any::<bool>()).prop_map(|(face, clockwise)| {
            let direction = if clockwise {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
            Turn::new(Face::ALL[face], direction)
        })
    }

    proptest! {
        #[test]
        fn proptest_turns_preserve_bijection(turns in prop::collection::vec(arb_turn(), 0..40)) {
            let mut controller = TurnController::default();
            for turn in &turns {
                prop_assert_eq!(controller.apply_instant(*turn), Ok(TurnRequest::Accepted));
                prop_assert_eq!(controller.cube().validate(), Ok(()));
            }
            let mut seen: Vec<Coord> = positions(&controller);
            seen.sort();
            let mut expected = GRID_POSITIONS.to_vec();
            expected.sort();
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn proptest_inverse_sequence_solves(turns in prop::collection::vec(arb_turn(), 0..40)) {
            let mut controller = TurnController::default();
            for turn in &turns {
                let _ = controller.apply_instant(*turn).unwrap();
            }
            for turn in turns.iter().rev() {
                let _ = controller.apply_instant(turn.inverse()).unwrap();
            }
            prop_assert!(controller.cube().is_solved());
        }
    }
}
