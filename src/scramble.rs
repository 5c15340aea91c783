//! Scrambling by random instant turns.
//!
//! A scramble holds the controller for its whole duration, so no animated
//! turn can start while it runs and it cannot start while a turn animates.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use crate::controller::{TickOutcome, TurnController, TurnRequest, TurnState};
use crate::error::{InvariantViolation, ScrambleError};
use crate::face::{Direction, Face, Turn};

/// Length of a full scramble.
pub const DEFAULT_SCRAMBLE_LENGTH: u32 = 20;

/// How scramble moves are spaced out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum IntervalPolicy {
    /// Apply every move in one call.
    #[default]
    Immediate,
    /// Apply one move per interval, as [`TurnController::tick`] reaches it.
    Fixed(Duration),
}

/// Parameters of a scramble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleParams {
    pub move_count: u32,
    /// Faces to pick from, uniformly.
    pub faces: Vec<Face>,
    pub interval: IntervalPolicy,
    /// Seed for a reproducible sequence. Seeded from the OS if `None`.
    pub seed: Option<u64>,
}

impl ScrambleParams {
    /// Immediate scramble of `move_count` moves over all six faces.
    pub fn new(move_count: u32) -> Self {
        Self {
            move_count,
            faces: Face::ALL.to_vec(),
            interval: IntervalPolicy::Immediate,
            seed: None,
        }
    }

    pub fn with_faces(mut self, faces: impl IntoIterator<Item = Face>) -> Self {
        self.faces = faces.into_iter().collect();
        self
    }

    pub fn with_interval(mut self, interval: IntervalPolicy) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Moves applied so far out of the total.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScrambleProgress {
    pub applied: usize,
    pub total: usize,
}

/// A scramble in progress.
#[derive(Debug, Clone)]
pub struct ScrambleRun {
    rng: ChaCha12Rng,
    faces: Vec<Face>,
    interval: Duration,
    total: usize,
    applied: Vec<Turn>,
    next_due: Duration,
}

impl ScrambleRun {
    fn new(params: ScrambleParams, now: Duration) -> Result<Self, ScrambleError> {
        if params.faces.is_empty() {
            return Err(ScrambleError::NoFaces);
        }
        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let interval = match params.interval {
            IntervalPolicy::Immediate => Duration::ZERO,
            IntervalPolicy::Fixed(interval) => interval,
        };
        Ok(Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
            faces: params.faces,
            interval,
            total: params.move_count as usize,
            applied: Vec::with_capacity(params.move_count as usize),
            next_due: now,
        })
    }

    fn random_turn(&mut self) -> Turn {
        let face = self.faces[self.rng.random_range(0..self.faces.len())];
        let direction = if self.rng.random_bool(0.5) {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        };
        Turn::new(face, direction)
    }

    fn is_done(&self) -> bool {
        self.applied.len() >= self.total
    }

    /// Returns the next move if it is due at `now`.
    fn next_due_turn(&mut self, now: Duration) -> Option<Turn> {
        if self.is_done() || self.next_due > now {
            return None;
        }
        let turn = self.random_turn();
        self.applied.push(turn);
        self.next_due = self.next_due.saturating_add(self.interval);
        Some(turn)
    }

    pub fn progress(&self) -> ScrambleProgress {
        ScrambleProgress {
            applied: self.applied.len(),
            total: self.total,
        }
    }
}

impl TurnController {
    /// Scrambles the cube with `move_count` random turns, all applied before
    /// this returns.
    pub fn scramble(&mut self, move_count: u32) -> Result<TurnRequest, ScrambleError> {
        self.start_scramble(ScrambleParams::new(move_count), Duration::ZERO)
    }

    /// Starts a scramble at `now`.
    ///
    /// An [`IntervalPolicy::Immediate`] scramble finishes before this returns.
    /// Otherwise the controller stays busy and each [`TurnController::tick`]
    /// applies the moves that have come due, the first one immediately.
    pub fn start_scramble(
        &mut self,
        params: ScrambleParams,
        now: Duration,
    ) -> Result<TurnRequest, ScrambleError> {
        if self.is_busy() {
            log::trace!("rejecting scramble: busy");
            return Ok(TurnRequest::Busy);
        }
        let immediate = params.interval == IntervalPolicy::Immediate;
        let mut run = ScrambleRun::new(params, now)?;
        log::info!("scrambling with {} moves", run.total);

        if immediate {
            while let Some(turn) = run.next_due_turn(now) {
                self.commit_instant(turn)?;
            }
            self.finish_scramble(run);
        } else {
            self.state = TurnState::Scrambling(run);
        }
        Ok(TurnRequest::Accepted)
    }

    pub(crate) fn tick_scramble(
        &mut self,
        now: Duration,
    ) -> Result<TickOutcome, InvariantViolation> {
        let TurnState::Scrambling(mut run) = std::mem::take(&mut self.state) else {
            return Ok(TickOutcome::Idle);
        };
        while let Some(turn) = run.next_due_turn(now) {
            log::trace!("scramble move {turn}");
            self.commit_instant(turn)?;
        }

        if run.is_done() {
            let moves = run.applied.len();
            self.finish_scramble(run);
            Ok(TickOutcome::ScrambleFinished { moves })
        } else {
            let progress = run.progress();
            self.state = TurnState::Scrambling(run);
            Ok(TickOutcome::Scrambling(progress))
        }
    }

    fn finish_scramble(&mut self, run: ScrambleRun) {
        log::info!("scramble finished after {} moves", run.applied.len());
        self.last_scramble = run.applied;
    }
}
