//! Broadcast phase signals between the coordinator and the players.
//!
//! Both signals are generation counters behind a mutex with a wake-all
//! condvar. Waiters always re-check their predicate, so a spurious wake
//! or a late arrival never misses a phase.

use super::PlayerId;
use crate::error::GameError;
use derive_new::new;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, instrument, warn};

/// What a waiting player observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The music stopped for this round.
    Scramble {
        /// Round whose scramble began.
        round: u32,
    },
    /// The game is over (or was aborted).
    Finished,
}

#[derive(Debug, Default)]
struct PhaseState {
    generation: u32,
    finished: bool,
}

/// "Music stopped" broadcast from the coordinator to every player.
#[derive(Debug, Default)]
pub struct PhaseSignal {
    state: Mutex<PhaseState>,
    changed: Condvar,
}

impl PhaseSignal {
    /// Creates a signal that has never been tripped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the music for `round`, waking every waiter.
    #[instrument(skip(self))]
    pub fn trip(&self, round: u32) {
        let mut state = self.state.lock();
        debug_assert!(round > state.generation, "phase generations must increase");
        state.generation = round;
        drop(state);
        self.changed.notify_all();
    }

    /// Marks the game finished, waking every waiter.
    #[instrument(skip(self))]
    pub fn finish(&self) {
        self.state.lock().finished = true;
        self.changed.notify_all();
    }

    /// Latest round tripped so far (0 if none).
    pub fn generation(&self) -> u32 {
        self.state.lock().generation
    }

    /// Blocks until a round after `seen` is tripped or the game finishes.
    #[instrument(level = "trace", skip(self))]
    pub fn wait_past(&self, seen: u32) -> Phase {
        let mut state = self.state.lock();
        loop {
            if state.finished {
                return Phase::Finished;
            }
            if state.generation > seen {
                return Phase::Scramble {
                    round: state.generation,
                };
            }
            self.changed.wait(&mut state);
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Resolution {
    /// The resolved round.
    pub round: u32,
    /// The player eliminated in that round.
    pub eliminated: PlayerId,
    /// Whether every seat was taken before the elimination.
    pub seats_filled: bool,
}

#[derive(Debug, Default)]
struct BarrierState {
    filled_round: u32,
    resolution: Option<Resolution>,
    aborted: Option<GameError>,
}

/// "Round resolved" broadcast from the players to the coordinator.
#[derive(Debug, Default)]
pub struct RoundBarrier {
    state: Mutex<BarrierState>,
    changed: Condvar,
}

impl RoundBarrier {
    /// Creates a barrier with no round resolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that every seat of `round` is taken.
    #[instrument(skip(self))]
    pub fn seats_filled(&self, round: u32) {
        self.state.lock().filled_round = round;
        self.changed.notify_all();
    }

    /// Resolves `round` with the elimination of `player`.
    #[instrument(skip(self), fields(player = %player))]
    pub fn resolve(&self, round: u32, player: PlayerId) {
        let mut state = self.state.lock();
        let seats_filled = state.filled_round == round;
        state.resolution = Some(Resolution::new(round, player, seats_filled));
        drop(state);
        self.changed.notify_all();
    }

    /// Tears the game down; every current and future wait returns `err`.
    ///
    /// Only the first error is kept.
    #[instrument(skip(self))]
    pub fn abort(&self, err: GameError) {
        let mut state = self.state.lock();
        if state.aborted.is_none() {
            warn!(error = %err, "Round barrier aborted");
            state.aborted = Some(err);
        }
        drop(state);
        self.changed.notify_all();
    }

    /// Returns the abort error, if any.
    pub fn aborted(&self) -> Option<GameError> {
        self.state.lock().aborted.clone()
    }

    /// Blocks until `round` is resolved or the game is aborted.
    #[instrument(skip(self))]
    pub fn wait_resolved(&self, round: u32) -> Result<Resolution, GameError> {
        let mut state = self.state.lock();
        loop {
            if let Some(err) = &state.aborted {
                return Err(err.clone());
            }
            if let Some(resolution) = state.resolution.filter(|r| r.round == round) {
                debug!(eliminated = %resolution.eliminated, "Round resolved");
                return Ok(resolution);
            }
            self.changed.wait(&mut state);
        }
    }
}
