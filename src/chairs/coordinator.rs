//! Coordinator: drives the round life-cycle.
//!
//! The coordinator is an explicit state machine. Each call to
//! [`Coordinator::step`] performs one transition:
//!
//! ```text
//! Idle → MusicPlaying → MusicStopped → RoundResolving → NextRound → MusicPlaying …
//!                                                    ↘ GameOver
//! ```

use super::Table;
use super::events::GameEvent;
use super::types::PlayerId;
use crate::error::{GameError, GameErrorKind};
use crate::timing::RoundDuration;
use derive_getters::Getters;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Where the coordinator is in the round life-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum CoordinatorPhase {
    /// Nothing announced yet.
    Idle,
    /// The round is open; waiting out the round duration.
    MusicPlaying {
        /// Current round.
        round: u32,
    },
    /// Players are scrambling; waiting for resolution.
    MusicStopped {
        /// Current round.
        round: u32,
    },
    /// The round is resolved; deciding what comes next.
    RoundResolving {
        /// Current round.
        round: u32,
    },
    /// The next round must be opened.
    NextRound {
        /// Round about to open.
        round: u32,
    },
    /// One player remains.
    GameOver {
        /// The last player standing.
        winner: PlayerId,
    },
}

/// What a finished game looked like.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct GameSummary {
    /// Players at the start.
    total_players: u32,
    /// Rounds played.
    rounds: u32,
    /// Eliminated players, in order.
    eliminations: Vec<PlayerId>,
    /// The last player standing.
    winner: PlayerId,
}

/// Drives rounds until one player remains.
pub struct Coordinator {
    table: Arc<Table>,
    durations: Box<dyn RoundDuration>,
    phase: CoordinatorPhase,
    rounds: u32,
    eliminations: Vec<PlayerId>,
}

impl Coordinator {
    /// Creates a coordinator in the `Idle` phase.
    pub fn new(table: Arc<Table>, durations: Box<dyn RoundDuration>) -> Self {
        Self {
            table,
            durations,
            phase: CoordinatorPhase::Idle,
            rounds: 0,
            eliminations: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> CoordinatorPhase {
        self.phase
    }

    /// Runs the game to completion.
    ///
    /// Any error tears the table down so parked players exit.
    #[instrument(skip(self))]
    pub fn run(mut self) -> Result<GameSummary, GameError> {
        loop {
            match self.step() {
                Ok(CoordinatorPhase::GameOver { winner }) => {
                    info!(%winner, rounds = self.rounds, "Game over");
                    return Ok(GameSummary {
                        total_players: self.table.snapshot().total_players(),
                        rounds: self.rounds,
                        eliminations: self.eliminations,
                        winner,
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    self.table.abort(err.clone());
                    return Err(err);
                }
            }
        }
    }

    /// Performs one transition and returns the new phase.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn step(&mut self) -> Result<CoordinatorPhase, GameError> {
        let next = match self.phase {
            CoordinatorPhase::Idle => self.start()?,
            CoordinatorPhase::MusicPlaying { round } => {
                let delay = self.durations.round_duration(round);
                debug!(round, ?delay, "Music playing");
                std::thread::sleep(delay);
                self.table.stop_music(round);
                CoordinatorPhase::MusicStopped { round }
            }
            CoordinatorPhase::MusicStopped { round } => {
                let resolution = self.table.barrier().wait_resolved(round)?;
                if !resolution.seats_filled {
                    return Err(GameError::new(GameErrorKind::InvariantViolation(format!(
                        "round {round} eliminated {} before every seat was taken",
                        resolution.eliminated
                    ))));
                }
                self.rounds = round;
                self.eliminations.push(resolution.eliminated);
                CoordinatorPhase::RoundResolving { round }
            }
            CoordinatorPhase::RoundResolving { round } => {
                let state = self.table.snapshot();
                if state.active_players() == 1 {
                    let winner = state.winner().ok_or_else(|| {
                        GameError::new(GameErrorKind::InvariantViolation(
                            "one active player but no winner".to_string(),
                        ))
                    })?;
                    self.table.finish(winner);
                    CoordinatorPhase::GameOver { winner }
                } else {
                    CoordinatorPhase::NextRound { round: round + 1 }
                }
            }
            CoordinatorPhase::NextRound { round } => {
                self.table.begin_round(round)?;
                CoordinatorPhase::MusicPlaying { round }
            }
            CoordinatorPhase::GameOver { winner } => CoordinatorPhase::GameOver { winner },
        };
        self.phase = next;
        Ok(next)
    }

    fn start(&mut self) -> Result<CoordinatorPhase, GameError> {
        let state = self.table.snapshot();
        let total_players = state.total_players();
        if total_players == 0 {
            return Err(GameError::new(GameErrorKind::DegenerateConfiguration(
                "a game needs at least one player".to_string(),
            )));
        }
        self.table.announce(GameEvent::GameStarted {
            total_players,
            initial_seats: state.seats(),
        });

        match total_players {
            1 => {
                let winner = PlayerId::new(1);
                info!(%winner, "Single player wins without a round");
                self.table.finish(winner);
                Ok(CoordinatorPhase::GameOver { winner })
            }
            _ => {
                self.table.begin_round(1)?;
                Ok(CoordinatorPhase::MusicPlaying { round: 1 })
            }
        }
    }
}
