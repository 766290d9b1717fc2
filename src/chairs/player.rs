//! Player worker: one thread per participant.

use super::Table;
use super::permits::AcquireError;
use super::signals::Phase;
use super::types::{Elimination, PlayerId};
use crate::error::{GameError, GameErrorKind, panic_message};
use crate::timing::ReactionTime;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// How a player's thread ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOutcome {
    /// Still standing when the game finished.
    Survived {
        /// Rounds this player took part in.
        rounds: u32,
    },
    /// Knocked out.
    Eliminated {
        /// Round of the elimination.
        round: u32,
    },
    /// Failed to sit after another player already resolved the round.
    Stranded {
        /// Round in which the player gave up.
        round: u32,
    },
}

/// A participant: waits for the music to stop, then races for a seat.
pub struct Player {
    id: PlayerId,
    table: Arc<Table>,
    reaction: Arc<dyn ReactionTime>,
}

impl Player {
    /// Creates a player seated at `table`.
    pub fn new(id: PlayerId, table: Arc<Table>, reaction: Arc<dyn ReactionTime>) -> Self {
        Self {
            id,
            table,
            reaction,
        }
    }

    /// The player's id.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Plays until eliminated or the game ends.
    ///
    /// Any error or panic tears the table down so the other threads exit
    /// too. A panic is reported as [`GameErrorKind::ThreadPanicked`].
    #[instrument(skip(self), fields(player = %self.id))]
    pub fn run(self) -> Result<PlayerOutcome, GameError> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.play())).unwrap_or_else(
            |payload| {
                let message = panic_message(&*payload);
                error!(%message, "Player thread panicked");
                Err(GameError::new(GameErrorKind::ThreadPanicked(format!(
                    "{}: {message}",
                    self.id
                ))))
            },
        );
        if let Err(err) = &outcome {
            self.table.abort(err.clone());
        }
        outcome
    }

    fn play(&self) -> Result<PlayerOutcome, GameError> {
        let mut last_round = 0;
        loop {
            let round = match self.table.phase().wait_past(last_round) {
                Phase::Finished => {
                    self.table.ensure_live()?;
                    debug!(rounds = last_round, "Game over, leaving the table");
                    return Ok(PlayerOutcome::Survived { rounds: last_round });
                }
                Phase::Scramble { round } => round,
            };
            last_round = round;

            let hesitation = self.reaction.reaction_time(self.id, round);
            if !hesitation.is_zero() {
                std::thread::sleep(hesitation);
            }

            let seated = match self.table.permits().acquire() {
                Ok(_permit) => self.table.try_sit(self.id)?,
                Err(AcquireError::Closed) => {
                    self.table.ensure_live()?;
                    false
                }
            };
            if seated {
                debug!(round, "Seated");
                continue;
            }

            return match self.table.eliminate(self.id)? {
                Elimination::Recorded { round } => {
                    info!(round, "Eliminated");
                    Ok(PlayerOutcome::Eliminated { round })
                }
                Elimination::AlreadyResolved { round, eliminated } => {
                    warn!(round, %eliminated, "Round already resolved, leaving");
                    Ok(PlayerOutcome::Stranded { round })
                }
            };
        }
    }
}
