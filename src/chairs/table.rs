//! The shared table: round state, seat permits and phase signals.
//!
//! A `Table` is created per game and handed to every thread behind an
//! `Arc`. Lock order is always state, then permits or barrier; the
//! permit pool and the signals never call back into the state.

use super::events::{GameEvent, TimedEvent};
use super::invariants;
use super::permits::SeatPermits;
use super::signals::{PhaseSignal, RoundBarrier};
use super::types::{Elimination, GameState, PlayerId};
use crate::error::{GameError, GameErrorKind};
use crate::presenter::Presenter;
use derive_new::new;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Parameters of a freshly opened round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct RoundStart {
    /// Round number.
    pub round: u32,
    /// Players in the round.
    pub active_players: u32,
    /// Seats offered.
    pub seats: u32,
}

/// Everything the coordinator and the players share.
pub struct Table {
    state: Mutex<GameState>,
    permits: SeatPermits,
    phase: PhaseSignal,
    barrier: RoundBarrier,
    presenter: Arc<dyn Presenter>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("state", &*self.state.lock())
            .field("permits", &self.permits)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Sets a table for `total_players`. Permit capacity is the player count.
    #[instrument(skip(presenter))]
    pub fn new(total_players: u32, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            state: Mutex::new(GameState::new(total_players)),
            permits: SeatPermits::new(total_players as usize),
            phase: PhaseSignal::new(),
            barrier: RoundBarrier::new(),
            presenter,
        }
    }

    /// A copy of the current round state.
    pub fn snapshot(&self) -> GameState {
        self.state.lock().clone()
    }

    /// The seat permit pool.
    pub fn permits(&self) -> &SeatPermits {
        &self.permits
    }

    /// The "music stopped" signal.
    pub fn phase(&self) -> &PhaseSignal {
        &self.phase
    }

    /// The "round resolved" barrier.
    pub fn barrier(&self) -> &RoundBarrier {
        &self.barrier
    }

    /// Hands an event to the presenter.
    pub fn announce(&self, event: GameEvent) {
        self.presenter.present(&TimedEvent::now(event));
    }

    /// Opens `round`: resets the seats, refills the permits and announces it.
    ///
    /// Only the coordinator calls this, and only after the previous round
    /// is resolved.
    #[instrument(skip(self))]
    pub fn begin_round(&self, round: u32) -> Result<RoundStart, GameError> {
        let mut state = self.state.lock();
        state.begin_round(round);
        self.permits.replenish(state.seats() as usize)?;
        verify(&state)?;

        let start = RoundStart::new(round, state.active_players(), state.seats());
        self.announce(GameEvent::RoundStarted {
            round: start.round,
            active_players: start.active_players,
            seats: start.seats,
        });
        Ok(start)
    }

    /// Stops the music for `round`, releasing every waiting player.
    #[instrument(skip(self))]
    pub fn stop_music(&self, round: u32) {
        self.announce(GameEvent::MusicStopped);
        self.phase.trip(round);
    }

    /// Atomically claims a seat for `player`.
    ///
    /// Returns `false`, leaving the state untouched, when no seat is left.
    /// The player who takes the last seat closes the permits and reports
    /// the full round to the barrier.
    #[instrument(skip(self), fields(player = %player))]
    pub fn try_sit(&self, player: PlayerId) -> Result<bool, GameError> {
        let mut state = self.state.lock();
        let Some(seat_index) = state.take_seat(player)? else {
            debug!("No seat left");
            return Ok(false);
        };

        self.announce(GameEvent::PlayerSeated { seat_index, player });
        if state.is_full() {
            debug!(round = state.round(), "Last seat taken");
            self.permits.close();
            self.barrier.seats_filled(state.round());
        }
        verify(&state)?;
        Ok(true)
    }

    /// Records that `player` failed to sit.
    ///
    /// The first failure of a round decrements the active count and
    /// resolves the barrier; later ones change nothing.
    #[instrument(skip(self), fields(player = %player))]
    pub fn eliminate(&self, player: PlayerId) -> Result<Elimination, GameError> {
        let mut state = self.state.lock();
        let elimination = state.record_elimination(player)?;

        if let Elimination::Recorded { round } = elimination {
            self.announce(GameEvent::PlayerEliminated { player });
            self.barrier.resolve(round, player);
            info!(round, remaining = state.active_players(), "Player eliminated");
        }
        verify(&state)?;
        Ok(elimination)
    }

    /// Announces the winner and releases every parked player.
    #[instrument(skip(self), fields(winner = %winner))]
    pub fn finish(&self, winner: PlayerId) {
        self.announce(GameEvent::GameOver { winner });
        self.phase.finish();
    }

    /// Tears the game down after a fatal error so no thread stays parked.
    #[instrument(skip(self))]
    pub fn abort(&self, err: GameError) {
        warn!(error = %err, "Aborting game");
        self.barrier.abort(err);
        self.phase.finish();
        self.permits.close();
    }

    /// Fails if the game was aborted.
    pub fn ensure_live(&self) -> Result<(), GameError> {
        match self.barrier.aborted() {
            Some(err) => Err(GameError::new(GameErrorKind::Aborted(err.to_string()))),
            None => Ok(()),
        }
    }
}

fn verify(state: &GameState) -> Result<(), GameError> {
    if cfg!(debug_assertions) {
        invariants::check_state(state)
            .map_err(|message| GameError::new(GameErrorKind::InvariantViolation(message)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chairs::PlayerStatus;
    use crate::presenter::RecordingPresenter;

    fn table(players: u32) -> (Table, Arc<RecordingPresenter>) {
        let recorder = Arc::new(RecordingPresenter::new());
        (Table::new(players, recorder.clone()), recorder)
    }

    fn p(id: u32) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_begin_round_refills_permits() {
        let (table, recorder) = table(4);
        let start = table.begin_round(1).unwrap();

        assert_eq!(start.seats, 3);
        assert_eq!(table.permits().available(), 3);
        assert_eq!(
            recorder.kinds(),
            vec![GameEvent::RoundStarted {
                round: 1,
                active_players: 4,
                seats: 3
            }]
        );
    }

    #[test]
    fn test_last_seat_closes_permits_and_signals() {
        let (table, _) = table(3);
        table.begin_round(1).unwrap();
        let _a = table.permits().acquire().unwrap();
        let _b = table.permits().acquire().unwrap();

        assert!(table.try_sit(p(1)).unwrap());
        assert!(!table.permits().is_closed());
        assert!(table.try_sit(p(2)).unwrap());
        assert!(table.permits().is_closed());
        assert!(!table.try_sit(p(3)).unwrap());
    }

    #[test]
    fn test_only_first_failure_is_recorded() {
        let (table, recorder) = table(3);
        table.begin_round(1).unwrap();

        assert_eq!(table.eliminate(p(3)).unwrap(), Elimination::Recorded { round: 1 });
        assert!(matches!(
            table.eliminate(p(2)).unwrap(),
            Elimination::AlreadyResolved { .. }
        ));

        let state = table.snapshot();
        assert_eq!(state.active_players(), 2);
        assert_eq!(state.status(p(2)), Some(PlayerStatus::Waiting));
        let eliminations: Vec<_> = recorder
            .kinds()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PlayerEliminated { .. }))
            .collect();
        assert_eq!(eliminations.len(), 1);
        assert_eq!(table.barrier().wait_resolved(1).unwrap().eliminated, p(3));
    }

    #[test]
    fn test_begin_round_with_leftover_permits_is_misuse() {
        let (table, _) = table(4);
        table.begin_round(1).unwrap();

        let err = table.begin_round(2).unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::PermitMisuse(_)));
    }

    #[test]
    fn test_abort_releases_everything() {
        let (table, _) = table(3);
        table.abort(GameError::new(GameErrorKind::Aborted("boom".into())));

        assert!(table.ensure_live().is_err());
        assert!(table.permits().is_closed());
        assert!(table.barrier().wait_resolved(1).is_err());
    }
}
