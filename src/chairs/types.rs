//! Core domain types for musical chairs.

use crate::error::{GameError, GameErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Identity of a participant, numbered from 1.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("P{_0}")]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a player id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Iterates over the ids of a game with `total` players.
    pub fn all(total: u32) -> impl Iterator<Item = PlayerId> {
        (1..=total).map(PlayerId)
    }

    fn index(self) -> Option<usize> {
        self.0.checked_sub(1).map(|i| i as usize)
    }
}

/// Where a player stands in the current round.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum PlayerStatus {
    /// Waiting for the music to stop.
    #[default]
    Waiting,
    /// Holds a seat this round.
    Seated,
    /// Out of the game (terminal).
    Eliminated,
}

/// Result of a failed seat check reported to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elimination {
    /// This player was the first to fail and is now out.
    Recorded {
        /// Round in which the player was eliminated.
        round: u32,
    },
    /// Someone else already resolved the round; nothing changed.
    AlreadyResolved {
        /// Round that was already resolved.
        round: u32,
        /// The player recorded as eliminated for that round.
        eliminated: PlayerId,
    },
}

/// Shared round bookkeeping.
///
/// One instance lives behind the table's lock. Players claim seats and
/// report eliminations; only the coordinator starts rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    total_players: u32,
    active_players: u32,
    seats: u32,
    seated_count: u32,
    round: u32,
    players_at_round_start: u32,
    eliminated: Option<PlayerId>,
    statuses: Vec<PlayerStatus>,
}

impl GameState {
    /// Creates the state for a fresh game. No round is open yet.
    #[instrument]
    pub fn new(total_players: u32) -> Self {
        Self {
            total_players,
            active_players: total_players,
            seats: total_players.saturating_sub(1),
            seated_count: 0,
            round: 0,
            players_at_round_start: total_players,
            eliminated: None,
            statuses: vec![PlayerStatus::Waiting; total_players as usize],
        }
    }

    /// Players the game started with.
    pub fn total_players(&self) -> u32 {
        self.total_players
    }

    /// Players not yet eliminated.
    pub fn active_players(&self) -> u32 {
        self.active_players
    }

    /// Seats available in the current round.
    pub fn seats(&self) -> u32 {
        self.seats
    }

    /// Players seated so far this round.
    pub fn seated_count(&self) -> u32 {
        self.seated_count
    }

    /// Current round number (0 before the first round starts).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Active players when the current round started.
    pub fn players_at_round_start(&self) -> u32 {
        self.players_at_round_start
    }

    /// The player eliminated this round, if the round is resolved.
    pub fn eliminated(&self) -> Option<PlayerId> {
        self.eliminated
    }

    /// Returns true once this round's elimination has been recorded.
    pub fn is_resolved(&self) -> bool {
        self.eliminated.is_some()
    }

    /// Returns true when every seat of the round is taken.
    pub fn is_full(&self) -> bool {
        self.seated_count == self.seats
    }

    /// Returns the status of a player.
    pub fn status(&self, player: PlayerId) -> Option<PlayerStatus> {
        player.index().and_then(|i| self.statuses.get(i)).copied()
    }

    /// Statuses indexed by `PlayerId - 1`.
    pub fn statuses(&self) -> &[PlayerStatus] {
        &self.statuses
    }

    /// Number of players with the given status.
    pub fn count(&self, status: PlayerStatus) -> usize {
        self.statuses.iter().filter(|s| **s == status).count()
    }

    /// The last player standing, once only one remains.
    pub fn winner(&self) -> Option<PlayerId> {
        if self.active_players != 1 {
            return None;
        }
        PlayerId::all(self.total_players)
            .find(|p| self.status(*p) != Some(PlayerStatus::Eliminated))
    }

    /// Opens a round: one seat fewer than active players, nobody seated.
    #[instrument(skip(self), fields(active = self.active_players))]
    pub(crate) fn begin_round(&mut self, round: u32) {
        for status in &mut self.statuses {
            if *status == PlayerStatus::Seated {
                *status = PlayerStatus::Waiting;
            }
        }
        self.round = round;
        self.players_at_round_start = self.active_players;
        self.seats = self.active_players.saturating_sub(1);
        self.seated_count = 0;
        self.eliminated = None;
        debug!(round, seats = self.seats, "Round opened");
    }

    /// Claims the next free seat for `player`.
    ///
    /// Returns the 1-based seat index, or `None` when every seat is
    /// taken. The check and the increment happen together, so callers
    /// must hold the table lock.
    #[instrument(skip(self), fields(round = self.round))]
    pub(crate) fn take_seat(&mut self, player: PlayerId) -> Result<Option<u32>, GameError> {
        let index = self.index_of(player)?;
        match self.statuses[index] {
            PlayerStatus::Waiting => {}
            other => {
                return Err(GameError::new(GameErrorKind::InvariantViolation(format!(
                    "{player} tried to sit while {other}"
                ))));
            }
        }

        if self.seated_count >= self.seats {
            return Ok(None);
        }

        self.seated_count += 1;
        self.statuses[index] = PlayerStatus::Seated;
        Ok(Some(self.seated_count))
    }

    /// Records `player` as this round's elimination, first failure wins.
    #[instrument(skip(self), fields(round = self.round))]
    pub(crate) fn record_elimination(&mut self, player: PlayerId) -> Result<Elimination, GameError> {
        let index = self.index_of(player)?;

        if let Some(eliminated) = self.eliminated {
            debug!(%eliminated, "Round already resolved");
            return Ok(Elimination::AlreadyResolved {
                round: self.round,
                eliminated,
            });
        }

        if self.statuses[index] != PlayerStatus::Waiting {
            return Err(GameError::new(GameErrorKind::InvariantViolation(format!(
                "{player} cannot be eliminated while {}",
                self.statuses[index]
            ))));
        }

        self.active_players = self.active_players.saturating_sub(1);
        self.statuses[index] = PlayerStatus::Eliminated;
        self.eliminated = Some(player);
        Ok(Elimination::Recorded { round: self.round })
    }

    fn index_of(&self, player: PlayerId) -> Result<usize, GameError> {
        player
            .index()
            .filter(|i| *i < self.statuses.len())
            .ok_or_else(|| GameError::new(GameErrorKind::UnknownPlayer(player)))
    }

    #[cfg(test)]
    pub(crate) fn force_seated_count(&mut self, count: u32) {
        self.seated_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: u32) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_new_state_has_one_seat_fewer_than_players() {
        let state = GameState::new(4);
        assert_eq!(state.active_players(), 4);
        assert_eq!(state.seats(), 3);
        assert_eq!(state.round(), 0);
        assert!(!state.is_resolved());
    }

    #[test]
    fn test_take_seat_fills_in_order_then_refuses() {
        let mut state = GameState::new(3);
        state.begin_round(1);

        assert_eq!(state.take_seat(p(2)).unwrap(), Some(1));
        assert_eq!(state.take_seat(p(3)).unwrap(), Some(2));
        assert!(state.is_full());
        assert_eq!(state.take_seat(p(1)).unwrap(), None);
        assert_eq!(state.seated_count(), 2);
        assert_eq!(state.status(p(1)), Some(PlayerStatus::Waiting));
    }

    #[test]
    fn test_first_failure_wins() {
        let mut state = GameState::new(3);
        state.begin_round(1);

        assert_eq!(
            state.record_elimination(p(1)).unwrap(),
            Elimination::Recorded { round: 1 }
        );
        assert_eq!(
            state.record_elimination(p(2)).unwrap(),
            Elimination::AlreadyResolved {
                round: 1,
                eliminated: p(1)
            }
        );
        assert_eq!(state.active_players(), 2);
        assert_eq!(state.count(PlayerStatus::Eliminated), 1);
    }

    #[test]
    fn test_begin_round_resets_seats_and_flag() {
        let mut state = GameState::new(3);
        state.begin_round(1);
        state.take_seat(p(1)).unwrap();
        state.take_seat(p(2)).unwrap();
        state.record_elimination(p(3)).unwrap();

        state.begin_round(2);
        assert_eq!(state.seats(), 1);
        assert_eq!(state.seated_count(), 0);
        assert_eq!(state.players_at_round_start(), 2);
        assert!(!state.is_resolved());
        assert_eq!(state.status(p(1)), Some(PlayerStatus::Waiting));
        assert_eq!(state.status(p(3)), Some(PlayerStatus::Eliminated));
    }

    #[test]
    fn test_eliminated_player_cannot_sit() {
        let mut state = GameState::new(2);
        state.begin_round(1);
        state.record_elimination(p(2)).unwrap();
        state.begin_round(2);

        let err = state.take_seat(p(2)).unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::InvariantViolation(_)));
    }

    #[test]
    fn test_unknown_player_rejected() {
        let mut state = GameState::new(2);
        state.begin_round(1);

        let err = state.take_seat(p(0)).unwrap_err();
        assert_eq!(err.kind(), &GameErrorKind::UnknownPlayer(p(0)));
        let err = state.take_seat(p(3)).unwrap_err();
        assert_eq!(err.kind(), &GameErrorKind::UnknownPlayer(p(3)));
    }

    #[test]
    fn test_winner_only_when_one_remains() {
        let mut state = GameState::new(2);
        assert_eq!(state.winner(), None);
        state.begin_round(1);
        state.take_seat(p(2)).unwrap();
        state.record_elimination(p(1)).unwrap();
        assert_eq!(state.winner(), Some(p(2)));
    }
}
