//! Seat conservation invariant: one seat fewer than players, every round.

use super::Invariant;
use crate::chairs::{EventLog, GameEvent, GameState};

/// Invariant: `seats == players_at_round_start - 1`, and the active count
/// drops by exactly one from round to round until one player remains.
pub struct SeatConservationInvariant;

impl Invariant<GameState> for SeatConservationInvariant {
    fn holds(state: &GameState) -> bool {
        state.round() == 0 || state.seats() == state.players_at_round_start().saturating_sub(1)
    }

    fn description() -> &'static str {
        "Each round offers one seat fewer than the players who started it"
    }
}

impl Invariant<EventLog> for SeatConservationInvariant {
    fn holds(log: &EventLog) -> bool {
        let Some(total) = log.total_players() else {
            return log.rounds().is_empty();
        };

        let initial_seats_ok = log.events().iter().all(|e| match e {
            GameEvent::GameStarted { initial_seats, .. } => {
                *initial_seats == total.saturating_sub(1)
            }
            _ => true,
        });

        let rounds = log.rounds();
        let mut expected_active = total;
        for (i, round) in rounds.iter().enumerate() {
            if round.round as usize != i + 1
                || round.active_players != expected_active
                || round.seats != expected_active.saturating_sub(1)
            {
                return false;
            }
            expected_active = expected_active.saturating_sub(1);
        }

        let round_count_ok = rounds.len() == total.saturating_sub(1) as usize
            || log.winners().is_empty();

        initial_seats_ok && round_count_ok
    }

    fn description() -> &'static str {
        "Rounds shrink by one player and one seat until a single player remains"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(round: u32, active_players: u32, seats: u32) -> GameEvent {
        GameEvent::RoundStarted {
            round,
            active_players,
            seats,
        }
    }

    #[test]
    fn test_skipped_decrement_violates() {
        let log = EventLog::new(vec![
            GameEvent::GameStarted {
                total_players: 4,
                initial_seats: 3,
            },
            round(1, 4, 3),
            round(2, 4, 3),
        ]);
        assert!(!SeatConservationInvariant::holds(&log));
    }

    #[test]
    fn test_wrong_seat_count_violates() {
        let log = EventLog::new(vec![
            GameEvent::GameStarted {
                total_players: 3,
                initial_seats: 2,
            },
            round(1, 3, 3),
        ]);
        assert!(!SeatConservationInvariant::holds(&log));
    }

    #[test]
    fn test_shrinking_rounds_hold() {
        let log = EventLog::new(vec![
            GameEvent::GameStarted {
                total_players: 3,
                initial_seats: 2,
            },
            round(1, 3, 2),
            round(2, 2, 1),
        ]);
        assert!(SeatConservationInvariant::holds(&log));
    }

    #[test]
    fn test_state_before_first_round_holds() {
        assert!(SeatConservationInvariant::holds(&GameState::new(5)));
    }
}
