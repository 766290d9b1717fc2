//! Seat capacity invariant: never more players seated than seats offered.

use super::Invariant;
use crate::chairs::{EventLog, GameState, PlayerStatus};

/// Invariant: `0 ≤ seated_count ≤ seats`, and seat indices are handed
/// out once each, in order.
pub struct SeatCapacityInvariant;

impl Invariant<GameState> for SeatCapacityInvariant {
    fn holds(state: &GameState) -> bool {
        state.seated_count() <= state.seats()
            && state.count(PlayerStatus::Seated) == state.seated_count() as usize
    }

    fn description() -> &'static str {
        "Seated players never exceed the seats of the round"
    }
}

impl Invariant<EventLog> for SeatCapacityInvariant {
    fn holds(log: &EventLog) -> bool {
        log.rounds().iter().all(|round| {
            round.round > 0
                && round.seated.len() <= round.seats as usize
                && round
                    .seated
                    .iter()
                    .enumerate()
                    .all(|(i, (seat, _))| *seat as usize == i + 1)
        })
    }

    fn description() -> &'static str {
        "Every round seats at most its seat count, each seat once"
    }
}
