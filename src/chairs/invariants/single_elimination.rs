//! Single elimination invariant: a round ends with exactly one player out.

use super::Invariant;
use crate::chairs::{EventLog, GameState, PlayerStatus};

/// Invariant: at most one elimination per round, and the active count
/// matches the eliminations recorded so far.
pub struct SingleEliminationInvariant;

impl Invariant<GameState> for SingleEliminationInvariant {
    fn holds(state: &GameState) -> bool {
        let expected_active = match state.eliminated() {
            Some(player) => {
                if state.status(player) != Some(PlayerStatus::Eliminated) {
                    return false;
                }
                state.players_at_round_start().saturating_sub(1)
            }
            None => state.players_at_round_start(),
        };

        state.active_players() == expected_active
            && state.count(PlayerStatus::Eliminated)
                == (state.total_players() - state.active_players()) as usize
    }

    fn description() -> &'static str {
        "At most one elimination per round, counted exactly once"
    }
}

impl Invariant<EventLog> for SingleEliminationInvariant {
    fn holds(log: &EventLog) -> bool {
        // Every played round fills all its seats and then loses exactly one player.
        log.rounds().iter().all(|round| {
            round.music_stopped
                && round.eliminated.len() == 1
                && round.seated.len() == round.seats as usize
        })
    }

    fn description() -> &'static str {
        "Each round resolves with all seats filled and exactly one elimination"
    }
}
