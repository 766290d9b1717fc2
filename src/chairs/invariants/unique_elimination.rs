//! Unique elimination invariant: nobody is knocked out twice, and the
//! winner is never knocked out at all.

use super::Invariant;
use crate::chairs::{EventLog, GameEvent, PlayerId};
use std::collections::BTreeSet;

/// Invariant: eliminations are distinct, the single `GameOver` closes the
/// log, and every player ends up either eliminated or the winner.
pub struct UniqueEliminationInvariant;

impl Invariant<EventLog> for UniqueEliminationInvariant {
    fn holds(log: &EventLog) -> bool {
        let eliminations = log.eliminations();
        let distinct: BTreeSet<PlayerId> = eliminations.iter().copied().collect();
        if distinct.len() != eliminations.len() {
            return false;
        }

        let winners = log.winners();
        let [winner] = winners.as_slice() else {
            return false;
        };
        if distinct.contains(winner) {
            return false;
        }
        if !matches!(log.events().last(), Some(GameEvent::GameOver { .. })) {
            return false;
        }

        match log.total_players() {
            Some(total) => {
                let mut everyone = distinct;
                everyone.insert(*winner);
                everyone.into_iter().eq(PlayerId::all(total))
            }
            None => false,
        }
    }

    fn description() -> &'static str {
        "No player is eliminated twice and the winner is never eliminated"
    }
}
