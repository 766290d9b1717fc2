//! Presenters turn the table's event stream into output.
//!
//! The engine only emits [`TimedEvent`]s; how they are shown is up to the
//! presenter. Presenters are called from whichever thread produced the
//! event, sometimes while the table lock is held, so they must be
//! `Send + Sync` and should not call back into the table.

mod json;
mod recording;
mod terminal;

pub use json::JsonLinesPresenter;
pub use recording::RecordingPresenter;
pub use terminal::TerminalPresenter;

use crate::chairs::{GameEvent, TimedEvent};
use std::sync::Arc;
use tracing::info;

/// Consumes game events.
pub trait Presenter: Send + Sync {
    /// Handles one event.
    fn present(&self, event: &TimedEvent);
}

/// Discards every event.
impl Presenter for () {
    fn present(&self, _event: &TimedEvent) {}
}

impl<P: Presenter + ?Sized> Presenter for Arc<P> {
    fn present(&self, event: &TimedEvent) {
        (**self).present(event)
    }
}

/// Logs every event through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn present(&self, event: &TimedEvent) {
        let at = event.at.to_rfc3339();
        match &event.event {
            GameEvent::GameStarted {
                total_players,
                initial_seats,
            } => info!(%at, total_players, initial_seats, "Game started"),
            GameEvent::RoundStarted {
                round,
                active_players,
                seats,
            } => info!(%at, round, active_players, seats, "Round started"),
            GameEvent::MusicStopped => info!(%at, "Music stopped"),
            GameEvent::PlayerSeated { seat_index, player } => {
                info!(%at, seat_index, player = %player, "Player seated")
            }
            GameEvent::PlayerEliminated { player } => {
                info!(%at, player = %player, "Player eliminated")
            }
            GameEvent::GameOver { winner } => info!(%at, winner = %winner, "Game over"),
        }
    }
}
