//! Error types for the musical chairs engine.

use crate::chairs::PlayerId;
use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong while running a game.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameErrorKind {
    /// A state invariant failed after a transition (programmer error).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),

    /// The game cannot be played with the requested setup.
    #[display("Degenerate configuration: {}", _0)]
    DegenerateConfiguration(String),

    /// Seat permits were replenished or granted out of protocol.
    #[display("Seat permit misuse: {}", _0)]
    PermitMisuse(String),

    /// A player id outside `1..=total_players` reached the table.
    #[display("Unknown player {}", _0)]
    UnknownPlayer(PlayerId),

    /// Another thread failed and the table was torn down.
    #[display("Game aborted: {}", _0)]
    Aborted(String),

    /// A player or coordinator thread could not be spawned.
    #[display("Failed to spawn thread: {}", _0)]
    Spawn(String),

    /// A player or coordinator thread panicked.
    #[display("Thread panicked: {}", _0)]
    ThreadPanicked(String),
}

/// Game error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Game error: {} at {}:{}", kind, file, line)]
pub struct GameError {
    /// Error kind.
    pub kind: GameErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GameError {
    /// Creates a new game error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: GameErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &GameErrorKind {
        &self.kind
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl From<GameErrorKind> for GameError {
    #[track_caller]
    fn from(kind: GameErrorKind) -> Self {
        Self::new(kind)
    }
}
