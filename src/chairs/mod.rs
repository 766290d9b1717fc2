//! The musical chairs coordination engine.
//!
//! - [`SeatPermits`]: bounded pool of claimable seats
//! - [`GameState`]: round bookkeeping behind the table lock
//! - [`PhaseSignal`] / [`RoundBarrier`]: broadcast phase changes
//! - [`Player`]: one worker thread per participant
//! - [`Coordinator`]: the round state machine
//! - [`Table`]: the per-game handle that ties them together

mod coordinator;
mod events;
pub mod invariants;
mod permits;
mod player;
mod signals;
mod table;
mod types;

pub use coordinator::{Coordinator, CoordinatorPhase, GameSummary};
pub use events::{EventLog, GameEvent, RoundRecord, TimedEvent};
pub use permits::{AcquireError, SeatPermit, SeatPermits};
pub use player::{Player, PlayerOutcome};
pub use signals::{Phase, PhaseSignal, Resolution, RoundBarrier};
pub use table::{RoundStart, Table};
pub use types::{Elimination, GameState, PlayerId, PlayerStatus};
