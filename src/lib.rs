//! Musical Chairs library - a concurrent game engine
//!
//! Every player runs on its own thread and races for a bounded pool of
//! seat permits; a coordinator thread drives the rounds until one player
//! is left standing.
//!
//! # Architecture
//!
//! - **Chairs**: seat permits, round state, phase signals, players and the coordinator
//! - **Presenter**: turns the event stream into text, JSON lines or log records
//! - **Timing**: injectable round durations and player reaction times
//! - **Simulation**: spawns the threads and collects the result
//!
//! # Example
//!
//! ```no_run
//! use musical_chairs::{FixedDuration, MusicalChairs, RecordingPresenter};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), musical_chairs::GameError> {
//! let recorder = Arc::new(RecordingPresenter::new());
//! let summary = MusicalChairs::new(4)
//!     .with_shared_presenter(recorder.clone())
//!     .with_round_duration(FixedDuration::zero())
//!     .run()?;
//!
//! assert_eq!(summary.rounds(), &3);
//! assert!(musical_chairs::invariants::audit(&recorder.log()).is_ok());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod chairs;
mod config;
mod error;
mod presenter;
mod simulation;
mod timing;

// Crate-level exports - Engine
pub use chairs::{
    AcquireError, Coordinator, CoordinatorPhase, Elimination, GameState, Player, PlayerId,
    PlayerOutcome, PlayerStatus, RoundStart, SeatPermit, SeatPermits, Table,
};

// Crate-level exports - Signals
pub use chairs::{Phase, PhaseSignal, Resolution, RoundBarrier};

// Crate-level exports - Events
pub use chairs::{EventLog, GameEvent, GameSummary, RoundRecord, TimedEvent};

// Crate-level exports - Invariants
pub use chairs::invariants;

// Crate-level exports - Configuration
pub use config::{ConfigError, ConfigOverrides, GameConfig, OutputFormat};

// Crate-level exports - Errors
pub use error::{GameError, GameErrorKind};

// Crate-level exports - Presenters
pub use presenter::{
    JsonLinesPresenter, Presenter, RecordingPresenter, TerminalPresenter, TracingPresenter,
};

// Crate-level exports - Simulation
pub use simulation::{GameReport, MusicalChairs};

// Crate-level exports - Timing
pub use timing::{FixedDuration, Immediate, RandomDuration, ReactionTime, RoundDuration};
