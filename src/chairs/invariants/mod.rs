//! First-class invariants for musical chairs.
//!
//! Invariants are logical properties that must hold throughout a game.
//! The same property is usually checked twice: against the live
//! [`GameState`](super::GameState) after every transition (debug builds),
//! and against a finished game's [`EventLog`](super::EventLog).

mod seat_capacity;
mod seat_conservation;
mod single_elimination;
mod unique_elimination;

pub use seat_capacity::SeatCapacityInvariant;
pub use seat_conservation::SeatConservationInvariant;
pub use single_elimination::SingleEliminationInvariant;
pub use unique_elimination::UniqueEliminationInvariant;

use super::{EventLog, GameState};

/// A logical property that must hold for a given state.
pub trait Invariant<S: ?Sized> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S: ?Sized> {
    /// Checks all invariants in the set.
    ///
    /// Returns every violation, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect<S: ?Sized, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    S: ?Sized,
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    S: ?Sized,
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    S: ?Sized,
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        collect::<S, I1>(state, &mut violations);
        collect::<S, I2>(state, &mut violations);
        collect::<S, I3>(state, &mut violations);
        collect::<S, I4>(state, &mut violations);
        finish(violations)
    }
}

/// Invariants checked on the live state after every transition.
pub type TableInvariants = (
    SeatCapacityInvariant,
    SingleEliminationInvariant,
    SeatConservationInvariant,
);

/// Invariants checked on the event log of a finished game.
pub type EventLogInvariants = (
    SeatCapacityInvariant,
    SingleEliminationInvariant,
    SeatConservationInvariant,
    UniqueEliminationInvariant,
);

/// Audits a finished game's event log against every log invariant.
pub fn audit(log: &EventLog) -> Result<(), Vec<InvariantViolation>> {
    EventLogInvariants::check_all(log)
}

/// Checks the live state, joining violations into one message.
pub(crate) fn check_state(state: &GameState) -> Result<(), String> {
    TableInvariants::check_all(state).map_err(|violations| {
        violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    })
}
