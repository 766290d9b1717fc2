//! Bounded seat permits.
//!
//! A permit must be held before a player may try to sit. The pool never
//! holds more than the total player count, is refilled only by the
//! coordinator between rounds, and is closed when the last seat of a
//! round is taken so that the seatless player stops waiting.

use crate::error::{GameError, GameErrorKind};
use derive_more::{Display, Error};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, instrument, trace};

/// Error returned when no permit can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum AcquireError {
    /// Every permit of the round is gone and the pool was closed.
    #[display("seat permits are closed for this round")]
    Closed,
}

/// Proof that a seat permit was consumed.
///
/// Permits are never handed back: seats are reset by the coordinator.
#[derive(Debug)]
#[must_use = "a permit entitles the holder to one seat attempt"]
pub struct SeatPermit {
    _private: (),
}

#[derive(Debug, Default)]
struct PermitState {
    available: usize,
    closed: bool,
    replenished: usize,
    granted: usize,
}

/// A counting resource of claimable seats.
#[derive(Debug)]
pub struct SeatPermits {
    state: Mutex<PermitState>,
    changed: Condvar,
    capacity: usize,
}

impl SeatPermits {
    /// Creates an empty, open pool that may hold up to `capacity` permits.
    #[instrument]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(PermitState::default()),
            changed: Condvar::new(),
            capacity,
        }
    }

    /// Maximum number of permits the pool may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently claimable.
    pub fn available(&self) -> usize {
        self.state.lock().available
    }

    /// Returns true if the pool was closed for the current round.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// `(granted, replenished)` for the current round.
    pub fn usage(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.granted, state.replenished)
    }

    /// Takes one permit, blocking while the pool is empty and open.
    ///
    /// Grants only ever come out of `available`, so a round can never
    /// hand out more permits than it was replenished with.
    #[instrument(level = "trace", skip(self))]
    pub fn acquire(&self) -> Result<SeatPermit, AcquireError> {
        let mut state = self.state.lock();
        loop {
            if state.available > 0 {
                state.available -= 1;
                state.granted += 1;
                trace!(remaining = state.available, "Permit granted");
                return Ok(SeatPermit { _private: () });
            }
            if state.closed {
                trace!("Pool closed, no permit");
                return Err(AcquireError::Closed);
            }
            self.changed.wait(&mut state);
        }
    }

    /// Refills the pool with `permits` for a new round and reopens it.
    ///
    /// The previous round's permits must be fully drained, and the pool
    /// never exceeds its capacity. A refill of zero leaves the pool closed.
    #[instrument(skip(self))]
    pub fn replenish(&self, permits: usize) -> Result<(), GameError> {
        let mut state = self.state.lock();

        if state.available > 0 {
            return Err(GameError::new(GameErrorKind::PermitMisuse(format!(
                "{} permits of the previous round were never drained",
                state.available
            ))));
        }
        if permits > self.capacity {
            return Err(GameError::new(GameErrorKind::PermitMisuse(format!(
                "cannot hold {permits} permits, capacity is {}",
                self.capacity
            ))));
        }

        state.available = permits;
        state.replenished = permits;
        state.granted = 0;
        state.closed = permits == 0;
        drop(state);

        self.changed.notify_all();
        debug!(permits, "Seat permits replenished");
        Ok(())
    }

    /// Closes the pool: blocked and future acquirers get [`AcquireError::Closed`]
    /// once the remaining permits are gone.
    #[instrument(skip(self))]
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.changed.notify_all();
        debug!("Seat permits closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_acquire_consumes_replenished_permits() {
        let permits = SeatPermits::new(4);
        permits.replenish(2).unwrap();

        assert!(permits.acquire().is_ok());
        assert!(permits.acquire().is_ok());
        assert_eq!(permits.available(), 0);
        assert_eq!(permits.usage(), (2, 2));
    }

    #[test]
    fn test_replenish_rejects_undrained_pool() {
        let permits = SeatPermits::new(4);
        permits.replenish(3).unwrap();
        let _permit = permits.acquire().unwrap();

        let err = permits.replenish(2).unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::PermitMisuse(_)));
    }

    #[test]
    fn test_replenish_rejects_over_capacity() {
        let permits = SeatPermits::new(2);
        let err = permits.replenish(3).unwrap_err();
        assert!(matches!(err.kind(), GameErrorKind::PermitMisuse(_)));
    }

    #[test]
    fn test_zero_replenish_is_closed() {
        let permits = SeatPermits::new(2);
        permits.replenish(0).unwrap();
        assert!(permits.is_closed());
        assert_eq!(permits.acquire().unwrap_err(), AcquireError::Closed);
    }

    #[test]
    fn test_close_wakes_blocked_acquirer() {
        let permits = Arc::new(SeatPermits::new(2));
        permits.replenish(1).unwrap();
        let _first = permits.acquire().unwrap();

        let waiter = {
            let permits = Arc::clone(&permits);
            thread::spawn(move || permits.acquire().map(|_| ()))
        };

        thread::sleep(Duration::from_millis(20));
        permits.close();
        assert_eq!(waiter.join().unwrap(), Err(AcquireError::Closed));
    }

    #[test]
    fn test_only_replenished_count_gets_through() {
        let permits = Arc::new(SeatPermits::new(8));
        permits.replenish(5).unwrap();
        let granted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let permits = Arc::clone(&permits);
                let granted = Arc::clone(&granted);
                thread::spawn(move || {
                    if permits.acquire().is_ok() {
                        granted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        while granted.load(Ordering::SeqCst) < 5 {
            thread::yield_now();
        }
        permits.close();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(granted.load(Ordering::SeqCst), 5);
        assert_eq!(permits.usage(), (5, 5));
    }

    #[test]
    fn test_exhausted_round_refuses_extra_acquires() {
        let permits = SeatPermits::new(4);
        permits.replenish(2).unwrap();
        let _a = permits.acquire().unwrap();
        let _b = permits.acquire().unwrap();
        permits.close();

        assert_eq!(permits.acquire().unwrap_err(), AcquireError::Closed);
        assert_eq!(permits.acquire().unwrap_err(), AcquireError::Closed);
        assert_eq!(permits.usage(), (2, 2));
    }

    #[test]
    fn test_replenish_reopens_closed_pool() {
        let permits = SeatPermits::new(3);
        permits.replenish(1).unwrap();
        let _permit = permits.acquire().unwrap();
        permits.close();

        permits.replenish(1).unwrap();
        assert!(!permits.is_closed());
        assert!(permits.acquire().is_ok());
    }
}
