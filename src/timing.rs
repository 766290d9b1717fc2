//! Delay providers injected into the engine.
//!
//! The coordinator asks a [`RoundDuration`] how long the music plays
//! each round; players ask a [`ReactionTime`] how long they hesitate
//! once it stops. Neither affects correctness, only interleaving.

use crate::chairs::PlayerId;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{instrument, trace};

/// How long the music plays in a round.
pub trait RoundDuration: Send {
    /// Delay before the music stops in `round`.
    fn round_duration(&mut self, round: u32) -> Duration;
}

impl<F> RoundDuration for F
where
    F: FnMut(u32) -> Duration + Send,
{
    fn round_duration(&mut self, round: u32) -> Duration {
        self(round)
    }
}

/// The same delay every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedDuration(pub Duration);

impl FixedDuration {
    /// No delay at all.
    pub fn zero() -> Self {
        Self(Duration::ZERO)
    }
}

impl RoundDuration for FixedDuration {
    fn round_duration(&mut self, _round: u32) -> Duration {
        self.0
    }
}

/// Uniformly random delay in `min..=max`, in whole milliseconds.
#[derive(Debug, Clone)]
pub struct RandomDuration {
    rng: ChaCha8Rng,
    min_ms: u64,
    max_ms: u64,
}

impl RandomDuration {
    /// Default lower bound: two seconds.
    pub const DEFAULT_MIN: Duration = Duration::from_secs(2);
    /// Default upper bound: five seconds.
    pub const DEFAULT_MAX: Duration = Duration::from_secs(5);

    /// Random delays seeded from the OS.
    #[instrument]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self::seeded(min, max, rand::random())
    }

    /// Reproducible random delays.
    ///
    /// Bounds given in the wrong order are swapped.
    #[instrument]
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            min_ms: min.as_millis() as u64,
            max_ms: max.as_millis() as u64,
        }
    }
}

impl Default for RandomDuration {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

impl RoundDuration for RandomDuration {
    fn round_duration(&mut self, round: u32) -> Duration {
        let ms = self.rng.random_range(self.min_ms..=self.max_ms);
        trace!(round, ms, "Round duration drawn");
        Duration::from_millis(ms)
    }
}

/// How long a player hesitates after the music stops.
pub trait ReactionTime: Send + Sync {
    /// Delay before `player` reaches for a seat in `round`.
    fn reaction_time(&self, player: PlayerId, round: u32) -> Duration;
}

impl<F> ReactionTime for F
where
    F: Fn(PlayerId, u32) -> Duration + Send + Sync,
{
    fn reaction_time(&self, player: PlayerId, round: u32) -> Duration {
        self(player, round)
    }
}

/// Every player reacts at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl ReactionTime for Immediate {
    fn reaction_time(&self, _player: PlayerId, _round: u32) -> Duration {
        Duration::ZERO
    }
}
