//! Randomness capability consumed by the salt generator.
//! Production code draws from a `rand` RNG; tests substitute a scripted
//! source so every draw is known up front.

use std::collections::VecDeque;

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RandomError {
    #[error("invalid bound {bound}; the bound must be positive")]
    InvalidArgument { bound: i64 },
    #[error("random value {value} is outside [0, {bound})")]
    OutOfRange { value: i64, bound: i64 },
    #[error("random source has no draws left")]
    Exhausted,
}

/// Supplies uniformly distributed integers in `[0, bound)`.
pub trait RandomSource {
    /// Returns the next integer in `[0, bound)`. Fails with
    /// [`RandomError::InvalidArgument`] when `bound <= 0`.
    fn next_in_range(&mut self, bound: i64) -> Result<i64, RandomError>;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_in_range(&mut self, bound: i64) -> Result<i64, RandomError> {
        (**self).next_in_range(bound)
    }
}

fn check_bound(bound: i64) -> Result<(), RandomError> {
    if bound <= 0 {
        return Err(RandomError::InvalidArgument { bound });
    }
    Ok(())
}

/// Adapter that turns any `rand` RNG into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<StdRng> {
    /// Standard RNG seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible source: the same seed yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl RngSource<OsRng> {
    pub fn os() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_in_range(&mut self, bound: i64) -> Result<i64, RandomError> {
        check_bound(bound)?;
        Ok(self.rng.gen_range(0..bound))
    }
}

/// Deterministic source that replays queued draws in order.
///
/// Every queued value must fit the bound it is drawn against, otherwise the
/// draw fails with [`RandomError::OutOfRange`] and the value is consumed.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    pending: VecDeque<i64>,
    taken: usize,
}

impl SequenceSource {
    pub fn new(draws: impl IntoIterator<Item = i64>) -> Self {
        Self {
            pending: draws.into_iter().collect(),
            taken: 0,
        }
    }

    /// Queues more draws behind the ones still pending.
    pub fn extend(&mut self, draws: impl IntoIterator<Item = i64>) {
        self.pending.extend(draws);
    }

    /// Number of draws handed out so far.
    pub fn taken(&self) -> usize {
        self.taken
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl RandomSource for SequenceSource {
    fn next_in_range(&mut self, bound: i64) -> Result<i64, RandomError> {
        check_bound(bound)?;
        let value = self.pending.pop_front().ok_or(RandomError::Exhausted)?;
        self.taken += 1;
        if !(0..bound).contains(&value) {
            return Err(RandomError::OutOfRange { value, bound });
        }
        Ok(value)
    }
}
