//! Caller-side retry loop for issuing several salts at once.
//! The generator itself never retries; this helper re-asks it when a
//! candidate was rejected for a reason another draw could fix.

use thiserror::Error;

use crate::generator::{Salt, SaltError, SaltGenerator};
use crate::random::RandomSource;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("gave up after {attempts} attempts: {last}")]
    AttemptsExhausted { attempts: usize, last: SaltError },
    #[error(transparent)]
    Salt(#[from] SaltError),
}

/// Issues `count` salts of `length` characters, retrying each one at most
/// `max_attempts` times in total. Non-retryable errors abort immediately.
pub fn issue_batch<R: RandomSource>(
    generator: &mut SaltGenerator<R>,
    length: i64,
    count: usize,
    max_attempts: usize,
) -> Result<Vec<Salt>, BatchError> {
    (0..count)
        .map(|index| issue_one(generator, length, index, max_attempts))
        .collect()
}

fn issue_one<R: RandomSource>(
    generator: &mut SaltGenerator<R>,
    length: i64,
    index: usize,
    max_attempts: usize,
) -> Result<Salt, BatchError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match generator.generate_salt(length) {
            Ok(salt) => return Ok(salt),
            Err(err) if !err.is_retryable() => return Err(err.into()),
            Err(err) if attempt >= max_attempts => {
                return Err(BatchError::AttemptsExhausted {
                    attempts: attempt,
                    last: err,
                })
            }
            Err(err) => {
                tracing::debug!(index, attempt, reason = %err, "salt rejected, retrying");
            }
        }
    }
}
