//! Salt generation with pattern validation and per-instance uniqueness.
//!
//! Each call to [`SaltGenerator::generate_salt`] draws exactly one candidate.
//! A candidate that breaks a pattern rule or repeats an earlier salt is
//! reported as an error; retrying is left to the caller.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use zeroize::Zeroize;

use crate::pattern::{check_patterns, PatternViolation};
use crate::random::{RandomError, RandomSource};

/// The 62 characters a salt is drawn from, in draw-index order.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Shortest length accepted by [`SaltGenerator::generate_salt`].
pub const MIN_LENGTH: i64 = 3;

const ALPHABET_BYTES: &[u8] = ALPHABET.as_bytes();

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaltError {
    #[error("invalid salt length {0}; the length must be greater than 2")]
    InvalidLength(i64),
    #[error("salt contains 3 consecutively repeated characters: {0}")]
    RepeatedCharacter(char),
    #[error("salt contains 3 consecutive characters: {0}, {1}, {2}")]
    ConsecutiveCharacters(char, char, char),
    #[error("salt has already been generated previously: {0}")]
    DuplicateSalt(Salt),
    #[error("random source failed: {0}")]
    Random(#[from] RandomError),
}

impl SaltError {
    /// Whether another call with the same length could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SaltError::RepeatedCharacter(_)
                | SaltError::ConsecutiveCharacters(..)
                | SaltError::DuplicateSalt(_)
        )
    }
}

impl From<PatternViolation> for SaltError {
    fn from(violation: PatternViolation) -> Self {
        match violation {
            PatternViolation::RepeatedCharacter(c) => SaltError::RepeatedCharacter(c),
            PatternViolation::ConsecutiveCharacters(a, b, c) => {
                SaltError::ConsecutiveCharacters(a, b, c)
            }
        }
    }
}

/// A generated salt. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Salt(String);

impl Salt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Salt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Salt {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Salt {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// Hashing and equality match `str`, so the history can be probed by `&str`.
impl Borrow<str> for Salt {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Zeroize for Salt {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Issues salts and remembers every salt it has returned.
pub struct SaltGenerator<R> {
    random: R,
    issued: HashSet<Salt>,
}

impl<R: RandomSource> SaltGenerator<R> {
    pub fn new(random: R) -> Self {
        Self {
            random,
            issued: HashSet::new(),
        }
    }

    /// Generates one salt of `length` characters.
    ///
    /// Fails without touching the history when the length is 2 or less, when
    /// the candidate contains a repeated or ascending run of three, or when the
    /// candidate equals a salt this generator already returned.
    pub fn generate_salt(&mut self, length: i64) -> Result<Salt, SaltError> {
        if length < MIN_LENGTH {
            return Err(SaltError::InvalidLength(length));
        }
        let length = usize::try_from(length).map_err(|_| SaltError::InvalidLength(length))?;

        let candidate = self.draw_candidate(length)?;
        check_patterns(&candidate)?;

        let salt = Salt(candidate.into_iter().collect());
        if self.issued.contains(&salt) {
            return Err(SaltError::DuplicateSalt(salt));
        }
        self.issued.insert(salt.clone());

        tracing::debug!(length, issued = self.issued.len(), "salt issued");
        Ok(salt)
    }

    // Grows with the draws instead of reserving `length` up front, so an
    // oversized length fails on the source rather than on allocation.
    fn draw_candidate(&mut self, length: usize) -> Result<Vec<char>, RandomError> {
        (0..length).map(|_| self.draw_char()).collect()
    }

    fn draw_char(&mut self) -> Result<char, RandomError> {
        let bound = ALPHABET_BYTES.len() as i64;
        let value = self.random.next_in_range(bound)?;
        usize::try_from(value)
            .ok()
            .and_then(|index| ALPHABET_BYTES.get(index))
            .map(|byte| char::from(*byte))
            .ok_or(RandomError::OutOfRange { value, bound })
    }
}

impl<R> SaltGenerator<R> {
    /// Number of salts returned so far.
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    pub fn has_issued(&self, salt: &str) -> bool {
        self.issued.contains(salt)
    }

    pub fn random_source(&self) -> &R {
        &self.random
    }

    pub fn random_source_mut(&mut self) -> &mut R {
        &mut self.random
    }
}

impl<R> Drop for SaltGenerator<R> {
    fn drop(&mut self) {
        // Scrub issued salts before the history's memory is released.
        for mut salt in self.issued.drain() {
            salt.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Salt, SaltError, SaltGenerator, ALPHABET};
    use crate::random::{RandomError, RngSource, SequenceSource};

    fn scripted(draws: &[i64]) -> SaltGenerator<SequenceSource> {
        SaltGenerator::new(SequenceSource::new(draws.iter().copied()))
    }

    #[test]
    fn maps_draws_through_alphabet() {
        let mut generator = scripted(&[0, 3, 5, 22, 18, 10, 25, 9]);
        let salt = generator.generate_salt(8).expect("salt should be valid");
        assert_eq!(salt, "ADFWSKZJ");
        assert_eq!(salt.len(), 8);
    }

    #[test]
    fn rejects_short_lengths_without_drawing() {
        let mut generator = scripted(&[0, 1, 3]);
        for length in [2, 1, 0, -5] {
            let err = generator.generate_salt(length).unwrap_err();
            assert_eq!(err, SaltError::InvalidLength(length));
        }
        assert_eq!(generator.random_source().taken(), 0);
        assert_eq!(generator.issued_count(), 0);
        assert!(format!("{}", SaltError::InvalidLength(2)).contains("greater than 2"));
    }

    #[test]
    fn rejects_repeated_characters() {
        let mut generator = scripted(&[0, 0, 0]);
        let err = generator.generate_salt(3).unwrap_err();
        assert_eq!(err, SaltError::RepeatedCharacter('A'));
        assert_eq!(
            format!("{err}"),
            "salt contains 3 consecutively repeated characters: A"
        );
        assert_eq!(generator.issued_count(), 0);
    }

    #[test]
    fn accepts_exactly_two_repeats() {
        let mut generator = scripted(&[0, 0, 1]);
        assert_eq!(generator.generate_salt(3).expect("AAB is valid"), "AAB");
    }

    #[test]
    fn rejects_consecutive_characters() {
        let mut generator = scripted(&[0, 1, 2]);
        let err = generator.generate_salt(3).unwrap_err();
        assert_eq!(err, SaltError::ConsecutiveCharacters('A', 'B', 'C'));
        assert_eq!(
            format!("{err}"),
            "salt contains 3 consecutive characters: A, B, C"
        );
    }

    #[test]
    fn accepts_two_step_ascent() {
        let mut generator = scripted(&[0, 1, 3]);
        assert_eq!(generator.generate_salt(3).expect("ABD is valid"), "ABD");
    }

    #[test]
    fn draws_every_position_even_when_rejected() {
        // "AAA" is already broken after three draws, the rest are still taken.
        let mut generator = scripted(&[0, 0, 0, 7, 9]);
        assert!(generator.generate_salt(5).is_err());
        assert_eq!(generator.random_source().taken(), 5);
    }

    #[test]
    fn rejects_duplicate_salt() {
        let mut generator = scripted(&[0, 3, 5, 22, 18, 10, 25, 9]);
        let first = generator.generate_salt(8).expect("first salt is valid");
        assert_eq!(first, "ADFWSKZJ");

        generator
            .random_source_mut()
            .extend([0, 3, 5, 22, 18, 10, 25, 9]);
        let err = generator.generate_salt(8).unwrap_err();
        assert_eq!(err, SaltError::DuplicateSalt(first.clone()));
        assert_eq!(
            format!("{err}"),
            "salt has already been generated previously: ADFWSKZJ"
        );
        assert_eq!(generator.issued_count(), 1);
        assert!(generator.has_issued("ADFWSKZJ"));
    }

    #[test]
    fn issues_distinct_salts() {
        let mut generator = scripted(&[0, 3, 5, 22, 18, 10, 25, 9, 1, 4, 6, 23, 19, 11, 26, 8]);
        let first = generator.generate_salt(8).expect("first salt is valid");
        let second = generator.generate_salt(8).expect("second salt is valid");
        assert_ne!(first, second);
        assert_eq!(first, "ADFWSKZJ");
        assert_eq!(second, "BEGXTLaI");
        assert_eq!(generator.issued_count(), 2);
    }

    #[test]
    fn oversized_length_fails_on_the_source() {
        let mut generator = scripted(&[0, 3, 5]);
        assert_eq!(
            generator.generate_salt(i64::MAX),
            Err(SaltError::Random(RandomError::Exhausted))
        );
        assert_eq!(generator.random_source().taken(), 3);
        assert_eq!(generator.issued_count(), 0);
    }

    #[test]
    fn looks_up_history_by_str() {
        let mut generator = scripted(&[0, 1, 3, 1, 0, 3]);
        generator.generate_salt(3).expect("ABD is valid");
        generator.generate_salt(3).expect("BAD is valid");
        assert!(generator.has_issued("ABD"));
        assert!(generator.has_issued("BAD"));
        assert!(!generator.has_issued("ABE"));
        assert!(!generator.has_issued("AB"));
    }

    #[test]
    fn same_string_at_different_length_is_not_a_duplicate() {
        let mut generator = scripted(&[0, 3, 5, 0, 3, 5, 9]);
        assert_eq!(generator.generate_salt(3).expect("ADF is valid"), "ADF");
        assert_eq!(generator.generate_salt(4).expect("ADFJ is valid"), "ADFJ");
    }

    #[test]
    fn surfaces_random_source_failures() {
        let mut generator = scripted(&[0, 3]);
        assert_eq!(
            generator.generate_salt(3),
            Err(SaltError::Random(RandomError::Exhausted))
        );

        let mut generator = scripted(&[0, 62, 4]);
        assert_eq!(
            generator.generate_salt(3),
            Err(SaltError::Random(RandomError::OutOfRange { value: 62, bound: 62 }))
        );
        assert_eq!(generator.issued_count(), 0);
    }

    #[test]
    fn seeded_salts_use_alphabet_and_pass_rules() {
        let mut generator = SaltGenerator::new(RngSource::seeded(2024));
        let mut issued = 0;
        for _ in 0..500 {
            match generator.generate_salt(12) {
                Ok(salt) => {
                    issued += 1;
                    assert_eq!(salt.len(), 12);
                    assert!(salt.as_str().chars().all(|c| ALPHABET.contains(c)));
                    assert_eq!(crate::pattern::validate_candidate(salt.as_str()), Ok(()));
                }
                Err(err) => assert!(err.is_retryable(), "unexpected error: {err}"),
            }
        }
        assert!(issued > 0);
        assert_eq!(generator.issued_count(), issued);
    }

    #[test]
    fn retryable_kinds() {
        assert!(SaltError::RepeatedCharacter('A').is_retryable());
        assert!(SaltError::ConsecutiveCharacters('A', 'B', 'C').is_retryable());
        assert!(SaltError::DuplicateSalt(Salt("ABD".to_string())).is_retryable());
        assert!(!SaltError::InvalidLength(2).is_retryable());
        assert!(!SaltError::Random(RandomError::Exhausted).is_retryable());
    }

    #[test]
    fn salt_serializes_as_plain_string() {
        let salt = Salt("AAB".to_string());
        assert_eq!(serde_json::to_string(&salt).expect("serialize"), "\"AAB\"");
    }
}
