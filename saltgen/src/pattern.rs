//! Character pattern rules applied to every salt candidate.
//! A candidate is rejected when any window of three neighbouring characters is
//! either a repeated run (`AAA`) or an ascending run by character code (`ABC`).

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PatternViolation {
    #[error("salt contains 3 consecutively repeated characters: {0}")]
    RepeatedCharacter(char),
    #[error("salt contains 3 consecutive characters: {0}, {1}, {2}")]
    ConsecutiveCharacters(char, char, char),
}

/// Whether `next` directly follows `current` in Unicode scalar order.
/// `'Z'` is followed by `'['`, not `'a'`.
fn is_successor(current: char, next: char) -> bool {
    u32::from(current).checked_add(1) == Some(u32::from(next))
}

/// Scans windows left to right and reports the first violation.
/// Within a window the repeated-run rule is checked first.
pub fn check_patterns(candidate: &[char]) -> Result<(), PatternViolation> {
    for window in candidate.windows(3) {
        let (a, b, c) = (window[0], window[1], window[2]);
        if a == b && b == c {
            return Err(PatternViolation::RepeatedCharacter(a));
        }
        if is_successor(a, b) && is_successor(b, c) {
            return Err(PatternViolation::ConsecutiveCharacters(a, b, c));
        }
    }
    Ok(())
}

/// Applies [`check_patterns`] to a string, e.g. a salt supplied from outside.
pub fn validate_candidate(candidate: &str) -> Result<(), PatternViolation> {
    let chars: Vec<char> = candidate.chars().collect();
    check_patterns(&chars)
}
