//! Alphanumeric salt generation. Candidates are drawn from a fixed 62-character
//! alphabet, rejected when they contain a repeated or ascending run of three,
//! and rejected when they repeat a salt the same generator already issued.

pub mod batch;
pub mod config;
pub mod generator;
pub mod logging;
pub mod pattern;
pub mod random;

pub use generator::{Salt, SaltError, SaltGenerator, ALPHABET};
pub use random::{RandomError, RandomSource, RngSource, SequenceSource};
