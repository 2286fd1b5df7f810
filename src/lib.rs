// src/lib.rs
//! Cryptographically secure random strings, optionally composed from
//! per-alphabet character requirements ("at least 2 digits, at most 3
//! punctuation marks, letters for the rest") and shuffled into an
//! unpredictable order.

pub mod alphabet;
pub mod composer;
pub mod config;
pub mod entropy;
pub mod error;
pub mod generator;
pub mod requirement;

pub use alphabet::{Alphabet, NamedAlphabet};
pub use composer::Composer;
pub use config::{load_config, load_config_or_default, save_config, ComposerConfig};
pub use entropy::{OsEntropy, SecureByteSource, SeededEntropy};
pub use error::{ConfigError, ConfigResult, GeneratorError, GeneratorResult};
pub use generator::StringGenerator;
pub use requirement::Requirement;

/// Generates a random string of `length` characters drawn from `alphabet`.
pub fn generate_random_string(length: usize, alphabet: &str) -> GeneratorResult<String> {
    generator::generate(length, Alphabet::from_string(alphabet)?)
}

/// Composes a string of letters containing exactly `digits` digits and
/// `punctuation` punctuation marks. A zero count drops that requirement.
pub fn compose_random_string(length: usize, digits: usize, punctuation: usize) -> GeneratorResult<String> {
    let mut composer = Composer::default();
    composer.require_digits(digits, None).require_punctuation(punctuation, None);
    composer.create_string(length)
}
