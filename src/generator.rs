// src/generator.rs
use crate::alphabet::Alphabet;
use crate::entropy::{OsEntropy, SecureByteSource};
use crate::error::GeneratorResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Draws strings whose characters are sampled independently from one alphabet.
///
/// Each character is picked as `alphabet[byte % alphabet.len()]`. That is only
/// perfectly uniform when the alphabet size divides 256; other sizes carry a
/// small bias toward the lower indices.
// TODO: rejection sampling would remove the modulo bias, but changes the output distribution.
pub struct StringGenerator {
    alphabet: Alphabet,
    source: Arc<dyn SecureByteSource>,
    crypto_strong: AtomicBool,
}

impl StringGenerator {
    pub fn new(alphabet: Alphabet) -> Self {
        Self::with_source(alphabet, Arc::new(OsEntropy))
    }

    pub fn with_source(alphabet: Alphabet, source: Arc<dyn SecureByteSource>) -> Self {
        StringGenerator {
            alphabet,
            source,
            crypto_strong: AtomicBool::new(false),
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn set_alphabet(&mut self, alphabet: Alphabet) {
        self.alphabet = alphabet;
    }

    pub(crate) fn source(&self) -> &Arc<dyn SecureByteSource> {
        &self.source
    }

    /// Whether the most recent draw came from a crypto-strong source.
    /// False until the first non-empty string has been created.
    pub fn was_crypto_strong(&self) -> bool {
        self.crypto_strong.load(Ordering::Relaxed)
    }

    /// Creates a random string of exactly `length` characters.
    pub fn create_string(&self, length: usize) -> GeneratorResult<String> {
        if length == 0 {
            return Ok(String::new());
        }

        let bytes = self.source.random_bytes(length)?;
        let strong = self.source.is_crypto_strong();
        self.crypto_strong.store(strong, Ordering::Relaxed);
        if !strong {
            log::warn!("create_string: drew {} bytes from a source that is not crypto-strong", length);
        }

        let size = self.alphabet.len();
        Ok(bytes
            .iter()
            .map(|&b| self.alphabet.symbol_at(b as usize % size))
            .collect())
    }

    /// Theoretical entropy, in bits, of a string of `length` characters.
    pub fn calculate_entropy_bits(&self, length: usize) -> f64 {
        self.alphabet.entropy_bits_per_char() * length as f64
    }
}

impl Default for StringGenerator {
    fn default() -> Self {
        StringGenerator::new(Alphabet::default())
    }
}

impl std::fmt::Debug for StringGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringGenerator")
            .field("alphabet", &self.alphabet.to_string())
            .field("crypto_strong", &self.was_crypto_strong())
            .finish()
    }
}

/// Generates a random string from `alphabet` without keeping a generator around.
pub fn generate(length: usize, alphabet: Alphabet) -> GeneratorResult<String> {
    StringGenerator::new(alphabet).create_string(length)
}
