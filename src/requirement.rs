// src/requirement.rs
use crate::alphabet::Alphabet;
use crate::entropy::{OsEntropy, SecureByteSource};
use crate::error::{GeneratorError, GeneratorResult};
use crate::generator::StringGenerator;
use std::sync::Arc;

/// Binds an alphabet to the number of characters it contributes to a composed string.
///
/// Without an explicit minimum the requirement is exact (`minimum == maximum`).
/// The maximum is raised to at least 1 and the minimum is clamped into `0..=maximum`.
#[derive(Debug)]
pub struct Requirement {
    minimum: usize,
    maximum: usize,
    generator: StringGenerator,
}

impl Requirement {
    pub fn new(maximum: usize, alphabet: Alphabet, minimum: Option<usize>) -> Self {
        Self::with_source(maximum, alphabet, minimum, Arc::new(OsEntropy))
    }

    pub fn with_source(
        maximum: usize,
        alphabet: Alphabet,
        minimum: Option<usize>,
        source: Arc<dyn SecureByteSource>,
    ) -> Self {
        let maximum = maximum.max(1);
        let minimum = minimum.unwrap_or(maximum).min(maximum);
        Requirement {
            minimum,
            maximum,
            generator: StringGenerator::with_source(alphabet, source),
        }
    }

    /// The catch-all requirement a composer fills leftover length from.
    /// Carries no lower bound and no practical upper bound.
    pub(crate) fn unbounded(alphabet: Alphabet, source: Arc<dyn SecureByteSource>) -> Self {
        Requirement {
            minimum: 0,
            maximum: usize::MAX,
            generator: StringGenerator::with_source(alphabet, source),
        }
    }

    pub fn minimum_count(&self) -> usize {
        self.minimum
    }

    pub fn maximum_count(&self) -> usize {
        self.maximum
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.generator.alphabet()
    }

    pub fn generator(&self) -> &StringGenerator {
        &self.generator
    }

    /// Draws a length uniformly from `[minimum, maximum]` and generates that many characters.
    pub fn generate(&self) -> GeneratorResult<String> {
        if self.minimum > self.maximum {
            log::error!(
                "Requirement::generate: bounds invariant broken (minimum {} > maximum {})",
                self.minimum,
                self.maximum
            );
            return Err(GeneratorError::InvalidRequirementBounds {
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }

        let count = self.generator.source().random_int(self.minimum, self.maximum)?;
        log::trace!(
            "Requirement::generate: drawing {} of [{}, {}] characters",
            count,
            self.minimum,
            self.maximum
        );
        self.generator.create_string(count)
    }

    /// Counts the characters of `value` that belong to this requirement's alphabet.
    ///
    /// Requirements classify independently: a character in several alphabets is
    /// counted by each of them.
    pub fn matched_count(&self, value: &str) -> usize {
        let alphabet = self.generator.alphabet();
        value.chars().filter(|&c| alphabet.contains(c)).count()
    }
}
