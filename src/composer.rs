// src/composer.rs
use crate::alphabet::{Alphabet, NamedAlphabet};
use crate::entropy::{OsEntropy, SecureByteSource};
use crate::error::GeneratorResult;
use crate::requirement::Requirement;
use std::sync::Arc;

/// Builds random strings that meet several per-alphabet character counts at once.
///
/// Each registered requirement contributes its characters to a pool, the rest of
/// the requested length is filled from the default alphabet, and the pool is then
/// shuffled so the position of each class is unpredictable.
#[derive(Debug)]
pub struct Composer {
    requirements: Vec<Requirement>,
    default: Requirement,
    source: Arc<dyn SecureByteSource>,
}

impl Composer {
    pub fn new(default_alphabet: Alphabet) -> Self {
        Self::with_source(default_alphabet, Arc::new(OsEntropy))
    }

    pub fn with_source(default_alphabet: Alphabet, source: Arc<dyn SecureByteSource>) -> Self {
        Composer {
            requirements: Vec::new(),
            default: Requirement::unbounded(default_alphabet, Arc::clone(&source)),
            source,
        }
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn default_alphabet(&self) -> &Alphabet {
        self.default.alphabet()
    }

    /// Requires between `minimum` and `maximum` characters from `alphabet`.
    /// Without `minimum` the count is exactly `maximum`. A zero `maximum` adds nothing.
    pub fn add_requirement(&mut self, maximum: usize, alphabet: Alphabet, minimum: Option<usize>) -> &mut Self {
        if maximum == 0 {
            log::debug!("add_requirement: skipping requirement with zero maximum");
            return self;
        }
        let requirement = Requirement::with_source(maximum, alphabet, minimum, Arc::clone(&self.source));
        self.register_requirement(requirement)
    }

    /// Registers a requirement built elsewhere; it keeps its own entropy source.
    pub fn register_requirement(&mut self, requirement: Requirement) -> &mut Self {
        self.requirements.push(requirement);
        self
    }

    pub fn require_digits(&mut self, maximum: usize, minimum: Option<usize>) -> &mut Self {
        self.add_requirement(maximum, NamedAlphabet::Digits.alphabet(), minimum)
    }

    pub fn require_punctuation(&mut self, maximum: usize, minimum: Option<usize>) -> &mut Self {
        self.add_requirement(maximum, NamedAlphabet::Punctuation.alphabet(), minimum)
    }

    pub fn require_letters(&mut self, maximum: usize, minimum: Option<usize>) -> &mut Self {
        self.add_requirement(maximum, NamedAlphabet::Letters.alphabet(), minimum)
    }

    pub fn require_lowercase_letters(&mut self, maximum: usize, minimum: Option<usize>) -> &mut Self {
        self.add_requirement(maximum, NamedAlphabet::Lowercase.alphabet(), minimum)
    }

    pub fn require_uppercase_letters(&mut self, maximum: usize, minimum: Option<usize>) -> &mut Self {
        self.add_requirement(maximum, NamedAlphabet::Uppercase.alphabet(), minimum)
    }

    /// Composes a new string of at least `length` characters.
    ///
    /// When the requirement minimums add up to more than `length`, the result is
    /// as long as the requirements demand rather than truncated.
    pub fn create_string(&self, length: usize) -> GeneratorResult<String> {
        let mut pool = self.generate_pool(length)?;
        self.shuffle(&mut pool)?;
        Ok(pool.into_iter().collect())
    }

    fn generate_pool(&self, length: usize) -> GeneratorResult<Vec<char>> {
        let mut pool: Vec<char> = Vec::new();
        for requirement in &self.requirements {
            pool.extend(requirement.generate()?.chars());
        }

        let remaining = length.saturating_sub(pool.len());
        if remaining > 0 {
            pool.extend(self.default.generator().create_string(remaining)?.chars());
        } else if pool.len() > length {
            log::warn!(
                "create_string: requirements produced {} characters, more than the {} requested",
                pool.len(),
                length
            );
        }

        log::debug!(
            "create_string: pooled {} characters from {} requirements",
            pool.len(),
            self.requirements.len()
        );
        Ok(pool)
    }

    // Fisher-Yates: move a uniformly chosen element of the unshuffled prefix to its end.
    fn shuffle(&self, pool: &mut [char]) -> GeneratorResult<()> {
        for end in (1..pool.len()).rev() {
            let pick = self.source.random_int(0, end)?;
            pool.swap(pick, end);
        }
        Ok(())
    }

    /// Checks whether `value` could have been produced under this composer's requirements.
    ///
    /// Every requirement must see at least its minimum count; with `strict_counting`
    /// it must also see no more than its maximum. Characters not accounted for by
    /// the requirements must all come from the default alphabet, which may overlap
    /// the requirement alphabets. Because requirements count independently, a
    /// character shared by two alphabets is attributed to both.
    pub fn satisfies_requirements(&self, value: &str, minimum_length: usize, strict_counting: bool) -> bool {
        let length = value.chars().count();
        if length < minimum_length {
            log::debug!("satisfies_requirements: length {} below minimum {}", length, minimum_length);
            return false;
        }

        let mut remaining = length;
        for requirement in &self.requirements {
            let count = requirement.matched_count(value);
            if count < requirement.minimum_count() {
                return false;
            }
            if strict_counting && count > requirement.maximum_count() {
                return false;
            }
            remaining = remaining.saturating_sub(count);
        }

        if remaining == 0 {
            return true;
        }
        // Characters no requirement claims must come from the default alphabet.
        let default = self.default.alphabet();
        value
            .chars()
            .filter(|&c| !self.requirements.iter().any(|r| r.alphabet().contains(c)))
            .all(|c| default.contains(c))
    }
}

impl Default for Composer {
    fn default() -> Self {
        Composer::new(NamedAlphabet::Letters.alphabet())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{DIGITS, LETTERS, PUNCTUATION};
    use crate::entropy::tests::ExhaustibleEntropy;
    use crate::entropy::SeededEntropy;
    use crate::error::GeneratorError;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn count_in(value: &str, alphabet: &str) -> usize {
        value.chars().filter(|c| alphabet.contains(*c)).count()
    }

    fn policy_composer() -> Composer {
        let mut composer = Composer::default();
        composer.require_digits(2, None).require_punctuation(2, None);
        composer
    }

    #[test]
    fn test_exact_requirements_are_met() {
        init_logger();
        let source = SeededEntropy::new(2024);
        let source: Arc<dyn SecureByteSource> = Arc::new(source);
        for round in 0..200 {
            let length = 20 + round % 11;
            let digits = 1 + round % 5;
            let punctuation = 1 + (round / 5) % 5;

            let mut composer = Composer::with_source(NamedAlphabet::Letters.alphabet(), Arc::clone(&source));
            composer.require_digits(digits, None).require_punctuation(punctuation, None);
            let value = composer.create_string(length).unwrap();

            assert_eq!(value.chars().count(), length);
            assert_eq!(count_in(&value, DIGITS), digits);
            assert_eq!(count_in(&value, PUNCTUATION), punctuation);
            assert_eq!(count_in(&value, LETTERS), length - digits - punctuation);
            assert!(composer.satisfies_requirements(&value, length, true));
        }
    }

    #[test]
    fn test_generated_strings_round_trip_leniently() {
        // Alphabets are disjoint, so leftover characters are attributed to the default alphabet only.
        let mut composer = Composer::new(NamedAlphabet::Lowercase.alphabet());
        composer
            .require_uppercase_letters(3, Some(1))
            .require_punctuation(2, Some(0))
            .require_digits(1, None);
        for _ in 0..200 {
            let value = composer.create_string(16).unwrap();
            assert!(composer.satisfies_requirements(&value, 16, false), "rejected {}", value);
        }
    }

    #[test]
    fn test_optional_requirements_do_not_always_hit_maximum() {
        let mut actual_digits = 0;
        let mut actual_punctuation = 0;
        let mut max_digits = 0;
        let mut max_punctuation = 0;
        let source = OsEntropy;

        for _ in 0..1000 {
            let mut composer = Composer::default();
            composer.register_requirement(Requirement::new(
                source.random_int(1, 5).unwrap(),
                NamedAlphabet::Digits.alphabet(),
                Some(0),
            ));
            composer.register_requirement(Requirement::new(
                source.random_int(1, 5).unwrap(),
                NamedAlphabet::Punctuation.alphabet(),
                Some(0),
            ));
            let (digits, punctuation) = (&composer.requirements()[0], &composer.requirements()[1]);
            max_digits += digits.maximum_count();
            max_punctuation += punctuation.maximum_count();

            let value = composer.create_string(source.random_int(20, 30).unwrap()).unwrap();
            actual_digits += digits.matched_count(&value);
            actual_punctuation += punctuation.matched_count(&value);

            assert!(composer.satisfies_requirements(&value, value.chars().count(), true));
        }

        assert!(actual_digits < max_digits);
        assert!(actual_punctuation < max_punctuation);
    }

    #[test]
    fn test_known_strings_against_policy() {
        let valid = [
            "o-?^N_Yr4x*tdT3nkgvU",
            "2U_9w7%3NvM.?_%-n1ar",
            "C_@rU8>E#Q~2Hc8i]y4g",
            "rXQtMNA1C*~.t3cb",
        ];
        let invalid = [
            "12!@aC",
            "     ",
            "monkey123",
            "password",
            "Abc123",
            "Some Password That iS! Bad",
        ];
        let composer = policy_composer();

        for item in valid {
            assert!(composer.satisfies_requirements(item, 10, false), "{} should pass lenient counting", item);
            assert!(!composer.satisfies_requirements(item, 10, true), "{} has too much punctuation", item);
        }
        for item in invalid {
            assert!(!composer.satisfies_requirements(item, 10, true), "{} should fail", item);
        }
    }

    #[test]
    fn test_password_fails_in_every_mode() {
        let composer = policy_composer();
        assert!(!composer.satisfies_requirements("password", 0, true));
        assert!(!composer.satisfies_requirements("password", 0, false));
    }

    #[test]
    fn test_under_length_is_rejected() {
        let composer = Composer::default();
        assert!(!composer.satisfies_requirements("abc", 4, false));
        assert!(!composer.satisfies_requirements("", 1, false));
        assert!(composer.satisfies_requirements("abcd", 4, false));
        assert!(composer.satisfies_requirements("", 0, true));
    }

    #[test]
    fn test_foreign_characters_are_rejected() {
        let composer = policy_composer();
        // Meets digit and punctuation counts, but a space is in no alphabet.
        assert!(!composer.satisfies_requirements("ab 12!?cd", 0, true));
        assert!(composer.satisfies_requirements("abx12!?cd", 0, true));
    }

    #[test]
    fn test_overlapping_alphabets_count_for_both() {
        let mut composer = Composer::new(NamedAlphabet::Lowercase.alphabet());
        composer
            .add_requirement(2, NamedAlphabet::HexLower.alphabet(), Some(2))
            .require_lowercase_letters(2, Some(2));
        // 'a' and 'b' satisfy both requirements, leaving nothing for the default alphabet.
        assert!(composer.satisfies_requirements("ab", 0, true));
    }

    #[test]
    fn test_default_alphabet_overlapping_requirement_round_trips() {
        let mut composer = Composer::default();
        composer.require_uppercase_letters(2, None);
        for _ in 0..200 {
            let value = composer.create_string(16).unwrap();
            assert!(composer.satisfies_requirements(&value, 16, false), "rejected {}", value);
        }
        // Still rejects leftovers outside the default alphabet.
        assert!(!composer.satisfies_requirements("ABcdef12", 0, false));
        assert!(composer.satisfies_requirements("ABcdefgh", 0, false));
    }

    #[test]
    fn test_zero_maximum_adds_nothing() {
        let mut composer = Composer::default();
        composer.add_requirement(0, NamedAlphabet::Digits.alphabet(), None).require_digits(0, Some(0));
        assert!(composer.requirements().is_empty());
    }

    #[test]
    fn test_overlong_composition_exceeds_requested_length() {
        let mut composer = Composer::default();
        composer.require_digits(4, None).require_punctuation(4, None);
        let value = composer.create_string(5).unwrap();
        assert_eq!(value.chars().count(), 8);
        assert_eq!(count_in(&value, LETTERS), 0);
    }

    #[test]
    fn test_zero_length_without_requirements() {
        assert_eq!(Composer::default().create_string(0).unwrap(), "");
    }

    #[test]
    fn test_shuffle_moves_requirement_characters() {
        let mut composer = Composer::default();
        composer.require_digits(1, None);
        let mut first_positions = std::collections::HashSet::new();
        for _ in 0..200 {
            let value = composer.create_string(8).unwrap();
            let position = value.chars().position(|c| c.is_ascii_digit()).unwrap();
            first_positions.insert(position);
        }
        assert!(first_positions.len() > 1, "the digit should not always land in the same slot");
    }

    #[test]
    fn test_huge_length_fails_on_entropy_not_allocation() {
        let composer = Composer::with_source(NamedAlphabet::Letters.alphabet(), Arc::new(ExhaustibleEntropy::new(0)));
        assert!(matches!(composer.create_string(usize::MAX), Err(GeneratorError::InsufficientEntropy(_))));
    }

    #[test]
    fn test_entropy_failure_aborts_composition() {
        // Enough for the digit draw but not the default fill.
        let mut composer = Composer::with_source(NamedAlphabet::Letters.alphabet(), Arc::new(ExhaustibleEntropy::new(2)));
        composer.require_digits(2, None);
        assert!(matches!(composer.create_string(16), Err(GeneratorError::InsufficientEntropy(_))));
    }
}
