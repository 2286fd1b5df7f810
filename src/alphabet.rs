// src/alphabet.rs
use crate::error::{GeneratorError, GeneratorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ALPHANUMERIC: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const HEX_UPPER: &str = "0123456789ABCDEF";
pub const HEX_LOWER: &str = "0123456789abcdef";
pub const HEX: &str = "0123456789abcdefABCDEF";
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
/// Every printable ASCII character except space.
pub const ASCII: &str = "!\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// An ordered, non-empty sequence of symbols that generated characters are drawn from.
///
/// Duplicates are kept as given; a symbol listed twice is simply twice as likely to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn from_symbols(symbols: Vec<char>) -> GeneratorResult<Self> {
        if symbols.is_empty() {
            log::error!("Alphabet::from_symbols: refusing to build an empty alphabet");
            return Err(GeneratorError::InvalidAlphabet);
        }
        Ok(Alphabet { symbols })
    }

    pub fn from_string(source: &str) -> GeneratorResult<Self> {
        Self::from_symbols(source.chars().collect())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    // Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol at `index`. Panics if `index >= len()`.
    pub fn symbol_at(&self, index: usize) -> char {
        self.symbols[index]
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn entropy_bits_per_char(&self) -> f64 {
        (self.symbols.len() as f64).log2()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        NamedAlphabet::Alphanumeric.alphabet()
    }
}

impl FromStr for Alphabet {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alphabet::from_string(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

/// The built-in character sets, addressable by name from config files.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NamedAlphabet {
    Alphanumeric,
    Digits,
    Letters,
    Lowercase,
    Uppercase,
    HexUpper,
    HexLower,
    Hex,
    Punctuation,
    Ascii,
}

impl NamedAlphabet {
    pub fn as_str(self) -> &'static str {
        match self {
            NamedAlphabet::Alphanumeric => ALPHANUMERIC,
            NamedAlphabet::Digits => DIGITS,
            NamedAlphabet::Letters => LETTERS,
            NamedAlphabet::Lowercase => LOWERCASE,
            NamedAlphabet::Uppercase => UPPERCASE,
            NamedAlphabet::HexUpper => HEX_UPPER,
            NamedAlphabet::HexLower => HEX_LOWER,
            NamedAlphabet::Hex => HEX,
            NamedAlphabet::Punctuation => PUNCTUATION,
            NamedAlphabet::Ascii => ASCII,
        }
    }

    pub fn alphabet(self) -> Alphabet {
        // Named sets are non-empty constants, so this cannot hit InvalidAlphabet.
        Alphabet {
            symbols: self.as_str().chars().collect(),
        }
    }
}
