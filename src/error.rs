// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Alphabet must contain at least one symbol")]
    InvalidAlphabet,
    #[error("Insufficient entropy: {0}")]
    InsufficientEntropy(String),
    #[error("Requirement bounds are inconsistent (minimum {minimum} > maximum {maximum})")]
    InvalidRequirementBounds { minimum: usize, maximum: usize },
    #[error("Invalid random range [{low}, {high}]")]
    InvalidRange { low: usize, high: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(String), // from toml::de::Error
    #[error("Config serialization error: {0}")]
    Serialization(String),
    #[error("Invalid composition policy: {0}")]
    Generator(#[from] GeneratorError),
}

// Result type aliases for convenience
pub type GeneratorResult<T> = Result<T, GeneratorError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
