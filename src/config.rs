// src/config.rs
use crate::alphabet::{Alphabet, NamedAlphabet};
use crate::composer::Composer;
use crate::error::{ConfigError, ConfigResult, GeneratorResult};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where an alphabet comes from. Written in TOML as `{ named = "digits" }` for a
/// built-in set or `{ custom = "abc" }` for literal symbols.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AlphabetSource {
    Named(NamedAlphabet),
    Custom(String),
}

impl AlphabetSource {
    pub fn resolve(&self) -> GeneratorResult<Alphabet> {
        match self {
            AlphabetSource::Named(named) => Ok(named.alphabet()),
            AlphabetSource::Custom(symbols) => Alphabet::from_string(symbols),
        }
    }
}

fn default_maximum() -> usize {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequirementConfig {
    pub alphabet: AlphabetSource,
    #[serde(default = "default_maximum")]
    pub maximum: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<usize>,
}

/// A composition policy: target length, default alphabet and per-alphabet requirements.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ComposerConfig {
    pub length: usize,
    pub default_alphabet: AlphabetSource,
    pub requirements: Vec<RequirementConfig>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            length: 16,
            default_alphabet: AlphabetSource::Named(NamedAlphabet::Letters),
            requirements: Vec::new(),
        }
    }
}

impl ComposerConfig {
    pub fn build(&self) -> GeneratorResult<Composer> {
        let mut composer = Composer::new(self.default_alphabet.resolve()?);
        for requirement in &self.requirements {
            composer.add_requirement(requirement.maximum, requirement.alphabet.resolve()?, requirement.minimum);
        }
        Ok(composer)
    }

    /// Composes one string at the configured length.
    pub fn create_string(&self) -> GeneratorResult<String> {
        self.build()?.create_string(self.length)
    }
}

pub fn load_config(config_path: &Path) -> ConfigResult<ComposerConfig> {
    info!("Loading composition policy from {:?}", config_path);
    let content = fs::read_to_string(config_path)?;
    let config: ComposerConfig = toml::from_str(&content).map_err(|e| {
        let msg = format!("Failed to parse {:?}: {}", config_path, e);
        warn!("load_config: {}", msg);
        ConfigError::Parse(msg)
    })?;
    // Surface bad custom alphabets at load time rather than on first use.
    config.build()?;
    Ok(config)
}

/// Like [`load_config`], but falls back to the default policy when the file is missing or invalid.
pub fn load_config_or_default(config_path: &Path) -> ComposerConfig {
    if !config_path.exists() {
        info!("Policy file not found at {:?}. Using default policy.", config_path);
        return ComposerConfig::default();
    }
    match load_config(config_path) {
        Ok(config) => {
            info!("Composition policy loaded successfully.");
            config
        }
        Err(e) => {
            warn!("Failed to load policy at {:?}: {}. Using default policy.", config_path, e);
            ComposerConfig::default()
        }
    }
}

pub fn save_config(config_path: &Path, config: &ComposerConfig) -> ConfigResult<()> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
            info!("Created config directory: {:?}", parent_dir);
        }
    }

    let toml_string = toml::to_string_pretty(config).map_err(|e| {
        let msg = format!("Failed to serialize policy to TOML: {}", e);
        warn!("save_config: {}", msg);
        ConfigError::Serialization(msg)
    })?;
    fs::write(config_path, toml_string)?;

    info!("Saved composition policy to {:?}", config_path);
    Ok(())
}
