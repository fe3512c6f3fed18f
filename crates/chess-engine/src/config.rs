//! Rule configuration.
//!
//! A board plays standard chess by default. The few knobs that hosts have
//! asked for live in [`RulesConfig`], which can be built in code or loaded
//! from a TOML file:
//!
//! ```toml
//! strict_castling = true
//! fifty_move_plies = 100
//! repetition_threshold = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a rules configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Tunable rules for a [`Board`](crate::Board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Reject castling when the square the king crosses is attacked.
    ///
    /// When false, castling is only vetoed if the king starts in check or
    /// lands in check.
    pub strict_castling: bool,
    /// Half-move clock value at which the fifty-move draw applies.
    pub fifty_move_plies: u32,
    /// Number of occurrences that makes a repetition draw.
    pub repetition_threshold: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            strict_castling: true,
            fifty_move_plies: 100,
            repetition_threshold: 3,
        }
    }
}

impl RulesConfig {
    /// Parses a configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the text is not valid TOML
    /// or a value has the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded rules config from {:?}: {:?}", path, config);
        Ok(config)
    }
}
