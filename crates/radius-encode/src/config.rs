use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Deepest attribute stack the encoder will build (the depth field is one octet)
pub const MAX_NESTING_DEPTH_LIMIT: usize = 255;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What to do when a fragmented attribute does not fit the buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentOverflow {
    /// Emit the fragments that fit; the value is cut short
    #[default]
    Truncate,
    /// Encode nothing and leave the pair for the next packet
    Reject,
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Maximum attribute nesting depth (default: 32)
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Behaviour of long-extended and WiMAX fragmentation when space runs out
    #[serde(default)]
    pub fragment_overflow: FragmentOverflow,

    /// Hex dump every encoded header at trace level
    #[serde(default)]
    pub hex_trace: bool,
}

fn default_max_nesting_depth() -> usize {
    32
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            max_nesting_depth: default_max_nesting_depth(),
            fragment_overflow: FragmentOverflow::default(),
            hex_trace: false,
        }
    }
}

impl EncoderConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: EncoderConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_nesting_depth cannot be 0".to_string(),
            ));
        }
        if self.max_nesting_depth > MAX_NESTING_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_nesting_depth {} exceeds {}",
                self.max_nesting_depth, MAX_NESTING_DEPTH_LIMIT
            )));
        }
        Ok(())
    }
}
