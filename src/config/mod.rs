//! Configuration module for the voice relay
//!
//! Handles configuration from .env files, YAML files and environment variables.
//! Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use voice_relay::config::RelayConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = RelayConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config = RelayConfig::from_file(&PathBuf::from("config.yaml"))?;
//! println!("Rotating over {} servers", config.servers.len());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use yaml::{SynthesisYaml, YamlConfig};

use crate::core::tts::chunker::DEFAULT_SENTENCE_SPLIT_REGEX;
use crate::core::tts::genie::{
    DEFAULT_REFERENCE_TIMEOUT_SECS, DEFAULT_SYNTHESIS_TIMEOUT_SECS, GenieClientConfig,
};
use crate::core::tts::storage::{AudioStore, DEFAULT_TEMP_DIR};

/// Relay configuration
///
/// Everything the synthesis engine reads: the server rotation, chunking behavior,
/// where audio files are written and the per-request timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Ordered server base URLs, normalized without trailing `/`
    pub servers: Vec<String>,
    pub enable_sentence_splitting: bool,
    /// Non-positive values disable chunking
    pub sentences_per_chunk: i64,
    pub sentence_split_regex: String,
    /// Directory for chunk and merged WAV files
    pub temp_dir: PathBuf,
    pub reference_timeout_seconds: u64,
    pub synthesis_timeout_seconds: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            enable_sentence_splitting: false,
            sentences_per_chunk: 2,
            sentence_split_regex: DEFAULT_SENTENCE_SPLIT_REGEX.to_string(),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            reference_timeout_seconds: DEFAULT_REFERENCE_TIMEOUT_SECS,
            synthesis_timeout_seconds: DEFAULT_SYNTHESIS_TIMEOUT_SECS,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables only
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // .env is loaded in main.rs, so it already shows up as environment variables here
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        validation::validate_servers(&self.servers)?;
        validation::validate_split_regex(&self.sentence_split_regex)?;
        validation::validate_timeouts(
            self.reference_timeout_seconds,
            self.synthesis_timeout_seconds,
        )?;
        Ok(())
    }

    pub fn genie_client_config(&self) -> GenieClientConfig {
        GenieClientConfig {
            reference_timeout_secs: self.reference_timeout_seconds,
            synthesis_timeout_secs: self.synthesis_timeout_seconds,
        }
    }

    pub fn audio_store(&self) -> AudioStore {
        AudioStore::new(&self.temp_dir)
    }
}
