use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here override
/// environment variables.
///
/// # Example YAML structure
/// ```yaml
/// synthesis:
///   servers:
///     - "http://tts-a:9880"
///     - "http://tts-b:9880"
///   enable_sentence_splitting: true
///   sentences_per_chunk: 2
///   sentence_split_regex: "([。、，！？,.!?])"
///   temp_dir: "data/temp_audio"
///   reference_timeout_seconds: 60
///   synthesis_timeout_seconds: 300
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub synthesis: Option<SynthesisYaml>,
}

/// Synthesis engine configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SynthesisYaml {
    /// Ordered list of server base URLs; order defines rotation order
    pub servers: Option<Vec<String>>,
    pub enable_sentence_splitting: Option<bool>,
    pub sentences_per_chunk: Option<i64>,
    pub sentence_split_regex: Option<String>,
    pub temp_dir: Option<String>,
    pub reference_timeout_seconds: Option<u64>,
    pub synthesis_timeout_seconds: Option<u64>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
