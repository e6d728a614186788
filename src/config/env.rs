//! Environment variable loading.
//!
//! | Variable                          | Type            | Default              |
//! |-----------------------------------|-----------------|----------------------|
//! | `TTS_SERVERS`                     | comma-separated | (none)               |
//! | `ENABLE_SENTENCE_SPLITTING`       | bool            | `false`              |
//! | `SENTENCES_PER_CHUNK`             | integer         | `2`                  |
//! | `SENTENCE_SPLIT_REGEX`            | string          | `([。、，！？,.!?])` |
//! | `TTS_TEMP_DIR`                    | path            | `data/temp_audio`    |
//! | `TTS_REFERENCE_TIMEOUT_SECONDS`   | integer         | `60`                 |
//! | `TTS_SYNTHESIS_TIMEOUT_SECONDS`   | integer         | `300`                |

use std::path::PathBuf;

use super::RelayConfig;
use super::utils::{parse_bool, parse_server_list};

pub(crate) const TTS_SERVERS: &str = "TTS_SERVERS";
pub(crate) const ENABLE_SENTENCE_SPLITTING: &str = "ENABLE_SENTENCE_SPLITTING";
pub(crate) const SENTENCES_PER_CHUNK: &str = "SENTENCES_PER_CHUNK";
pub(crate) const SENTENCE_SPLIT_REGEX: &str = "SENTENCE_SPLIT_REGEX";
pub(crate) const TTS_TEMP_DIR: &str = "TTS_TEMP_DIR";
pub(crate) const TTS_REFERENCE_TIMEOUT_SECONDS: &str = "TTS_REFERENCE_TIMEOUT_SECONDS";
pub(crate) const TTS_SYNTHESIS_TIMEOUT_SECONDS: &str = "TTS_SYNTHESIS_TIMEOUT_SECONDS";

/// Build a configuration from the process environment on top of defaults.
pub(crate) fn load_from_env() -> Result<RelayConfig, Box<dyn std::error::Error>> {
    load_with(|key| std::env::var(key).ok())
}

/// Build a configuration from an arbitrary variable lookup on top of defaults.
///
/// Empty values are treated as unset.
pub(crate) fn load_with<F>(lookup: F) -> Result<RelayConfig, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = RelayConfig::default();

    if let Some(value) = get(TTS_SERVERS) {
        config.servers = parse_server_list(&value);
    }
    if let Some(value) = get(ENABLE_SENTENCE_SPLITTING) {
        config.enable_sentence_splitting = parse_bool(&value)
            .ok_or_else(|| format!("Invalid {ENABLE_SENTENCE_SPLITTING} value: {value}"))?;
    }
    if let Some(value) = get(SENTENCES_PER_CHUNK) {
        config.sentences_per_chunk = value
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {SENTENCES_PER_CHUNK} value '{value}': {e}"))?;
    }
    if let Some(value) = get(SENTENCE_SPLIT_REGEX) {
        config.sentence_split_regex = value;
    }
    if let Some(value) = get(TTS_TEMP_DIR) {
        config.temp_dir = PathBuf::from(value);
    }
    if let Some(value) = get(TTS_REFERENCE_TIMEOUT_SECONDS) {
        config.reference_timeout_seconds = value
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {TTS_REFERENCE_TIMEOUT_SECONDS} value '{value}': {e}"))?;
    }
    if let Some(value) = get(TTS_SYNTHESIS_TIMEOUT_SECONDS) {
        config.synthesis_timeout_seconds = value
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {TTS_SYNTHESIS_TIMEOUT_SECONDS} value '{value}': {e}"))?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RelayConfig, Box<dyn std::error::Error>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_with(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = load(&[]).unwrap();
        assert_eq!(config, RelayConfig::default());
    }

    #[test]
    fn test_all_variables() {
        let config = load(&[
            (TTS_SERVERS, "http://a:9880, http://b:9880/"),
            (ENABLE_SENTENCE_SPLITTING, "true"),
            (SENTENCES_PER_CHUNK, "3"),
            (SENTENCE_SPLIT_REGEX, "[.]"),
            (TTS_TEMP_DIR, "/tmp/audio"),
            (TTS_REFERENCE_TIMEOUT_SECONDS, "15"),
            (TTS_SYNTHESIS_TIMEOUT_SECONDS, "90"),
        ])
        .unwrap();

        assert_eq!(config.servers, vec!["http://a:9880", "http://b:9880"]);
        assert!(config.enable_sentence_splitting);
        assert_eq!(config.sentences_per_chunk, 3);
        assert_eq!(config.sentence_split_regex, "[.]");
        assert_eq!(config.temp_dir, PathBuf::from("/tmp/audio"));
        assert_eq!(config.reference_timeout_seconds, 15);
        assert_eq!(config.synthesis_timeout_seconds, 90);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = load(&[(TTS_SERVERS, ""), (SENTENCES_PER_CHUNK, "  ")]).unwrap();
        assert!(config.servers.is_empty());
        assert_eq!(config.sentences_per_chunk, 2);
    }

    #[test]
    fn test_negative_chunk_size_parses() {
        let config = load(&[(SENTENCES_PER_CHUNK, "-2")]).unwrap();
        assert_eq!(config.sentences_per_chunk, -2);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = load(&[(SENTENCES_PER_CHUNK, "two")]).unwrap_err();
        assert!(err.to_string().contains(SENTENCES_PER_CHUNK));

        let err = load(&[(ENABLE_SENTENCE_SPLITTING, "maybe")]).unwrap_err();
        assert!(err.to_string().contains(ENABLE_SENTENCE_SPLITTING));

        let err = load(&[(TTS_SYNTHESIS_TIMEOUT_SECONDS, "-1")]).unwrap_err();
        assert!(err.to_string().contains(TTS_SYNTHESIS_TIMEOUT_SECONDS));
    }
}
