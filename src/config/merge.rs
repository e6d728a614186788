use std::path::PathBuf;

use super::RelayConfig;
use super::env;
use super::yaml::YamlConfig;
use crate::utils::url_validation::normalize_server_url;

/// Merge environment variables (base) with optional YAML overrides.
pub(crate) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<RelayConfig, Box<dyn std::error::Error>> {
    let base = env::load_from_env()?;
    Ok(apply_yaml(base, yaml))
}

/// Overlay every value present in `yaml` onto `config`.
pub(crate) fn apply_yaml(mut config: RelayConfig, yaml: Option<YamlConfig>) -> RelayConfig {
    let Some(synthesis) = yaml.and_then(|y| y.synthesis) else {
        return config;
    };

    if let Some(servers) = synthesis.servers {
        config.servers = servers
            .iter()
            .map(|s| normalize_server_url(s))
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(enabled) = synthesis.enable_sentence_splitting {
        config.enable_sentence_splitting = enabled;
    }
    if let Some(count) = synthesis.sentences_per_chunk {
        config.sentences_per_chunk = count;
    }
    if let Some(regex) = synthesis.sentence_split_regex {
        config.sentence_split_regex = regex;
    }
    if let Some(dir) = synthesis.temp_dir {
        config.temp_dir = PathBuf::from(dir);
    }
    if let Some(secs) = synthesis.reference_timeout_seconds {
        config.reference_timeout_seconds = secs;
    }
    if let Some(secs) = synthesis.synthesis_timeout_seconds {
        config.synthesis_timeout_seconds = secs;
    }

    config
}
