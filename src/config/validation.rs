use regex::Regex;
use tracing::warn;

use crate::utils::url_validation::validate_server_url;

/// At least one server is required. Malformed URLs are only warned about; they stay in
/// the rotation and simply fail their attempts.
pub(crate) fn validate_servers(servers: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if servers.is_empty() {
        return Err(
            "No TTS servers configured. Set TTS_SERVERS or synthesis.servers in the config file"
                .into(),
        );
    }

    for server in servers {
        if let Err(e) = validate_server_url(server) {
            warn!(server = %server, "Suspicious TTS server URL: {e}");
        }
    }
    Ok(())
}

pub(crate) fn validate_split_regex(pattern: &str) -> Result<(), Box<dyn std::error::Error>> {
    Regex::new(pattern).map_err(|e| format!("Invalid sentence split regex '{pattern}': {e}"))?;
    Ok(())
}

pub(crate) fn validate_timeouts(
    reference_timeout_seconds: u64,
    synthesis_timeout_seconds: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    if reference_timeout_seconds == 0 {
        return Err("Reference audio timeout must be greater than zero".into());
    }
    if synthesis_timeout_seconds == 0 {
        return Err("Synthesis timeout must be greater than zero".into());
    }
    Ok(())
}
