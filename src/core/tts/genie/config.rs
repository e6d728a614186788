//! Genie backend client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_REFERENCE_TIMEOUT_SECS, DEFAULT_SYNTHESIS_TIMEOUT_SECS};

/// Timeouts applied to the two protocol steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenieClientConfig {
    /// Timeout for `POST /set_reference_audio`
    pub reference_timeout_secs: u64,
    /// Idle timeout for `POST /tts`: applies to the response headers and to every read
    /// of the audio stream, not to the stream as a whole
    pub synthesis_timeout_secs: u64,
}

impl Default for GenieClientConfig {
    fn default() -> Self {
        Self {
            reference_timeout_secs: DEFAULT_REFERENCE_TIMEOUT_SECS,
            synthesis_timeout_secs: DEFAULT_SYNTHESIS_TIMEOUT_SECS,
        }
    }
}

impl GenieClientConfig {
    #[inline]
    pub fn reference_timeout(&self) -> Duration {
        Duration::from_secs(self.reference_timeout_secs)
    }

    #[inline]
    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }
}
