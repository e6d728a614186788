//! Rotating failover across the configured servers.
//!
//! Both single-shot mode and every pool worker go through [`try_synthesize`]; they differ
//! only in the start offset they pass.

use tracing::{info, warn};

use super::base::{AudioAsset, SynthesisBackend, SynthesisRequest};

/// Try every server once, starting at `start_offset` and wrapping around.
///
/// Returns the first asset produced, or `None` once all servers have failed. No backoff,
/// no delay between attempts and no server is tried twice in one call.
pub async fn try_synthesize(
    backend: &dyn SynthesisBackend,
    servers: &[String],
    start_offset: usize,
    request: &SynthesisRequest,
) -> Option<AudioAsset> {
    let count = servers.len();

    for i in 0..count {
        let server = &servers[(start_offset + i) % count];

        match backend.attempt(server, request).await {
            Ok(asset) => {
                info!(
                    correlation_id = %request.correlation_id,
                    server = %server,
                    attempts = i + 1,
                    "TTS server produced audio"
                );
                return Some(asset);
            }
            Err(e) => {
                warn!(
                    correlation_id = %request.correlation_id,
                    server = %server,
                    "TTS server interaction failed: {e}"
                );
            }
        }
    }

    None
}
