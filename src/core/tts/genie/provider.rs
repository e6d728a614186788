//! Genie TTS backend client.
//!
//! Runs the two-step protocol against a single server:
//!
//! 1. `POST {server}/set_reference_audio` registers the reference clip for the character.
//! 2. `POST {server}/tts` streams raw PCM back, which is written into a fresh WAV file.
//!    The synthesis timeout is an idle timeout per read, so long utterances are not cut off.
//!
//! Any failure aborts the attempt and removes the partially written file.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

use super::config::GenieClientConfig;
use super::messages::{ReferenceAudioRequest, SpeechRequest};
use super::{REFERENCE_AUDIO_PATH, SYNTHESIS_PATH};
use crate::core::tts::base::{
    AudioAsset, SynthesisBackend, SynthesisRequest, TTSError, TTSResult, chunk_wav_spec,
};
use crate::core::tts::storage::AudioStore;

/// HTTP client for Genie-compatible synthesis servers.
///
/// One instance is shared by every worker; `reqwest::Client` pools connections per host.
#[derive(Debug, Clone)]
pub struct GenieBackend {
    client: reqwest::Client,
    config: GenieClientConfig,
    store: AudioStore,
}

impl GenieBackend {
    pub fn new(config: GenieClientConfig, store: AudioStore) -> TTSResult<Self> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            TTSError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self::with_client(client, config, store))
    }

    pub fn with_client(client: reqwest::Client, config: GenieClientConfig, store: AudioStore) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    pub fn config(&self) -> &GenieClientConfig {
        &self.config
    }

    async fn register_reference(&self, server: &str, request: &SynthesisRequest) -> TTSResult<()> {
        let response = self
            .client
            .post(format!("{server}{REFERENCE_AUDIO_PATH}"))
            .timeout(self.config.reference_timeout())
            .json(&ReferenceAudioRequest::from(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TTSError::ServerError {
                server: server.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    async fn synthesize_to_file(
        &self,
        server: &str,
        request: &SynthesisRequest,
    ) -> TTSResult<AudioAsset> {
        let idle_timeout = self.config.synthesis_timeout();
        let send = self
            .client
            .post(format!("{server}{SYNTHESIS_PATH}"))
            .json(&SpeechRequest::from(request))
            .send();
        let response = tokio::time::timeout(idle_timeout, send)
            .await
            .map_err(|_| {
                TTSError::NetworkError(format!(
                    "No response from {server} within {}s",
                    idle_timeout.as_secs()
                ))
            })??;

        if !response.status().is_success() {
            return Err(TTSError::ServerError {
                server: server.to_string(),
                status: response.status().as_u16(),
            });
        }

        let path = self.store.chunk_path()?;
        match write_pcm_stream(&path, server, response.bytes_stream(), idle_timeout).await {
            Ok(samples) => {
                debug!(
                    correlation_id = %request.correlation_id,
                    server,
                    samples,
                    path = %path.display(),
                    "Audio stream written"
                );
                Ok(AudioAsset::new(path))
            }
            Err(e) => {
                AudioAsset::new(path).discard();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl SynthesisBackend for GenieBackend {
    async fn attempt(&self, server_url: &str, request: &SynthesisRequest) -> TTSResult<AudioAsset> {
        let server = server_url.trim_end_matches('/');
        info!(correlation_id = %request.correlation_id, server, "Trying TTS server");

        self.register_reference(server, request).await?;
        self.synthesize_to_file(server, request).await
    }
}

/// Write a raw little-endian 16-bit PCM byte stream into a new WAV file at `path`.
///
/// Network chunks may split a sample in two; the odd byte is carried into the next chunk.
/// A dangling byte at end-of-stream is dropped. Returns the number of samples written.
///
/// `idle_timeout` bounds the wait for each chunk. A stream that keeps delivering bytes is
/// never cut off, however long it runs.
pub(crate) async fn write_pcm_stream<S, E>(
    path: &Path,
    server: &str,
    mut stream: S,
    idle_timeout: Duration,
) -> TTSResult<u64>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut writer = hound::WavWriter::create(path, chunk_wav_spec())?;
    let mut carry: Option<u8> = None;
    let mut samples = 0u64;

    loop {
        let next = tokio::time::timeout(idle_timeout, stream.next())
            .await
            .map_err(|_| TTSError::StreamFailed {
                server: server.to_string(),
                reason: format!("no audio received for {}s", idle_timeout.as_secs_f32()),
            })?;
        let Some(item) = next else {
            break;
        };
        let bytes = item.map_err(|e| TTSError::StreamFailed {
            server: server.to_string(),
            reason: e.to_string(),
        })?;
        let mut data = bytes.as_ref();

        if let Some(low) = carry.take() {
            match data.split_first() {
                Some((&high, rest)) => {
                    writer.write_sample(i16::from_le_bytes([low, high]))?;
                    samples += 1;
                    data = rest;
                }
                None => {
                    carry = Some(low);
                    continue;
                }
            }
        }

        let mut pairs = data.chunks_exact(2);
        for pair in &mut pairs {
            writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
            samples += 1;
        }
        carry = pairs.remainder().first().copied();
    }

    if carry.is_some() {
        debug!(server, "Dropping trailing odd byte from audio stream");
    }

    writer.finalize()?;
    Ok(samples)
}
