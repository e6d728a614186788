//! Shared types for the synthesis core.
//!
//! Everything the chunker, backend clients, failover selector, worker pool, merger and
//! orchestrator exchange lives here: the request descriptor, the on-disk audio handle,
//! the backend trait and the error enum.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// Channel count of every asset produced by a backend.
pub const CHANNELS: u16 = 1;
/// Bytes per PCM sample in the backend stream.
pub const BYTES_PER_SAMPLE: u16 = 2;
/// Sample rate of the backend stream and of every chunk asset.
pub const SAMPLE_RATE: u32 = 32000;

/// WAV container parameters for chunk assets.
pub fn chunk_wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BYTES_PER_SAMPLE * 8,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Result type for synthesis operations
pub type TTSResult<T> = Result<T, TTSError>;

/// Errors raised by the synthesis core
#[derive(Debug, Error)]
pub enum TTSError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No TTS servers configured")]
    NoServersConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Server {server} responded with status {status}")]
    ServerError { server: String, status: u16 },

    #[error("Audio stream from {server} failed: {reason}")]
    StreamFailed { server: String, reason: String },

    #[error("Audio container error: {0}")]
    Audio(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("All {attempts} TTS servers failed")]
    AllServersFailed { attempts: usize },

    #[error("None of the {chunks} chunks produced audio")]
    NoAudioProduced { chunks: usize },

    #[error("Failed to merge audio: {0}")]
    MergeFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for TTSError {
    fn from(err: reqwest::Error) -> Self {
        TTSError::NetworkError(err.to_string())
    }
}

/// One utterance to synthesize.
///
/// Immutable for the lifetime of one orchestrator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Character (voice) name registered on the backend
    pub character_name: String,
    /// Reference audio path, relative to the backend's own storage
    pub ref_audio_path: String,
    /// Transcript of the reference audio
    pub ref_audio_text: String,
    /// Text to speak
    pub text: String,
    /// Correlation id used only for logging
    pub correlation_id: String,
}

impl SynthesisRequest {
    pub fn new(
        character_name: impl Into<String>,
        ref_audio_path: impl Into<String>,
        ref_audio_text: impl Into<String>,
        text: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            character_name: character_name.into(),
            ref_audio_path: ref_audio_path.into(),
            ref_audio_text: ref_audio_text.into(),
            text: text.into(),
            correlation_id: correlation_id.into(),
        }
    }

    /// Same voice and reference, different text and log id.
    ///
    /// Used to derive the per-chunk request in chunked mode.
    pub fn for_chunk(&self, index: usize, text: &str) -> Self {
        Self {
            character_name: self.character_name.clone(),
            ref_audio_path: self.ref_audio_path.clone(),
            ref_audio_text: self.ref_audio_text.clone(),
            text: text.to_string(),
            correlation_id: format!("{}-chunk-{}", self.correlation_id, index + 1),
        }
    }
}

/// Handle to a WAV file in transient storage.
///
/// Chunk-level assets are owned by the engine and removed once merged. The final asset
/// returned to the caller is the caller's to remove.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioAsset {
    path: PathBuf,
}

impl AudioAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// Delete the underlying file, logging instead of failing.
    pub fn discard(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), "Failed to delete temporary audio file: {e}");
        }
    }
}

/// A remote synthesis backend reachable by base URL.
///
/// Implementations run the full per-chunk protocol against one server and either hand
/// back a finished asset or an error. They never retry; rotation is the caller's job.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    async fn attempt(&self, server_url: &str, request: &SynthesisRequest) -> TTSResult<AudioAsset>;
}

/// Final outcome of one orchestrator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// The finished asset. Ownership passes to the caller.
    pub asset: AudioAsset,
    /// Number of chunks the text was split into (1 in single-shot mode)
    pub chunk_count: usize,
    /// Chunk indices whose audio is absent from `asset`
    pub missing_chunks: Vec<usize>,
}

impl SynthesizedAudio {
    pub fn complete(asset: AudioAsset, chunk_count: usize) -> Self {
        Self {
            asset,
            chunk_count,
            missing_chunks: Vec::new(),
        }
    }

    /// True when some chunks failed on every server and were left out of the audio.
    pub fn is_partial(&self) -> bool {
        !self.missing_chunks.is_empty()
    }
}
