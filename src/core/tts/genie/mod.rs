//! Genie TTS backend.
//!
//! Genie servers expose two endpoints per base URL:
//!
//! - `POST /set_reference_audio` - bind a reference clip and transcript to a character
//! - `POST /tts` - stream raw PCM (mono, 16-bit little-endian, 32 kHz) for a text
//!
//! [`GenieBackend`] implements [`SynthesisBackend`](crate::core::tts::SynthesisBackend)
//! on top of them and wraps the stream into a WAV file in the engine's temp directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use voice_relay::core::tts::{AudioStore, GenieBackend, GenieClientConfig, SynthesisBackend};
//!
//! let backend = GenieBackend::new(GenieClientConfig::default(), AudioStore::default())?;
//! let asset = backend.attempt("http://127.0.0.1:8000", &request).await?;
//! ```

mod config;
mod messages;
mod provider;


pub use config::GenieClientConfig;
pub use messages::{ReferenceAudioRequest, SpeechRequest};
pub use provider::GenieBackend;

/// Reference audio registration endpoint
pub const REFERENCE_AUDIO_PATH: &str = "/set_reference_audio";
/// Streaming synthesis endpoint
pub const SYNTHESIS_PATH: &str = "/tts";

pub const DEFAULT_REFERENCE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SYNTHESIS_TIMEOUT_SECS: u64 = 300;
