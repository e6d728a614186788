//! Request bodies for the Genie TTS HTTP protocol.
//!
//! ```json
//! POST /set_reference_audio
//! { "character_name": "alice", "audio_path": "ref/alice.wav", "audio_text": "..." }
//!
//! POST /tts
//! { "character_name": "alice", "text": "Hello.", "split_sentence": true }
//! ```
//!
//! `/tts` answers with a raw little-endian 16-bit mono PCM byte stream, no header.

use serde::{Deserialize, Serialize};

use crate::core::tts::base::SynthesisRequest;

/// Body of `POST /set_reference_audio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAudioRequest {
    pub character_name: String,
    pub audio_path: String,
    pub audio_text: String,
}

impl From<&SynthesisRequest> for ReferenceAudioRequest {
    fn from(request: &SynthesisRequest) -> Self {
        Self {
            character_name: request.character_name.clone(),
            audio_path: request.ref_audio_path.clone(),
            audio_text: request.ref_audio_text.clone(),
        }
    }
}

/// Body of `POST /tts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub character_name: String,
    pub text: String,
    pub split_sentence: bool,
}

impl From<&SynthesisRequest> for SpeechRequest {
    fn from(request: &SynthesisRequest) -> Self {
        Self {
            character_name: request.character_name.clone(),
            text: request.text.clone(),
            split_sentence: true,
        }
    }
}
