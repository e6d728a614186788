pub mod tts;

// Re-export commonly used types for convenience
pub use tts::{
    AudioAsset, GenieBackend, SynthesisBackend, SynthesisEngine, SynthesisRequest,
    SynthesisSettings, SynthesizedAudio, TTSError, TTSResult,
};
