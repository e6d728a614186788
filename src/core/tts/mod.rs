pub mod base;
pub mod chunker;
pub mod engine;
pub mod failover;
pub mod genie;
pub mod merger;
pub mod pool;
pub mod storage;

pub use base::{
    AudioAsset, BYTES_PER_SAMPLE, CHANNELS, SAMPLE_RATE, SynthesisBackend, SynthesisRequest,
    SynthesizedAudio, TTSError, TTSResult,
};
pub use chunker::{DEFAULT_SENTENCE_SPLIT_REGEX, SentenceChunker};
pub use engine::{SynthesisEngine, SynthesisSettings};
pub use failover::try_synthesize;
pub use genie::{GenieBackend, GenieClientConfig};
pub use merger::merge_assets;
pub use pool::{ChunkSlot, ChunkTask, SynthesisPool};
pub use storage::{AudioStore, DEFAULT_TEMP_DIR};
