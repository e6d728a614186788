//! Synthesis orchestrator.
//!
//! ```text
//! synthesize ──> mode select ──┬── single-shot: try_synthesize(offset = rotation cursor)
//!                              └── chunked: chunker ──> SynthesisPool ──> merge_assets
//! ```
//!
//! Chunked mode is used only when splitting is enabled and the text yields more than one
//! chunk. The rotation cursor is process-wide, advances exactly once per single-shot call
//! whatever the outcome, and is never touched in chunked mode.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use arc_swap::ArcSwap;
use tracing::{error, info, warn};

use super::base::{
    AudioAsset, SynthesisBackend, SynthesisRequest, SynthesizedAudio, TTSError, TTSResult,
};
use super::chunker::SentenceChunker;
use super::failover::try_synthesize;
use super::genie::GenieBackend;
use super::merger::merge_assets;
use super::pool::SynthesisPool;
use super::storage::AudioStore;
use crate::config::RelayConfig;

/// Snapshot of everything one orchestrator call needs.
#[derive(Debug, Clone)]
pub struct SynthesisSettings {
    /// Ordered server base URLs; order defines rotation order
    pub servers: Arc<Vec<String>>,
    pub enable_sentence_splitting: bool,
    /// Non-positive disables splitting even when enabled
    pub sentences_per_chunk: i64,
    pub chunker: SentenceChunker,
    pub store: AudioStore,
}

impl SynthesisSettings {
    pub fn from_config(config: &RelayConfig) -> TTSResult<Self> {
        Ok(Self {
            servers: Arc::new(config.servers.clone()),
            enable_sentence_splitting: config.enable_sentence_splitting,
            sentences_per_chunk: config.sentences_per_chunk,
            chunker: SentenceChunker::new(&config.sentence_split_regex)?,
            store: config.audio_store(),
        })
    }
}

/// Public entry point of the synthesis core.
pub struct SynthesisEngine {
    backend: Arc<dyn SynthesisBackend>,
    settings: ArcSwap<SynthesisSettings>,
    cursor: AtomicUsize,
}

impl SynthesisEngine {
    pub fn new(backend: Arc<dyn SynthesisBackend>, settings: SynthesisSettings) -> Self {
        Self {
            backend,
            settings: ArcSwap::from_pointee(settings),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Build an engine talking to Genie servers as described by `config`.
    pub fn from_config(config: &RelayConfig) -> TTSResult<Self> {
        let backend = GenieBackend::new(config.genie_client_config(), config.audio_store())?;
        Ok(Self::new(
            Arc::new(backend),
            SynthesisSettings::from_config(config)?,
        ))
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<SynthesisSettings> {
        self.settings.load_full()
    }

    /// Publish new settings. Calls already running keep the snapshot they started with.
    pub fn update_settings(&self, settings: SynthesisSettings) {
        self.settings.store(Arc::new(settings));
    }

    /// Position the next single-shot call will start its rotation at (before wrapping).
    pub fn rotation_cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// Synthesize `request.text` into one audio asset.
    ///
    /// Failures are final: every server has already been tried for each unit of work.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<SynthesizedAudio> {
        let settings = self.settings.load_full();
        if settings.servers.is_empty() {
            error!(correlation_id = %request.correlation_id, "No TTS servers configured");
            return Err(TTSError::NoServersConfigured);
        }

        if settings.enable_sentence_splitting {
            let chunks = settings
                .chunker
                .split(&request.text, settings.sentences_per_chunk);
            if chunks.len() > 1 {
                return self.synthesize_chunked(&settings, request, chunks).await;
            }
        }

        self.synthesize_single(&settings, request).await
    }

    async fn synthesize_single(
        &self,
        settings: &SynthesisSettings,
        request: &SynthesisRequest,
    ) -> TTSResult<SynthesizedAudio> {
        let count = settings.servers.len();
        let start = self.advance_cursor(count);
        info!(
            correlation_id = %request.correlation_id,
            start_server = start,
            "Using single-shot synthesis"
        );

        match try_synthesize(self.backend.as_ref(), &settings.servers, start, request).await {
            Some(asset) => Ok(SynthesizedAudio::complete(asset, 1)),
            None => {
                error!(
                    correlation_id = %request.correlation_id,
                    "Synthesis failed on every TTS server"
                );
                Err(TTSError::AllServersFailed { attempts: count })
            }
        }
    }

    async fn synthesize_chunked(
        &self,
        settings: &SynthesisSettings,
        request: &SynthesisRequest,
        chunks: Vec<String>,
    ) -> TTSResult<SynthesizedAudio> {
        let chunk_count = chunks.len();
        let pool = SynthesisPool::new(self.backend.clone(), settings.servers.clone());
        let results = pool.run(request, chunks).await;

        let missing_chunks: Vec<usize> = results
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.is_none().then_some(index))
            .collect();
        let assets: Vec<AudioAsset> = results.into_iter().flatten().collect();

        if assets.is_empty() {
            error!(correlation_id = %request.correlation_id, "Every chunk failed to synthesize");
            return Err(TTSError::NoAudioProduced {
                chunks: chunk_count,
            });
        }
        if !missing_chunks.is_empty() {
            warn!(
                correlation_id = %request.correlation_id,
                missing = ?missing_chunks,
                "Merging partial audio, some chunks are missing"
            );
        }

        let store = settings.store.clone();
        let asset = tokio::task::spawn_blocking(move || merge_assets(&store, assets))
            .await
            .map_err(|e| TTSError::InternalError(format!("Merge task failed: {e}")))??;

        Ok(SynthesizedAudio {
            asset,
            chunk_count,
            missing_chunks,
        })
    }

    /// Take the current cursor value as a start offset and move it one step.
    fn advance_cursor(&self, count: usize) -> usize {
        let step = |current: usize| Some((current % count + 1) % count);
        let previous = match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, step)
        {
            Ok(previous) | Err(previous) => previous,
        };
        previous % count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Writes a real WAV whose samples are the chunk text's bytes.
    struct TextWavBackend {
        store: AudioStore,
        failing: Vec<String>,
        failing_texts: Vec<String>,
        delays_ms: HashMap<String, u64>,
        attempts: Mutex<Vec<(String, String)>>,
        /// Texts in the order their files were written
        completed: Mutex<Vec<String>>,
    }

    impl TextWavBackend {
        fn new(store: AudioStore, failing: &[&str]) -> Self {
            Self {
                store,
                failing: failing.iter().map(|s| s.to_string()).collect(),
                failing_texts: Vec::new(),
                delays_ms: HashMap::new(),
                attempts: Mutex::new(Vec::new()),
                completed: Mutex::new(Vec::new()),
            }
        }

        fn first_servers(&self) -> Vec<String> {
            self.attempts
                .lock()
                .iter()
                .map(|(server, _)| server.clone())
                .collect()
        }
    }

    #[async_trait]
    impl SynthesisBackend for TextWavBackend {
        async fn attempt(&self, server_url: &str, request: &SynthesisRequest) -> TTSResult<AudioAsset> {
            self.attempts
                .lock()
                .push((server_url.to_string(), request.text.clone()));
            if let Some(ms) = self.delays_ms.get(&request.text) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.failing.iter().any(|s| s == server_url)
                || self.failing_texts.iter().any(|t| t == &request.text)
            {
                return Err(TTSError::NetworkError("connection refused".to_string()));
            }

            let path = self.store.chunk_path()?;
            let mut writer = hound::WavWriter::create(&path, crate::core::tts::base::chunk_wav_spec())?;
            for byte in request.text.bytes() {
                writer.write_sample(i16::from(byte))?;
            }
            writer.finalize()?;
            self.completed.lock().push(request.text.clone());
            Ok(AudioAsset::new(path))
        }
    }

    fn settings(store: &AudioStore, servers: &[&str], split: bool, per_chunk: i64) -> SynthesisSettings {
        SynthesisSettings {
            servers: Arc::new(servers.iter().map(|s| s.to_string()).collect()),
            enable_sentence_splitting: split,
            sentences_per_chunk: per_chunk,
            chunker: SentenceChunker::default(),
            store: store.clone(),
        }
    }

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest::new("alice", "ref.wav", "ref text", text, "engine-test")
    }

    fn decode_text(asset: &AudioAsset) -> String {
        let mut reader = hound::WavReader::open(asset.path()).unwrap();
        let bytes: Vec<u8> = reader
            .samples::<i16>()
            .map(|s| u8::try_from(s.unwrap()).unwrap())
            .collect();
        String::from_utf8(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_rotation_cursor_visits_servers_in_order() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &[]));
        let engine = SynthesisEngine::new(
            backend.clone(),
            settings(&store, &["a", "b", "c"], false, 2),
        );

        for _ in 0..5 {
            engine.synthesize(&request("Hi.")).await.unwrap();
        }

        assert_eq!(backend.first_servers(), vec!["a", "b", "c", "a", "b"]);
        assert_eq!(engine.rotation_cursor(), 2);
    }

    #[tokio::test]
    async fn test_single_shot_failure_still_advances_cursor_once() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &["a", "b", "c"]));
        let engine = SynthesisEngine::new(
            backend.clone(),
            settings(&store, &["a", "b", "c"], false, 2),
        );

        let result = engine.synthesize(&request("Hi.")).await;

        assert!(matches!(result, Err(TTSError::AllServersFailed { attempts: 3 })));
        assert_eq!(backend.first_servers(), vec!["a", "b", "c"]);
        assert_eq!(engine.rotation_cursor(), 1);
    }

    #[tokio::test]
    async fn test_single_chunk_text_uses_single_shot() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &[]));
        let engine = SynthesisEngine::new(backend.clone(), settings(&store, &["a", "b"], true, 3));

        let audio = engine.synthesize(&request("One. Two.")).await.unwrap();

        assert_eq!(audio.chunk_count, 1);
        assert!(!audio.is_partial());
        assert_eq!(decode_text(&audio.asset), "One. Two.");
        assert_eq!(engine.rotation_cursor(), 1);
    }

    #[tokio::test]
    async fn test_non_positive_chunk_size_uses_single_shot() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &[]));
        let engine = SynthesisEngine::new(backend.clone(), settings(&store, &["a"], true, 0));

        let audio = engine.synthesize(&request("One. Two. Three.")).await.unwrap();

        assert_eq!(audio.chunk_count, 1);
        assert_eq!(backend.attempts.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_chunked_merge_preserves_order_and_skips_cursor() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &["b"]));
        let engine = SynthesisEngine::new(
            backend.clone(),
            settings(&store, &["a", "b", "c"], true, 2),
        );

        let audio = engine
            .synthesize(&request("Hello. World. Foo. Bar. Baz."))
            .await
            .unwrap();

        assert_eq!(audio.chunk_count, 3);
        assert!(audio.missing_chunks.is_empty());
        assert_eq!(decode_text(&audio.asset), "Hello. World. Foo. Bar. Baz.");
        assert_eq!(engine.rotation_cursor(), 0);

        // Only the merged file is left behind.
        let files: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert!(
            audio
                .asset
                .path()
                .to_string_lossy()
                .ends_with("_merged.wav")
        );

        let served_by_b = backend
            .attempts
            .lock()
            .iter()
            .filter(|(server, _)| server == "b")
            .count();
        let total = backend.attempts.lock().len();
        // Every chunk that first hit "b" failed over, so three successes plus those failures.
        assert_eq!(total, 3 + served_by_b);
    }

    #[tokio::test]
    async fn test_out_of_order_completion_with_failed_chunk_merges_in_text_order() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let mut backend = TextWavBackend::new(store.clone(), &[]);
        backend.failing_texts = vec![" Two.".to_string()];
        // Earlier chunks finish later.
        backend.delays_ms = HashMap::from([
            ("One.".to_string(), 150),
            (" Three.".to_string(), 50),
        ]);
        let backend = Arc::new(backend);
        let engine = SynthesisEngine::new(
            backend.clone(),
            settings(&store, &["a", "b", "c"], true, 1),
        );

        let audio = engine
            .synthesize(&request("One. Two. Three. Four."))
            .await
            .unwrap();

        assert_eq!(*backend.completed.lock(), vec![" Four.", " Three.", "One."]);
        assert_eq!(audio.chunk_count, 4);
        assert!(audio.is_partial());
        assert_eq!(audio.missing_chunks, vec![1]);
        assert_eq!(decode_text(&audio.asset), "One. Three. Four.");

        let tries_on_two = backend
            .attempts
            .lock()
            .iter()
            .filter(|(_, text)| text == " Two.")
            .count();
        assert_eq!(tries_on_two, 3);

        let files: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_chunked_total_failure() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &["a", "b"]));
        let engine = SynthesisEngine::new(backend.clone(), settings(&store, &["a", "b"], true, 1));

        let result = engine.synthesize(&request("One. Two. Three.")).await;

        assert!(matches!(result, Err(TTSError::NoAudioProduced { chunks: 3 })));
        assert_eq!(backend.attempts.lock().len(), 6);
        assert_eq!(engine.rotation_cursor(), 0);
    }

    #[tokio::test]
    async fn test_no_servers() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &[]));
        let engine = SynthesisEngine::new(backend, settings(&store, &[], false, 2));

        let result = engine.synthesize(&request("Hi.")).await;
        assert!(matches!(result, Err(TTSError::NoServersConfigured)));
    }

    #[tokio::test]
    async fn test_updated_settings_apply_to_next_call() {
        let temp = TempDir::new().unwrap();
        let store = AudioStore::new(temp.path());
        let backend = Arc::new(TextWavBackend::new(store.clone(), &[]));
        let engine = SynthesisEngine::new(backend.clone(), settings(&store, &["a"], false, 2));

        engine.synthesize(&request("Hi.")).await.unwrap();
        engine.update_settings(settings(&store, &["x", "y"], false, 2));
        engine.synthesize(&request("Hi.")).await.unwrap();
        engine.synthesize(&request("Hi.")).await.unwrap();

        assert_eq!(backend.first_servers(), vec!["a", "x", "y"]);
        assert_eq!(engine.settings().servers.len(), 2);
    }
}
