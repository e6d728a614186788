//! Sentence-boundary text chunking.
//!
//! Text is cut after every delimiter match. Each sentence keeps its trailing delimiter,
//! and sentences are then grouped `sentences_per_chunk` at a time. Chunk boundaries
//! always fall on sentence boundaries.

use regex::Regex;
use tracing::debug;

use super::base::{TTSError, TTSResult};

/// Full-width and half-width period, comma, exclamation and question marks.
pub const DEFAULT_SENTENCE_SPLIT_REGEX: &str = r"([。、，！？,.!?])";

/// Splits text into chunks of whole sentences.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    delimiter: Regex,
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self {
            delimiter: Regex::new(DEFAULT_SENTENCE_SPLIT_REGEX)
                .expect("default sentence delimiter pattern is valid"),
        }
    }
}

impl SentenceChunker {
    /// Compile a chunker from a delimiter pattern.
    pub fn new(pattern: &str) -> TTSResult<Self> {
        let delimiter = Regex::new(pattern).map_err(|e| {
            TTSError::InvalidConfiguration(format!(
                "Invalid sentence split pattern '{pattern}': {e}"
            ))
        })?;
        Ok(Self { delimiter })
    }

    pub fn pattern(&self) -> &str {
        self.delimiter.as_str()
    }

    /// Split `text` into sentence units, each carrying its trailing delimiter.
    ///
    /// Fragments with no content (empty or whitespace only) are dropped together with
    /// their delimiter, so the sentences only add up to `text` when it has no such
    /// fragments. A final unterminated fragment is kept without a delimiter.
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for m in self.delimiter.find_iter(text) {
            // Zero-width matches would never advance.
            if m.start() == m.end() {
                continue;
            }
            if has_content(&text[start..m.start()]) {
                sentences.push(&text[start..m.end()]);
            }
            start = m.end();
        }

        if has_content(&text[start..]) {
            sentences.push(&text[start..]);
        }

        sentences
    }

    /// Split `text` into chunks of `sentences_per_chunk` sentences.
    ///
    /// A non-positive `sentences_per_chunk` disables splitting and returns the whole text
    /// as one chunk. The last chunk may hold fewer sentences than the others.
    pub fn split(&self, text: &str, sentences_per_chunk: i64) -> Vec<String> {
        if sentences_per_chunk <= 0 {
            return vec![text.to_string()];
        }
        let per_chunk = usize::try_from(sentences_per_chunk).unwrap_or(usize::MAX);

        let chunks: Vec<String> = self
            .sentences(text)
            .chunks(per_chunk)
            .map(|group| group.concat())
            .collect();

        debug!(chunks = chunks.len(), "Text split into chunks");
        chunks
    }
}

fn has_content(fragment: &str) -> bool {
    !fragment.trim().is_empty()
}
