//! Transient storage for chunk and merged audio files.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::base::TTSResult;

/// Default directory for intermediate and final audio assets.
pub const DEFAULT_TEMP_DIR: &str = "data/temp_audio";

/// Directory that hands out fresh, unique WAV paths.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl Default for AudioStore {
    fn default() -> Self {
        Self::new(DEFAULT_TEMP_DIR)
    }
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a newly synthesized chunk. Creates the directory if needed.
    pub fn chunk_path(&self) -> TTSResult<PathBuf> {
        self.fresh_path("")
    }

    /// Path for a merged asset. Creates the directory if needed.
    pub fn merged_path(&self) -> TTSResult<PathBuf> {
        self.fresh_path("_merged")
    }

    fn fresh_path(&self, suffix: &str) -> TTSResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(self.dir.join(format!("{}{suffix}.wav", Uuid::new_v4())))
    }
}
