//! Lossless WAV concatenation.

use std::path::Path;

use tracing::{error, info};

use super::base::{AudioAsset, TTSError, TTSResult};
use super::storage::AudioStore;

/// Concatenate `assets` in order into one new WAV file.
///
/// A single asset is returned as is. Otherwise the output takes its format from the
/// first asset and every asset's frames are appended unchanged. Sources are deleted
/// after a successful merge and left in place when the merge fails.
pub fn merge_assets(store: &AudioStore, assets: Vec<AudioAsset>) -> TTSResult<AudioAsset> {
    if assets.len() <= 1 {
        return assets
            .into_iter()
            .next()
            .ok_or_else(|| TTSError::MergeFailed("no audio to merge".to_string()));
    }

    let output = store.merged_path()?;
    if let Err(e) = concat_wav(&assets, &output) {
        error!("Failed to merge WAV files: {e}");
        if output.exists() {
            AudioAsset::new(&output).discard();
        }
        return Err(TTSError::MergeFailed(e.to_string()));
    }

    info!(count = assets.len(), output = %output.display(), "Merged audio files");
    for asset in &assets {
        asset.discard();
    }
    Ok(AudioAsset::new(output))
}

fn concat_wav(assets: &[AudioAsset], output: &Path) -> TTSResult<()> {
    let spec = hound::WavReader::open(assets[0].path())?.spec();
    let mut writer = hound::WavWriter::create(output, spec)?;

    for asset in assets {
        let mut reader = hound::WavReader::open(asset.path())?;
        match spec.sample_format {
            hound::SampleFormat::Int => {
                for sample in reader.samples::<i32>() {
                    writer.write_sample(sample?)?;
                }
            }
            hound::SampleFormat::Float => {
                for sample in reader.samples::<f32>() {
                    writer.write_sample(sample?)?;
                }
            }
        }
    }

    writer.finalize()?;
    Ok(())
}
