//! Audio Test Fixtures
//!
//! Programmatically generated PCM in the format Genie servers stream back:
//! - Sample rate: 32kHz
//! - Bit depth: 16-bit signed little-endian PCM
//! - Channels: Mono

use std::f32::consts::PI;
use std::path::Path;

/// Sample rate of synthesized speech
pub const SAMPLE_RATE: u32 = 32000;

/// Duration constants (in samples at 32kHz)
pub const MS_10: usize = 320;
pub const MS_100: usize = 3200;

/// Generate silence (zeros)
pub fn generate_silence(duration_samples: usize) -> Vec<i16> {
    vec![0i16; duration_samples]
}

/// Generate a flat signal; handy for telling chunks apart after a merge
pub fn generate_constant(duration_samples: usize, value: i16) -> Vec<i16> {
    vec![value; duration_samples]
}

/// Generate a sine wave tone
pub fn generate_sine_wave(duration_samples: usize, frequency: f32, amplitude: f32) -> Vec<i16> {
    let max_amplitude = amplitude * i16::MAX as f32;
    let angular_freq = 2.0 * PI * frequency / SAMPLE_RATE as f32;

    (0..duration_samples)
        .map(|i| ((angular_freq * i as f32).sin() * max_amplitude) as i16)
        .collect()
}

/// Convert samples to raw little-endian bytes
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Read every sample of a 16-bit WAV file
pub fn read_wav_samples(path: &Path) -> Vec<i16> {
    let mut reader = hound::WavReader::open(path).expect("readable wav");
    reader
        .samples::<i16>()
        .map(|s| s.expect("valid sample"))
        .collect()
}

/// Read the header of a WAV file
pub fn read_wav_spec(path: &Path) -> hound::WavSpec {
    hound::WavReader::open(path).expect("readable wav").spec()
}
