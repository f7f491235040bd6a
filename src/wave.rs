//! WAV container reading and writing.
//!
//! The segmenter core never touches files; this module is the boundary where
//! container preconditions are enforced. Inputs must be mono 16-bit integer
//! PCM at a supported rate; violations surface as structured errors instead
//! of being converted or tolerated.

use crate::audio::rate_supported;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaveError {
    #[error("expected mono audio, got {0} channels")]
    ChannelCount(u16),

    #[error("expected 16-bit integer samples, got {bits}-bit {format:?}")]
    SampleWidth { bits: u16, format: SampleFormat },

    #[error("unsupported sample rate {0} Hz (expected 8000, 16000, 32000 or 48000)")]
    UnsupportedSampleRate(u32),

    #[error(transparent)]
    Container(#[from] hound::Error),
}

/// Reads a WAV file into raw little-endian PCM bytes plus its sample rate.
pub fn read_wave(path: &Path) -> Result<(Vec<u8>, u32), WaveError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(WaveError::ChannelCount(spec.channels));
    }
    if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        return Err(WaveError::SampleWidth {
            bits: spec.bits_per_sample,
            format: spec.sample_format,
        });
    }
    if !rate_supported(spec.sample_rate) {
        return Err(WaveError::UnsupportedSampleRate(spec.sample_rate));
    }
    let mut pcm = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        pcm.extend_from_slice(&sample?.to_le_bytes());
    }
    Ok((pcm, spec.sample_rate))
}

/// Writes raw PCM bytes as a standalone mono 16-bit WAV at `sample_rate`.
///
/// A trailing odd byte (not a whole sample) is ignored.
pub fn write_wave(path: &Path, pcm: &[u8], sample_rate: u32) -> Result<(), WaveError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for pair in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn written_file_reads_back_with_same_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let pcm: Vec<u8> = (0..64u8).collect();
        write_wave(&path, &pcm, 16_000).unwrap();

        let (read_back, rate) = read_wave(&path).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(read_back, pcm);
    }

    #[test]
    fn rejects_stereo_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..32 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        assert!(matches!(read_wave(&path), Err(WaveError::ChannelCount(2))));
    }

    #[test]
    fn rejects_unsupported_sample_rate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cd.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(
            read_wave(&path),
            Err(WaveError::UnsupportedSampleRate(44_100))
        ));
    }

    #[test]
    fn rejects_float_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.0f32).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(
            read_wave(&path),
            Err(WaveError::SampleWidth { bits: 32, .. })
        ));
    }
}
