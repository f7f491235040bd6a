//! Speech/non-speech classification seam.
//!
//! The segmentation state machine only consumes one boolean per frame, so the
//! classifier behind it is swappable. The default WebRTC-style detector lives
//! in `crate::vad_earshot`; `EnergyClassifier` is the dependency-free
//! fallback.

use super::rate_supported;
use thiserror::Error;

/// Precondition violations raised by a classifier. These are caller bugs
/// (wrong frame length, bad rate), never transient failures, and are not
/// retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("frame of {got} bytes is not 10, 20 or 30 ms of mono 16-bit audio at {sample_rate} Hz")]
    FrameLength { got: usize, sample_rate: u32 },

    #[error("frame length {0} is not a positive whole number of 16-bit samples")]
    OddFrameLength(usize),

    #[error("unsupported sample rate {0} Hz (expected 8000, 16000, 32000 or 48000)")]
    UnsupportedSampleRate(u32),
}

/// Classifies one frame of mono 16-bit little-endian PCM as voiced or not.
///
/// # Frame size contract
///
/// WebRTC-style detectors accept only 10, 20 or 30 ms frames; a frame whose
/// byte length does not match one of those durations at `sample_rate` fails
/// with [`ClassifyError::FrameLength`]. Implementations may keep internal
/// adaptive state, so use one instance per audio source and never share one
/// across sources.
pub trait SpeechClassifier {
    fn classify(&mut self, frame: &[u8], sample_rate: u32) -> Result<bool, ClassifyError>;
    fn reset(&mut self);
    fn name(&self) -> &'static str {
        "unknown_classifier"
    }
}

impl<T: SpeechClassifier + ?Sized> SpeechClassifier for &mut T {
    fn classify(&mut self, frame: &[u8], sample_rate: u32) -> Result<bool, ClassifyError> {
        (**self).classify(frame, sample_rate)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Lightweight classifier that thresholds RMS energy. Works at any frame
/// length and needs no model, at the cost of mistaking loud noise for speech.
#[derive(Debug, Clone)]
pub struct EnergyClassifier {
    threshold_db: f32,
}

impl EnergyClassifier {
    pub fn new(threshold_db: f32) -> Self {
        Self { threshold_db }
    }
}

impl SpeechClassifier for EnergyClassifier {
    fn classify(&mut self, frame: &[u8], sample_rate: u32) -> Result<bool, ClassifyError> {
        if !rate_supported(sample_rate) {
            return Err(ClassifyError::UnsupportedSampleRate(sample_rate));
        }
        if frame.is_empty() || frame.len() % 2 != 0 {
            return Err(ClassifyError::OddFrameLength(frame.len()));
        }
        let mut energy = 0.0f32;
        for pair in frame.chunks_exact(2) {
            let sample = f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32_768.0;
            energy += sample * sample;
        }
        let rms = (energy / (frame.len() / 2) as f32).sqrt().max(1e-6);
        let db = 20.0 * rms.log10();
        Ok(db >= self.threshold_db)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &'static str {
        "energy_classifier"
    }
}
