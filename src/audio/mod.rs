//! Frame slicing and speech segmentation pipeline.
//!
//! Raw PCM is cut into fixed-duration frames, every frame is classified as
//! voiced or unvoiced, and a padded sliding-window state machine groups the
//! voiced spans into segments. All stages are lazy, synchronous and owned by
//! a single consumer; independent audio sources get independent instances.

/// Sample rates the classifiers and the WAV reader accept, in Hz.
pub const SUPPORTED_SAMPLE_RATES: [u32; 4] = [8_000, 16_000, 32_000, 48_000];

mod collector;
mod frame;
mod vad;

pub use collector::{Segment, SegmentCollector};
pub use frame::{Frame, FrameError, FrameSlicer};
pub use vad::{ClassifyError, EnergyClassifier, SpeechClassifier};

/// True when `rate` is one of the rates the pipeline supports.
pub fn rate_supported(rate: u32) -> bool {
    SUPPORTED_SAMPLE_RATES.contains(&rate)
}
