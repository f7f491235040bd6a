pub mod audio;
pub mod config;
pub mod transcode;
#[cfg(feature = "vad_earshot")]
pub mod vad_earshot;
pub mod wave;

pub use audio::{
    ClassifyError, EnergyClassifier, Frame, FrameError, FrameSlicer, Segment, SegmentCollector,
    SpeechClassifier,
};
