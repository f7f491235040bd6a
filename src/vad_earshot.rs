//! Earshot-powered speech classifier implementing `SpeechClassifier`.

use crate::audio::{rate_supported, ClassifyError, SpeechClassifier};
use crate::config::Aggressiveness;
use earshot::{VoiceActivityDetector, VoiceActivityProfile};

/// Thin wrapper that adapts `earshot`'s WebRTC VAD port to the crate's
/// `SpeechClassifier` trait.
pub struct EarshotClassifier {
    detector: VoiceActivityDetector,
    scratch: Vec<i16>,
}

impl EarshotClassifier {
    pub fn new(aggressiveness: Aggressiveness) -> Self {
        let profile = match aggressiveness {
            Aggressiveness::Quality => VoiceActivityProfile::QUALITY,
            Aggressiveness::LowBitrate => VoiceActivityProfile::LBR,
            Aggressiveness::Aggressive => VoiceActivityProfile::AGGRESSIVE,
            Aggressiveness::VeryAggressive => VoiceActivityProfile::VERY_AGGRESSIVE,
        };
        Self {
            detector: VoiceActivityDetector::new(profile),
            scratch: Vec::new(),
        }
    }

    /// WebRTC VAD accepts exactly 10, 20 or 30 ms of audio per call.
    fn frame_length_ok(samples: usize, sample_rate: u32) -> bool {
        let per_10ms = sample_rate as usize / 100;
        samples == per_10ms || samples == 2 * per_10ms || samples == 3 * per_10ms
    }
}

impl SpeechClassifier for EarshotClassifier {
    fn classify(&mut self, frame: &[u8], sample_rate: u32) -> Result<bool, ClassifyError> {
        if !rate_supported(sample_rate) {
            return Err(ClassifyError::UnsupportedSampleRate(sample_rate));
        }
        if frame.is_empty() || frame.len() % 2 != 0 {
            return Err(ClassifyError::OddFrameLength(frame.len()));
        }
        let samples = frame.len() / 2;
        if !Self::frame_length_ok(samples, sample_rate) {
            return Err(ClassifyError::FrameLength {
                got: frame.len(),
                sample_rate,
            });
        }
        self.scratch.clear();
        self.scratch.reserve(samples);
        for pair in frame.chunks_exact(2) {
            self.scratch.push(i16::from_le_bytes([pair[0], pair[1]]));
        }
        let prediction = match sample_rate {
            8_000 => self.detector.predict_8khz(&self.scratch),
            16_000 => self.detector.predict_16khz(&self.scratch),
            32_000 => self.detector.predict_32khz(&self.scratch),
            48_000 => self.detector.predict_48khz(&self.scratch),
            other => return Err(ClassifyError::UnsupportedSampleRate(other)),
        };
        prediction.map_err(|_| ClassifyError::FrameLength {
            got: frame.len(),
            sample_rate,
        })
    }

    fn reset(&mut self) {
        self.detector.reset();
    }

    fn name(&self) -> &'static str {
        "earshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_frames_that_are_not_webrtc_sized() {
        let mut classifier = EarshotClassifier::new(Aggressiveness::VeryAggressive);
        let err = classifier.classify(&[0u8; 100], 16_000).unwrap_err();
        assert!(matches!(err, ClassifyError::FrameLength { .. }));
    }

    #[test]
    fn rejects_unsupported_rate() {
        let mut classifier = EarshotClassifier::new(Aggressiveness::Quality);
        let err = classifier.classify(&[0u8; 320], 44_100).unwrap_err();
        assert_eq!(err, ClassifyError::UnsupportedSampleRate(44_100));
    }

    #[test]
    fn classifies_a_silent_frame_without_error() {
        let mut classifier = EarshotClassifier::new(Aggressiveness::Aggressive);
        let decision = classifier
            .classify(&[0u8; 960], 16_000)
            .expect("well-formed frame");
        assert!(!decision);
    }
}
