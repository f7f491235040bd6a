//! Fixed-duration framing of raw PCM audio.

use super::rate_supported;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("unsupported sample rate {0} Hz (expected 8000, 16000, 32000 or 48000)")]
    UnsupportedSampleRate(u32),

    #[error("frame duration must be positive")]
    ZeroFrameDuration,
}

/// One fixed-duration slice of mono 16-bit PCM audio.
///
/// `bytes` borrows from the source buffer; nothing is copied until a frame is
/// folded into a segment. `timestamp` is the offset of the frame start within
/// the source, in seconds.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub bytes: &'a [u8],
    pub timestamp: f64,
    pub duration: f64,
}

/// Iterator cutting a PCM byte buffer into consecutive frames.
///
/// Frames never overlap and arrive in strict timestamp order with no gaps.
/// The iteration bound is `offset + frame_len < buffer_len`, so a trailing
/// slice that does not extend past a whole frame is dropped rather than
/// yielded. That truncation is documented behavior, not an error.
pub struct FrameSlicer<'a> {
    audio: &'a [u8],
    offset: usize,
    frame_len: usize,
    timestamp: f64,
    duration: f64,
}

impl<'a> FrameSlicer<'a> {
    /// Byte length of one frame: `frame_duration_ms` worth of 16-bit samples.
    pub fn frame_len(sample_rate: u32, frame_duration_ms: u32) -> usize {
        (sample_rate as usize * frame_duration_ms as usize / 1000) * 2
    }

    pub fn new(
        audio: &'a [u8],
        sample_rate: u32,
        frame_duration_ms: u32,
    ) -> Result<Self, FrameError> {
        if !rate_supported(sample_rate) {
            return Err(FrameError::UnsupportedSampleRate(sample_rate));
        }
        if frame_duration_ms == 0 {
            return Err(FrameError::ZeroFrameDuration);
        }
        let frame_len = Self::frame_len(sample_rate, frame_duration_ms);
        // Recompute the duration from the byte length so timestamps track what
        // is actually sliced rather than the requested milliseconds.
        let duration = frame_len as f64 / f64::from(sample_rate) / 2.0;
        Ok(Self {
            audio,
            offset: 0,
            frame_len,
            timestamp: 0.0,
            duration,
        })
    }
}

impl<'a> Iterator for FrameSlicer<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        if self.offset + self.frame_len >= self.audio.len() {
            return None;
        }
        let frame = Frame {
            bytes: &self.audio[self.offset..self.offset + self.frame_len],
            timestamp: self.timestamp,
            duration: self.duration,
        };
        self.offset += self.frame_len;
        self.timestamp += self.duration;
        Some(frame)
    }
}
