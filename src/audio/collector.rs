//! Padded sliding-window speech segmentation.

use super::{ClassifyError, Frame, SpeechClassifier};
use std::collections::VecDeque;
use tracing::debug;

/// One contiguous span of detected speech.
///
/// `bytes` concatenates every frame collected between trigger and detrigger,
/// padding frames included. Boundaries are milliseconds from the start of the
/// source, truncated toward zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub bytes: Vec<u8>,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Groups classified frames into speech segments with front/back padding.
///
/// A bounded window holds the most recent `padding_duration_ms /
/// frame_duration_ms` frames together with their classifications. While idle,
/// the collector triggers once more than 90% of the *window capacity* is
/// voiced and folds the whole window into the segment, so the padding that
/// precedes the detected onset is kept. While collecting, it detriggers once
/// more than 90% of the window capacity is unvoiced; the trailing window has
/// already been appended, so up to one window of silence stays attached to
/// the segment. The capacity (not the current occupancy) is the denominator
/// even while the window is still filling, so an initial all-voiced run only
/// trips the threshold once the window is actually full.
///
/// Segments come out strictly in source order and never overlap. A segment is
/// only yielded at detrigger or end of input, so pulling the next one may
/// consume many upstream frames. Dropping the collector mid-stream is safe;
/// all state is owned by the instance.
pub struct SegmentCollector<'a, I, C> {
    frames: I,
    classifier: C,
    sample_rate: u32,
    capacity: usize,
    window: VecDeque<(Frame<'a>, bool)>,
    voiced: Vec<Frame<'a>>,
    triggered: bool,
    pending_start_ms: u64,
    last_frame_end: f64,
    boundaries: Vec<(u64, u64)>,
}

impl<'a, I, C> SegmentCollector<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    /// A padding that is not a whole multiple of the frame duration truncates
    /// the window capacity down; that is expected, not an error.
    pub fn new(
        frames: I,
        classifier: C,
        sample_rate: u32,
        frame_duration_ms: u32,
        padding_duration_ms: u32,
    ) -> Self {
        let capacity = (padding_duration_ms / frame_duration_ms.max(1)) as usize;
        Self {
            frames,
            classifier,
            sample_rate,
            capacity,
            window: VecDeque::with_capacity(capacity),
            voiced: Vec::new(),
            triggered: false,
            pending_start_ms: 0,
            last_frame_end: 0.0,
            boundaries: Vec::new(),
        }
    }

    /// Advances until the next segment is complete or input is exhausted.
    ///
    /// Classifier precondition failures surface immediately and leave the
    /// collector unusable.
    pub fn next_segment(&mut self) -> Result<Option<Segment>, ClassifyError> {
        while let Some(frame) = self.frames.next() {
            let is_speech = self.classifier.classify(frame.bytes, self.sample_rate)?;
            self.last_frame_end = frame.timestamp + frame.duration;
            if !self.triggered {
                self.push_window(frame, is_speech);
                let num_voiced = self.window.iter().filter(|(_, speech)| *speech).count();
                if num_voiced as f64 > 0.9 * self.capacity as f64 {
                    self.triggered = true;
                    self.pending_start_ms = self
                        .window
                        .front()
                        .map(|(first, _)| to_ms(first.timestamp))
                        .unwrap_or_else(|| to_ms(frame.timestamp));
                    debug!(start_ms = self.pending_start_ms, "speech onset");
                    // The segment starts with the audio already in the window.
                    self.voiced
                        .extend(self.window.drain(..).map(|(frame, _)| frame));
                }
            } else {
                self.voiced.push(frame);
                self.push_window(frame, is_speech);
                let num_unvoiced = self.window.iter().filter(|(_, speech)| !*speech).count();
                if num_unvoiced as f64 > 0.9 * self.capacity as f64 {
                    let end_ms = to_ms(frame.timestamp + frame.duration);
                    debug!(start_ms = self.pending_start_ms, end_ms, "speech offset");
                    self.triggered = false;
                    self.boundaries.push((self.pending_start_ms, end_ms));
                    self.window.clear();
                    return Ok(Some(self.take_segment(end_ms)));
                }
            }
        }
        // Input exhausted. Anything still buffered is voiced audio that never
        // saw a detrigger; flush it rather than dropping it.
        if !self.voiced.is_empty() {
            let end_ms = to_ms(self.last_frame_end);
            if self.triggered {
                debug!(
                    start_ms = self.pending_start_ms,
                    end_ms, "input ended while triggered; flushing open segment"
                );
                self.triggered = false;
            }
            return Ok(Some(self.take_segment(end_ms)));
        }
        Ok(None)
    }

    /// Boundary pairs of every completed trigger/detrigger cycle, in ms.
    /// A segment flushed at end of input reports its end bound via its own
    /// `end_ms` only; no cycle is recorded for it.
    pub fn boundaries(&self) -> &[(u64, u64)] {
        &self.boundaries
    }

    /// Number of completed trigger/detrigger cycles.
    pub fn completed_cycles(&self) -> usize {
        self.boundaries.len()
    }

    fn push_window(&mut self, frame: Frame<'a>, is_speech: bool) {
        if self.capacity == 0 {
            return;
        }
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back((frame, is_speech));
    }

    fn take_segment(&mut self, end_ms: u64) -> Segment {
        let total = self.voiced.iter().map(|frame| frame.bytes.len()).sum();
        let mut bytes = Vec::with_capacity(total);
        for frame in self.voiced.drain(..) {
            bytes.extend_from_slice(frame.bytes);
        }
        Segment {
            bytes,
            start_ms: self.pending_start_ms,
            end_ms,
        }
    }
}

impl<'a, I, C> Iterator for SegmentCollector<'a, I, C>
where
    I: Iterator<Item = Frame<'a>>,
    C: SpeechClassifier,
{
    type Item = Result<Segment, ClassifyError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_segment().transpose()
    }
}

fn to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0) as u64
}
