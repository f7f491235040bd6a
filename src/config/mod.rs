//! Command-line parsing and validation helpers.

mod defaults;
mod validation;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub use defaults::{
    default_classifier, CLASSIFIER_FRAME_MS, DEFAULT_AGGRESSIVENESS, DEFAULT_ENERGY_THRESHOLD_DB,
    DEFAULT_FRAME_MS, DEFAULT_PADDING_MS, MAX_AGGRESSIVENESS, MAX_FRAME_MS, MAX_PADDING_MS,
    TRANSCODE_SAMPLE_RATE,
};

/// CLI options for the voxsplit segmenter. Validated values keep the ffmpeg
/// subprocess and output paths safe.
#[derive(Debug, Parser, Clone)]
#[command(about = "Split recordings into speech segments, discarding silence", author, version)]
pub struct AppConfig {
    /// Audio file to segment, or a directory of audio files (not recursed)
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory segment files are written under (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Classifier aggressiveness, 0 (permissive) to 3 (filters the most non-speech)
    #[arg(long, default_value_t = DEFAULT_AGGRESSIVENESS)]
    pub aggressiveness: u8,

    /// Frame duration fed to the classifier (milliseconds)
    #[arg(long = "frame-ms", default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u32,

    /// Padding window kept around trigger decisions (milliseconds)
    #[arg(long = "padding-ms", default_value_t = DEFAULT_PADDING_MS)]
    pub padding_ms: u32,

    /// Speech classifier implementation to use
    #[arg(long, value_enum, default_value_t = default_classifier())]
    pub classifier: ClassifierKind,

    /// Energy classifier threshold (decibels)
    #[arg(
        long = "energy-threshold-db",
        default_value_t = DEFAULT_ENERGY_THRESHOLD_DB,
        allow_negative_numbers = true
    )]
    pub energy_threshold_db: f32,

    /// FFmpeg binary used to transcode non-WAV inputs
    #[arg(long = "ffmpeg-cmd", env = "VOXSPLIT_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg_cmd: String,

    /// Write a <stem>_segments.json manifest next to the segment files
    #[arg(long = "timestamps-json", default_value_t = false)]
    pub timestamps_json: bool,
}

/// Available runtime-selectable classifier implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierKind {
    Earshot,
    Energy,
}

impl ClassifierKind {
    pub fn label(self) -> &'static str {
        match self {
            ClassifierKind::Earshot => "earshot",
            ClassifierKind::Energy => "energy",
        }
    }
}

/// WebRTC VAD operating mode. Higher levels filter non-speech harder, at the
/// cost of clipping quiet speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggressiveness {
    Quality,
    LowBitrate,
    Aggressive,
    VeryAggressive,
}

impl Aggressiveness {
    /// Maps the CLI's 0..=3 level onto a mode; `None` outside that range.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Quality),
            1 => Some(Self::LowBitrate),
            2 => Some(Self::Aggressive),
            3 => Some(Self::VeryAggressive),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Self::Quality => 0,
            Self::LowBitrate => 1,
            Self::Aggressive => 2,
            Self::VeryAggressive => 3,
        }
    }
}

/// Snapshot of the CLI-controlled segmentation settings for downstream
/// consumers.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub frame_ms: u32,
    pub padding_ms: u32,
    pub aggressiveness: Aggressiveness,
    pub classifier: ClassifierKind,
    pub energy_threshold_db: f32,
}
