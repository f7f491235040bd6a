//! voxsplit entrypoint: wires file I/O, classifier configuration, and output
//! naming around the segmentation pipeline.
//!
//! Each input file gets its own classifier, frame slicer and collector; the
//! detected speech spans are written as standalone WAV files under
//! `<output>/<stem>/<stem>_NN.wav`.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use voxsplit::audio::{EnergyClassifier, FrameSlicer, SegmentCollector, SpeechClassifier};
use voxsplit::config::{AppConfig, ClassifierKind, SegmenterConfig};
use voxsplit::transcode::ensure_wav;
#[cfg(feature = "vad_earshot")]
use voxsplit::vad_earshot::EarshotClassifier;
use voxsplit::wave::{read_wave, write_wave};

fn main() -> ExitCode {
    let config = match AppConfig::parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("voxsplit: {err:#}");
            return ExitCode::from(2);
        }
    };
    init_tracing();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("voxsplit=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(config: &AppConfig) -> Result<()> {
    let inputs = expand_inputs(&config.input)?;
    if inputs.is_empty() {
        warn!("no audio files found under '{}'", config.input.display());
        return Ok(());
    }
    let output_root = config.output.clone().unwrap_or_else(|| PathBuf::from("."));
    let settings = config.segmenter_config();

    let mut failures = 0usize;
    for input in &inputs {
        if let Err(err) = process_file(input, &output_root, &settings, config)
            .with_context(|| format!("failed to segment '{}'", input.display()))
        {
            failures += 1;
            error!("{err:#}");
        }
    }
    if failures > 0 {
        bail!("{failures} of {} input file(s) failed", inputs.len());
    }
    Ok(())
}

/// A file is used as-is; a directory contributes each regular file directly
/// inside it (no recursion), sorted for a stable processing order.
fn expand_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input)
        .with_context(|| format!("failed to read input '{}'", input.display()))?;
    if metadata.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = Vec::new();
    let entries = fs::read_dir(input)
        .with_context(|| format!("failed to list directory '{}'", input.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn build_classifier(settings: &SegmenterConfig) -> Box<dyn SpeechClassifier> {
    match settings.classifier {
        #[cfg(feature = "vad_earshot")]
        ClassifierKind::Earshot => Box::new(EarshotClassifier::new(settings.aggressiveness)),
        #[cfg(not(feature = "vad_earshot"))]
        ClassifierKind::Earshot => Box::new(EnergyClassifier::new(settings.energy_threshold_db)),
        ClassifierKind::Energy => Box::new(EnergyClassifier::new(settings.energy_threshold_db)),
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    source: String,
    sample_rate: u32,
    classifier: &'static str,
    segments: &'a [SegmentRecord],
}

#[derive(Serialize)]
struct SegmentRecord {
    index: usize,
    start_ms: u64,
    end_ms: u64,
    path: PathBuf,
}

fn process_file(
    input: &Path,
    output_root: &Path,
    settings: &SegmenterConfig,
    config: &AppConfig,
) -> Result<()> {
    let wav_path = ensure_wav(&config.ffmpeg_cmd, input)?;
    let stem = wav_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("input '{}' has no usable file stem", wav_path.display()))?
        .to_string();
    let (pcm, sample_rate) = read_wave(&wav_path)
        .with_context(|| format!("failed to read '{}'", wav_path.display()))?;
    info!(
        "segmenting '{}' ({} Hz, {} samples)",
        wav_path.display(),
        sample_rate,
        pcm.len() / 2
    );

    let out_dir = output_root.join(&stem);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create '{}'", out_dir.display()))?;

    let mut classifier = build_classifier(settings);
    debug!("classifier: {}", classifier.name());
    let frames = FrameSlicer::new(&pcm, sample_rate, settings.frame_ms)?;
    let mut collector = SegmentCollector::new(
        frames,
        classifier.as_mut(),
        sample_rate,
        settings.frame_ms,
        settings.padding_ms,
    );

    let mut written: Vec<SegmentRecord> = Vec::new();
    while let Some(segment) = collector.next_segment()? {
        let index = written.len();
        let path = out_dir.join(format!("{stem}_{index:02}.wav"));
        write_wave(&path, &segment.bytes, sample_rate)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        debug!(
            "wrote '{}' covering {}..{} ms",
            path.display(),
            segment.start_ms,
            segment.end_ms
        );
        written.push(SegmentRecord {
            index,
            start_ms: segment.start_ms,
            end_ms: segment.end_ms,
            path,
        });
    }

    for (start_ms, end_ms) in collector.boundaries() {
        info!("segment boundary {start_ms}..{end_ms} ms");
    }
    info!(
        "'{stem}': {} segment(s), {} completed trigger cycle(s)",
        written.len(),
        collector.completed_cycles()
    );

    if config.timestamps_json {
        let manifest = Manifest {
            source: wav_path.display().to_string(),
            sample_rate,
            classifier: classifier.name(),
            segments: &written,
        };
        let path = out_dir.join(format!("{stem}_segments.json"));
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }
    Ok(())
}
