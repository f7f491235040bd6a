//! FFmpeg transcoding of arbitrary container inputs.
//!
//! Anything that is not already a `.wav` is converted beside the source file
//! to mono 16 kHz WAV before segmentation. The conversion is delegated to an
//! external ffmpeg binary invoked with a fixed argument vector (never through
//! a shell).

use crate::config::TRANSCODE_SAMPLE_RATE;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// True when `path` already carries a `.wav` extension (case-insensitive).
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Ensures `input` is available as a WAV file, transcoding when necessary.
///
/// `.wav` inputs are returned untouched; anything else is converted to a
/// sibling file with the extension swapped for `.wav`, overwriting a previous
/// conversion if one exists.
pub fn ensure_wav(ffmpeg_cmd: &str, input: &Path) -> Result<PathBuf> {
    if is_wav(input) {
        return Ok(input.to_path_buf());
    }
    let target = input.with_extension("wav");
    info!(
        "transcoding '{}' to mono {} Hz '{}'",
        input.display(),
        TRANSCODE_SAMPLE_RATE,
        target.display()
    );
    let output = Command::new(ffmpeg_cmd)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-ac", "1", "-ar"])
        .arg(TRANSCODE_SAMPLE_RATE.to_string())
        .args(["-strict", "-2"])
        .arg(&target)
        .output()
        .with_context(|| format!("failed to launch '{ffmpeg_cmd}'"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "'{ffmpeg_cmd}' exited with {} while transcoding '{}': {}",
            output.status,
            input.display(),
            stderr.trim_end()
        );
    }
    Ok(target)
}
