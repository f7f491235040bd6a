use super::defaults::{CLASSIFIER_FRAME_MS, MAX_AGGRESSIVENESS, MAX_FRAME_MS, MAX_PADDING_MS};
use super::{Aggressiveness, AppConfig, ClassifierKind, SegmenterConfig};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::{fs, path::Path};

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize the ffmpeg path.
    pub fn validate(&mut self) -> Result<()> {
        if self.aggressiveness > MAX_AGGRESSIVENESS {
            bail!(
                "--aggressiveness must be between 0 and {MAX_AGGRESSIVENESS}, got {}",
                self.aggressiveness
            );
        }
        if self.frame_ms == 0 || self.frame_ms > MAX_FRAME_MS {
            bail!(
                "--frame-ms must be between 1 and {MAX_FRAME_MS}, got {}",
                self.frame_ms
            );
        }
        if matches!(self.classifier, ClassifierKind::Earshot)
            && !CLASSIFIER_FRAME_MS.contains(&self.frame_ms)
        {
            bail!(
                "--frame-ms must be 10, 20 or 30 with the earshot classifier, got {}",
                self.frame_ms
            );
        }
        if self.padding_ms < self.frame_ms || self.padding_ms > MAX_PADDING_MS {
            bail!(
                "--padding-ms must be between --frame-ms ({}) and {MAX_PADDING_MS}, got {}",
                self.frame_ms,
                self.padding_ms
            );
        }
        if !(-120.0..=0.0).contains(&self.energy_threshold_db) {
            bail!(
                "--energy-threshold-db must be between -120.0 and 0.0 dB, got {}",
                self.energy_threshold_db
            );
        }

        #[cfg(not(feature = "vad_earshot"))]
        if matches!(self.classifier, ClassifierKind::Earshot) {
            bail!("--classifier earshot requires building with the 'vad_earshot' feature");
        }

        self.ffmpeg_cmd = sanitize_binary(&self.ffmpeg_cmd, "--ffmpeg-cmd", &["ffmpeg", "avconv"])?;
        Ok(())
    }

    /// Snapshot the current CLI-controlled segmentation settings for
    /// downstream consumers.
    pub fn segmenter_config(&self) -> SegmenterConfig {
        SegmenterConfig {
            frame_ms: self.frame_ms,
            padding_ms: self.padding_ms,
            aggressiveness: Aggressiveness::from_level(self.aggressiveness)
                .unwrap_or(Aggressiveness::VeryAggressive),
            classifier: self.classifier,
            energy_threshold_db: self.energy_threshold_db,
        }
    }
}

/// Allow either a known binary name or an existing executable path.
fn sanitize_binary(value: &str, flag: &str, allowlist: &[&str]) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }
    if let Some(allowed) = allowlist
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
    {
        return Ok((*allowed).to_string());
    }

    let path = Path::new(trimmed);
    if path.is_absolute() || trimmed.contains(std::path::MAIN_SEPARATOR) {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {flag} '{trimmed}'"))?;
        let metadata = fs::metadata(&canonical)
            .with_context(|| format!("failed to inspect {flag} '{}'", canonical.display()))?;
        if !metadata.is_file() {
            bail!("{flag} '{}' is not a file", canonical.display());
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            if mode & 0o111 == 0 {
                bail!(
                    "{flag} '{}' exists but is not executable (mode {:o})",
                    canonical.display(),
                    mode
                );
            }
        }
        return canonical
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("{flag} must be valid UTF-8"));
    }

    bail!("{flag} must be one of {allowlist:?} or an existing binary path");
}
