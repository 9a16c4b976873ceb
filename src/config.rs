//! Pipeline configuration.
//!
//! Layering: built-in defaults, then an optional JSON file, then `REELS_*` environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    encode::ffmpeg::FfmpegSettings,
    foundation::error::{RenderError, RenderResult},
    storage::blob::DEFAULT_CHUNK_BYTES,
};

/// How long each part of the video stays on screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub intro_secs: f64,
    pub photo_secs: f64,
    pub outro_secs: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            intro_secs: 5.0,
            photo_secs: 4.0,
            outro_secs: 5.0,
        }
    }
}

impl Timing {
    /// Expected video length for `photos` usable photos.
    pub fn total_secs(&self, photos: usize) -> f64 {
        self.intro_secs + (photos as f64) * self.photo_secs + self.outro_secs
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// `ffmpeg` binary name or path.
    pub ffmpeg: PathBuf,
    /// libx264 preset.
    pub x264_preset: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            x264_preset: "medium".to_string(),
        }
    }
}

impl EncoderConfig {
    pub fn ffmpeg_settings(&self) -> FfmpegSettings {
        FfmpegSettings {
            binary: self.ffmpeg.clone(),
            preset: self.x264_preset.clone(),
            ..FfmpegSettings::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub timing: Timing,
    /// Chunk size for streamed reads.
    pub stream_chunk_bytes: usize,
    /// Website line on the outro card.
    pub company_website: String,
    /// Extra font directories, searched before the system ones.
    pub font_dirs: Vec<PathBuf>,
    pub encoder: EncoderConfig,
    /// Parent for per-render temporary workspaces; the OS temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
    /// Render pool size; the number of CPUs when unset.
    pub workers: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            stream_chunk_bytes: DEFAULT_CHUNK_BYTES,
            company_website: "www.estate-reels.com".to_string(),
            font_dirs: Vec::new(),
            encoder: EncoderConfig::default(),
            scratch_dir: None,
            workers: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults, overlaid with `path` (if given) and then the process environment.
    pub fn load(path: Option<&Path>) -> RenderResult<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> RenderResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            RenderError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            RenderError::validation(format!("invalid config '{}': {e}", path.display()))
        })
    }

    /// Apply `REELS_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> RenderResult<()> {
        fn parsed<T: std::str::FromStr>(key: &str, raw: &str) -> RenderResult<T> {
            raw.trim()
                .parse()
                .map_err(|_| RenderError::validation(format!("invalid value for {key}: '{raw}'")))
        }
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("REELS_INTRO_SECS") {
            self.timing.intro_secs = parsed("REELS_INTRO_SECS", &v)?;
        }
        if let Some(v) = get("REELS_PHOTO_SECS") {
            self.timing.photo_secs = parsed("REELS_PHOTO_SECS", &v)?;
        }
        if let Some(v) = get("REELS_OUTRO_SECS") {
            self.timing.outro_secs = parsed("REELS_OUTRO_SECS", &v)?;
        }
        if let Some(v) = get("REELS_STREAM_CHUNK_BYTES") {
            self.stream_chunk_bytes = parsed("REELS_STREAM_CHUNK_BYTES", &v)?;
        }
        if let Some(v) = get("REELS_FONT_DIRS") {
            self.font_dirs = std::env::split_paths(&v).collect();
        }
        if let Some(v) = get("REELS_FFMPEG") {
            self.encoder.ffmpeg = PathBuf::from(v);
        }
        if let Some(v) = get("REELS_X264_PRESET") {
            self.encoder.x264_preset = v.trim().to_string();
        }
        if let Some(v) = get("REELS_SCRATCH_DIR") {
            self.scratch_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("REELS_WORKERS") {
            self.workers = Some(parsed("REELS_WORKERS", &v)?);
        }
        if let Some(v) = get("REELS_COMPANY_WEBSITE") {
            self.company_website = v.trim().to_string();
        }
        Ok(())
    }

    pub fn validate(&self) -> RenderResult<()> {
        let Timing {
            intro_secs,
            photo_secs,
            outro_secs,
        } = self.timing;
        for (name, secs) in [
            ("intro_secs", intro_secs),
            ("photo_secs", photo_secs),
            ("outro_secs", outro_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(RenderError::validation(format!(
                    "{name} must be finite and > 0 (got {secs})"
                )));
            }
        }
        if self.stream_chunk_bytes == 0 {
            return Err(RenderError::validation("stream_chunk_bytes must be > 0"));
        }
        if self.workers == Some(0) {
            return Err(RenderError::validation("workers must be > 0 when set"));
        }
        if self.encoder.x264_preset.is_empty() {
            return Err(RenderError::validation("x264_preset must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
