use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::{Fps, FrameIndex},
        error::{RenderError, RenderResult},
    },
    render::raster::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Target video bitrate.
    pub bitrate_kbps: u32,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> RenderResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RenderResult<()>;
    /// Called once after the last frame is pushed. The output file is complete when this returns
    /// `Ok`.
    fn end(&mut self) -> RenderResult<()>;
}

/// Factory for sinks that write a video file.
pub trait VideoEncoder: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;
    /// Create a sink that will write to `out_path`.
    fn open(&self, out_path: &Path) -> RenderResult<Box<dyn FrameSink>>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in timeline order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> RenderResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RenderResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> RenderResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Frame statistics written by [`SummaryEncoder`] in place of a video.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub config: SinkConfig,
    pub frames: u64,
}

/// Encoder that writes a small JSON [`FrameSummary`] instead of video.
///
/// Exercises the full pipeline (timeline, storage, delivery) without ffmpeg. Used for dry runs and
/// tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SummaryEncoder;

impl VideoEncoder for SummaryEncoder {
    fn name(&self) -> &str {
        "summary"
    }

    fn open(&self, out_path: &Path) -> RenderResult<Box<dyn FrameSink>> {
        Ok(Box::new(SummarySink {
            out_path: out_path.to_path_buf(),
            cfg: None,
            frames: 0,
            last_idx: None,
        }))
    }
}

struct SummarySink {
    out_path: std::path::PathBuf,
    cfg: Option<SinkConfig>,
    frames: u64,
    last_idx: Option<FrameIndex>,
}

impl FrameSink for SummarySink {
    fn begin(&mut self, cfg: SinkConfig) -> RenderResult<()> {
        self.cfg = Some(cfg);
        self.frames = 0;
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RenderResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| RenderError::encoding("summary sink not started"))?;
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(RenderError::encoding("out-of-order frame index"));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(RenderError::encoding(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> RenderResult<()> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| RenderError::encoding("summary sink not started"))?;
        let summary = FrameSummary {
            config: cfg,
            frames: self.frames,
        };
        let bytes = serde_json::to_vec_pretty(&summary)
            .map_err(|e| RenderError::encoding(format!("serialize frame summary: {e}")))?;
        std::fs::write(&self.out_path, bytes).map_err(|e| {
            RenderError::encoding(format!(
                "write frame summary '{}': {e}",
                self.out_path.display()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
