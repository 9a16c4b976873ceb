//! Quality tier → output geometry, frame rate and bitrate.

use serde::Serialize;

use crate::{
    foundation::core::{Canvas, Fps},
    model::domain::OutputFormat,
    plan::gate::QualityTier,
};

/// Everything the encoder needs to know about one tier/format pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EncodeProfile {
    pub tier: QualityTier,
    pub format: OutputFormat,
    pub canvas: Canvas,
    pub fps: Fps,
    pub bitrate_kbps: u32,
}

impl EncodeProfile {
    pub fn resolve(tier: QualityTier, format: OutputFormat) -> Self {
        // (long edge, short edge, fps, kbps)
        let (long, short, fps, bitrate_kbps) = match tier {
            QualityTier::Sd => (854, 480, 24, 1_000),
            QualityTier::Hd => (1280, 720, 30, 2_500),
            QualityTier::FullHd => (1920, 1080, 30, 5_000),
            QualityTier::UltraHd => (3840, 2160, 30, 15_000),
        };
        let canvas = match format {
            OutputFormat::Landscape => Canvas::new(long, short),
            OutputFormat::Portrait => Canvas::new(short, long),
            OutputFormat::Square => Canvas::new(short, short),
        };
        Self {
            tier,
            format,
            canvas,
            fps: Fps::whole(fps),
            bitrate_kbps,
        }
    }
}
