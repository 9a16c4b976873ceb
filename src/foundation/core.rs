use crate::foundation::error::{RenderError, RenderResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Zero-based frame position on a rendered timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> RenderResult<Self> {
        if den == 0 {
            return Err(RenderError::validation("fps den must be > 0"));
        }
        if num == 0 {
            return Err(RenderError::validation("fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer frame rate (`den == 1`).
    pub const fn whole(num: u32) -> Self {
        Self { num, den: 1 }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Number of frames covering `secs`, rounded to the nearest whole frame.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_vertical(self) -> bool {
        self.height > self.width
    }

    /// `"WxH"` as reported to API callers.
    pub fn resolution_label(self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Canvas grown by `factor` in each dimension, rounded up to even pixel counts.
    pub fn scaled(self, factor: f64) -> Self {
        fn even(v: f64) -> u32 {
            let v = v.ceil().max(2.0) as u32;
            v + (v % 2)
        }
        Self {
            width: even(f64::from(self.width) * factor),
            height: even(f64::from(self.height) * factor),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
