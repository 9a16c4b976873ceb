//! Pan/zoom camera motion for photo segments.
//!
//! Each photo is pre-scaled to a plate [`PLATE_SCALE`] times the frame in both dimensions. A
//! [`Motion`] maps elapsed segment time to a `(scale, dx, dy)` sample: the plate is scaled about its
//! center, then offset by `(dx, dy)` from the centered position. Scale never drops below 1 and the
//! offsets stay inside [`MAX_OFFSET_FRACTION`] of the frame, so the plate always covers the frame.

use crate::foundation::{
    core::{Affine, Canvas},
    math::lerp,
};

/// Plate size relative to the output frame.
pub const PLATE_SCALE: f64 = 1.2;

/// Largest zoom factor any variant reaches.
pub const MAX_ZOOM: f64 = 1.06;

/// Largest offset, as a fraction of the corresponding frame dimension.
pub const MAX_OFFSET_FRACTION: f64 = 0.05;

const GENTLE_ZOOM: f64 = 0.03;
const DIAGONAL_ZOOM: f64 = 0.02;

/// The closed set of camera moves, indexed 0 through 11.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KenBurns {
    ZoomIn,
    ZoomOut,
    PanLeftToRight,
    PanRightToLeft,
    PanTopToBottom,
    PanBottomToTop,
    ZoomInPanRight,
    ZoomOutPanLeft,
    ZoomInPanDown,
    ZoomOutPanUp,
    DiagonalTopLeftToBottomRight,
    DiagonalBottomRightToTopLeft,
}

impl KenBurns {
    /// Variants in index order.
    pub const ALL: [KenBurns; 12] = [
        Self::ZoomIn,
        Self::ZoomOut,
        Self::PanLeftToRight,
        Self::PanRightToLeft,
        Self::PanTopToBottom,
        Self::PanBottomToTop,
        Self::ZoomInPanRight,
        Self::ZoomOutPanLeft,
        Self::ZoomInPanDown,
        Self::ZoomOutPanUp,
        Self::DiagonalTopLeftToBottomRight,
        Self::DiagonalBottomRightToTopLeft,
    ];

    /// Variant for the photo at slide `position`, cycling through all twelve.
    pub fn for_position(position: usize) -> Self {
        Self::ALL[position % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Keyframes `(scale, x, y)` at progress 0 and 1.
    ///
    /// `x`/`y` are the position of the viewing window on the plate in units of the offset bound,
    /// `-1` meaning left/top and `+1` right/bottom. The plate offset is the negated window position.
    fn keyframes(self) -> [(f64, f64, f64); 2] {
        const Z: f64 = MAX_ZOOM;
        const G: f64 = 1.0 + GENTLE_ZOOM;
        const D: f64 = 1.0 + DIAGONAL_ZOOM;
        match self {
            Self::ZoomIn => [(1.0, 0.0, 0.0), (Z, 0.0, 0.0)],
            Self::ZoomOut => [(Z, 0.0, 0.0), (1.0, 0.0, 0.0)],
            Self::PanLeftToRight => [(1.0, -1.0, 0.0), (1.0, 1.0, 0.0)],
            Self::PanRightToLeft => [(1.0, 1.0, 0.0), (1.0, -1.0, 0.0)],
            Self::PanTopToBottom => [(1.0, 0.0, -1.0), (1.0, 0.0, 1.0)],
            Self::PanBottomToTop => [(1.0, 0.0, 1.0), (1.0, 0.0, -1.0)],
            Self::ZoomInPanRight => [(1.0, -0.5, 0.0), (G, 0.5, 0.0)],
            Self::ZoomOutPanLeft => [(G, 0.5, 0.0), (1.0, -0.5, 0.0)],
            Self::ZoomInPanDown => [(1.0, 0.0, -0.5), (G, 0.0, 0.5)],
            Self::ZoomOutPanUp => [(G, 0.0, 0.5), (1.0, 0.0, -0.5)],
            Self::DiagonalTopLeftToBottomRight => [(1.0, -1.0, -1.0), (D, 1.0, 1.0)],
            Self::DiagonalBottomRightToTopLeft => [(D, 1.0, 1.0), (1.0, -1.0, -1.0)],
        }
    }
}

/// One sample of a motion: plate scale and offset from the centered position, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub scale: f64,
    pub dx: f64,
    pub dy: f64,
}

/// A camera move bound to a segment duration and frame size. Pure data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub effect: KenBurns,
    pub duration_secs: f64,
    pub frame: Canvas,
}

impl Motion {
    pub fn new(effect: KenBurns, duration_secs: f64, frame: Canvas) -> Self {
        Self {
            effect,
            duration_secs,
            frame,
        }
    }

    /// Sample at `t_secs` into the segment; `t` is clamped to `[0, duration]`.
    pub fn sample(&self, t_secs: f64) -> MotionSample {
        let p = if self.duration_secs > 0.0 {
            t_secs / self.duration_secs
        } else {
            1.0
        };
        let [(s0, x0, y0), (s1, x1, y1)] = self.effect.keyframes();
        let bound_x = MAX_OFFSET_FRACTION * f64::from(self.frame.width);
        let bound_y = MAX_OFFSET_FRACTION * f64::from(self.frame.height);
        MotionSample {
            scale: lerp(s0, s1, p),
            dx: -lerp(x0, x1, p) * bound_x,
            dy: -lerp(y0, y1, p) * bound_y,
        }
    }

    /// Plate-to-frame transform at `t_secs` for a plate of size `plate`.
    pub fn transform(&self, t_secs: f64, plate: Canvas) -> Affine {
        let MotionSample { scale, dx, dy } = self.sample(t_secs);
        Affine::translate((
            f64::from(self.frame.width) / 2.0 + dx,
            f64::from(self.frame.height) / 2.0 + dy,
        )) * Affine::scale(scale)
            * Affine::translate((
                -f64::from(plate.width) / 2.0,
                -f64::from(plate.height) / 2.0,
            ))
    }
}

/// Stateless factory for per-photo motions.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectEngine;

impl EffectEngine {
    /// Plate size for a given output frame.
    pub fn plate_for(frame: Canvas) -> Canvas {
        frame.scaled(PLATE_SCALE)
    }

    /// Motion for the photo at slide `position`.
    pub fn motion_for(position: usize, duration_secs: f64, frame: Canvas) -> Motion {
        Motion::new(KenBurns::for_position(position), duration_secs, frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ken_burns.rs"]
mod tests;
