pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Clamp scalar value to normalized range `[0, 1]`.
#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Linearly interpolate between `a` and `b` with clamped parameter `t`.
///
/// Exact at both endpoints.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let t = clamp01(t);
    (a * (1.0 - t)) + (b * t)
}
