use std::sync::Arc;

use crate::foundation::{
    core::Canvas,
    error::{RenderError, RenderResult},
};

/// Raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// Largest edge a rasterized SVG logo may have.
const MAX_SVG_EDGE: u32 = 4096;

/// Decode an encoded raster image (PNG, JPEG, WebP, ...) at its native size.
pub fn decode_image(bytes: &[u8]) -> RenderResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RenderError::resource(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(premultiplied(width, height, rgba.into_raw()))
}

/// Decode a photo and cover-fit it to `target`: scaled to fill, then center-cropped.
pub fn decode_cover(bytes: &[u8], target: Canvas) -> RenderResult<PreparedImage> {
    if target.width == 0 || target.height == 0 {
        return Err(RenderError::validation("cover target must be non-empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| RenderError::resource(format!("decode image from memory: {e}")))?;
    if dyn_img.width() == 0 || dyn_img.height() == 0 {
        return Err(RenderError::resource("image has zero size"));
    }
    let filled = dyn_img.resize_to_fill(
        target.width,
        target.height,
        image::imageops::FilterType::Triangle,
    );
    let rgba = filled.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(premultiplied(width, height, rgba.into_raw()))
}

/// Decode a logo, which may be a raster image or an SVG document.
///
/// SVGs are rasterized so that their longer edge is `target_edge` pixels.
pub fn decode_logo(bytes: &[u8], target_edge: u32) -> RenderResult<PreparedImage> {
    if !looks_like_svg(bytes) {
        return decode_image(bytes);
    }
    let tree = parse_svg(bytes)?;
    let (width, height) = svg_fit_size(&tree, target_edge)?;
    let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub fn parse_svg(bytes: &[u8]) -> RenderResult<usvg::Tree> {
    let opts = usvg::Options::default();
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| RenderError::resource(format!("parse svg tree: {e}")))
}

/// Sniff for an SVG document (optionally behind an XML prolog or BOM).
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Raster size for an SVG scaled so its longer edge equals `target_edge`.
pub fn svg_fit_size(tree: &usvg::Tree, target_edge: u32) -> RenderResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(RenderError::resource("svg has invalid width/height"));
    }
    let edge = target_edge.clamp(1, MAX_SVG_EDGE) as f32;
    let scale = edge / w.max(h);
    Ok((
        ((w * scale).round() as u32).max(1),
        ((h * scale).round() as u32).max(1),
    ))
}

pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> RenderResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RenderError::resource("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

fn premultiplied(width: u32, height: u32, mut rgba: Vec<u8>) -> PreparedImage {
    premultiply_rgba8_in_place(&mut rgba);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba),
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = crate::foundation::math::mul_div255_u8(u16::from(*c), u16::from(a));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
