//! CPU raster painter on top of `vello_cpu`.

use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::{color::Rgba8, decode::PreparedImage, fonts::TextBlock},
    foundation::{
        core::{Affine, Canvas, Point, Rect},
        error::{RenderError, RenderResult},
    },
};

/// A rendered frame as RGBA8 pixels.
///
/// Pixel data is always **premultiplied alpha**, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    /// Premultiplied RGBA at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Image ready to be used as a paint. Cheap to clone.
#[derive(Clone)]
pub struct ImagePaint {
    paint: vello_cpu::Image,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for ImagePaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePaint")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl ImagePaint {
    pub fn from_premul(bytes: &[u8], width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width,
            height,
        })
    }

    pub fn from_prepared(image: &PreparedImage) -> RenderResult<Self> {
        Self::from_premul(&image.rgba8_premul, image.width, image.height)
    }

    pub fn from_frame(frame: &FrameRGBA) -> RenderResult<Self> {
        Self::from_premul(&frame.data, frame.width, frame.height)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// Immediate-mode painter producing one [`FrameRGBA`] at a time.
///
/// Call [`Painter::clear`] to start a frame, draw, then [`Painter::finish`]. The underlying render
/// context is reused across frames.
pub struct Painter {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl Painter {
    pub fn new(canvas: Canvas) -> RenderResult<Self> {
        let (width, height) = canvas_u16(canvas)?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(u32::from(self.width), u32::from(self.height))
    }

    /// Drop pending draw commands and flood the frame with `background`.
    pub fn clear(&mut self, background: Rgba8) {
        self.ctx.reset();
        let full = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        self.fill_rect(full, background);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.prepare(Affine::IDENTITY);
        self.ctx.set_paint(to_color(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8) {
        self.prepare(Affine::IDENTITY);
        self.ctx.set_paint(to_color(color));
        let shape = vello_cpu::kurbo::RoundedRect::from_rect(rect_to_cpu(rect), radius.max(0.0));
        self.ctx.fill_path(&shape.to_path(0.1));
    }

    /// Draw `image` with its local `(0,0,w,h)` box mapped through `transform`.
    pub fn draw_image(&mut self, image: &ImagePaint, transform: Affine, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }
        self.prepare(transform);
        self.ctx.set_paint(image.paint.clone());
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }

    /// Draw `image` scaled to fit inside `bounds` (aspect preserved, centered).
    pub fn draw_image_fit(&mut self, image: &ImagePaint, bounds: Rect) {
        let transform = fit_transform(image.canvas(), bounds);
        self.draw_image(image, transform, 1.0);
    }

    /// Draw `image` cover-fitted into the circle at `center` with `radius`, masking the rest.
    pub fn draw_image_in_circle(&mut self, image: &ImagePaint, center: Point, radius: f64) {
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        let side = w.min(h);
        if side <= 0.0 || radius <= 0.0 {
            return;
        }
        let scale = (2.0 * radius) / side;
        let transform = Affine::translate((center.x, center.y))
            * Affine::scale(scale)
            * Affine::translate((-w / 2.0, -h / 2.0));
        self.prepare(transform);
        self.ctx.set_paint(image.paint.clone());
        let circle = vello_cpu::kurbo::Circle::new((w / 2.0, h / 2.0), side / 2.0);
        self.ctx.fill_path(&circle.to_path(0.1));
    }

    /// Fill a circle outline ring; used behind agent portraits.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.prepare(Affine::IDENTITY);
        self.ctx.set_paint(to_color(color));
        let circle = vello_cpu::kurbo::Circle::new((center.x, center.y), radius.max(0.0));
        self.ctx.fill_path(&circle.to_path(0.1));
    }

    /// Draw shaped text with its layout box's top-left corner at `origin`.
    pub fn draw_text(&mut self, block: &TextBlock, origin: Point) {
        self.prepare(Affine::translate((origin.x, origin.y)));
        for line in block.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(to_color(brush));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&block.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn since the last [`Painter::clear`].
    pub fn finish(&mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }

    fn prepare(&mut self, transform: Affine) {
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
    }
}

/// Transform mapping an image of size `src` into `bounds`, aspect preserved and centered.
pub fn fit_transform(src: Canvas, bounds: Rect) -> Affine {
    let (w, h) = (f64::from(src.width).max(1.0), f64::from(src.height).max(1.0));
    let scale = (bounds.width() / w).min(bounds.height() / h).max(0.0);
    let x = bounds.x0 + (bounds.width() - w * scale) / 2.0;
    let y = bounds.y0 + (bounds.height() - h * scale) / 2.0;
    Affine::translate((x, y)) * Affine::scale(scale)
}

fn canvas_u16(canvas: Canvas) -> RenderResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| RenderError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| RenderError::validation("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(RenderError::validation("canvas must be non-empty"));
    }
    Ok((w, h))
}

fn to_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> RenderResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(Canvas::new(width, height))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(RenderError::validation("pixmap byte len mismatch"));
    }
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
