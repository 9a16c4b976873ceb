//! Banner, price and caption overlays for photo segments.
//!
//! Overlays are drawn onto the oversized photo plate before camera motion is applied. Every
//! position and size is a fraction of the *window*, the frame-sized rectangle centered on the
//! plate, so the same layout serves all resolutions. Margins leave room for the largest pan/zoom
//! displacement so badges never drift out of frame.

use crate::{
    assets::{
        color::Rgba8,
        fonts::{TextBlock, TextKit, TextStyle},
    },
    foundation::{
        core::{Point, Rect},
        error::RenderResult,
    },
    model::domain::{Orientation, TextAlign},
    render::raster::{FrameRGBA, ImagePaint, Painter},
};

/// Edge margin as a fraction of the window dimension.
const MARGIN: f64 = 0.08;

/// Text shown on one photo. `None` or blank entries are omitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayText<'a> {
    pub banner: Option<&'a str>,
    pub price: Option<&'a str>,
    pub caption: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayStyle {
    pub orientation: Orientation,
    pub accent: Rgba8,
    pub align: TextAlign,
}

/// Where a badge attaches relative to its own box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    TopLeft(Point),
    TopRight(Point),
    TopCenter(Point),
    BottomCenter(Point),
}

impl Anchor {
    /// Box of `size` placed at this anchor.
    pub fn place(self, width: f64, height: f64) -> Rect {
        let (x, y) = match self {
            Self::TopLeft(p) => (p.x, p.y),
            Self::TopRight(p) => (p.x - width, p.y),
            Self::TopCenter(p) => (p.x - width / 2.0, p.y),
            Self::BottomCenter(p) => (p.x - width / 2.0, p.y - height),
        };
        Rect::new(x, y, x + width, y + height)
    }
}

/// Resolved overlay geometry for one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayout {
    pub banner_anchor: Anchor,
    pub banner_size_px: f64,
    pub price_anchor: Anchor,
    pub price_size_px: f64,
    /// Backing band for the caption. Spans the full plate width.
    pub caption_band: Rect,
    /// Where caption text is centered vertically, inside the band.
    pub caption_center_y: f64,
    pub caption_size_px: f64,
    pub caption_band_color: Rgba8,
    /// Horizontal extent caption text may occupy.
    pub caption_text_span: (f64, f64),
}

impl OverlayLayout {
    /// Geometry for `window` within a plate `plate_width` pixels wide.
    pub fn compute(window: Rect, plate_width: f64, orientation: Orientation) -> Self {
        let (w, h) = (window.width(), window.height());
        let unit = w.min(h);
        let cx = window.center().x;
        let text_span = (window.x0 + MARGIN * w, window.x1 - MARGIN * w);

        match orientation {
            Orientation::Horizontal => {
                let band = Rect::new(0.0, window.y1 - 0.18 * h, plate_width, window.y1);
                Self {
                    banner_anchor: Anchor::TopLeft(Point::new(
                        window.x0 + MARGIN * w,
                        window.y0 + MARGIN * h,
                    )),
                    banner_size_px: 0.055 * unit,
                    price_anchor: Anchor::TopRight(Point::new(
                        window.x1 - MARGIN * w,
                        window.y0 + MARGIN * h,
                    )),
                    price_size_px: 0.06 * unit,
                    caption_band: band,
                    caption_center_y: window.y1 - 0.18 * h / 2.0 - 0.02 * h,
                    caption_size_px: 0.05 * unit,
                    caption_band_color: Rgba8::INK,
                    caption_text_span: text_span,
                }
            }
            Orientation::Vertical => {
                let band = Rect::new(0.0, window.y1 - 0.26 * h, plate_width, window.y1 - 0.12 * h);
                Self {
                    banner_anchor: Anchor::TopCenter(Point::new(cx, window.y0 + MARGIN * h)),
                    banner_size_px: 0.065 * unit,
                    price_anchor: Anchor::BottomCenter(Point::new(cx, band.y0 - 0.02 * h)),
                    price_size_px: 0.075 * unit,
                    caption_band: band,
                    caption_center_y: band.center().y,
                    caption_size_px: 0.06 * unit,
                    caption_band_color: Rgba8::BLACK.with_alpha(150),
                    caption_text_span: text_span,
                }
            }
        }
    }
}

/// Laid-out overlays for one photo, ready to paint onto any plate of the planned size.
///
/// Holds shaped text and geometry only, so it stays small while the plate pixels are rebuilt
/// on demand.
#[derive(Default)]
pub struct OverlayPlan {
    caption: Option<CaptionItem>,
    badges: Vec<Badge>,
}

struct CaptionItem {
    band: Rect,
    band_color: Rgba8,
    block: TextBlock,
    origin: Point,
}

struct Badge {
    block: TextBlock,
    anchor: Anchor,
    fill: Rgba8,
}

impl OverlayPlan {
    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.badges.is_empty()
    }

    pub fn paint(&self, painter: &mut Painter) {
        if let Some(caption) = &self.caption {
            painter.fill_rect(caption.band, caption.band_color);
            painter.draw_text(&caption.block, caption.origin);
        }
        for badge in &self.badges {
            draw_badge(painter, &badge.block, badge.anchor, badge.fill);
        }
    }

    /// Draw `base` with these overlays into a new plate-sized frame.
    pub fn onto(&self, base: &ImagePaint) -> RenderResult<FrameRGBA> {
        let mut painter = Painter::new(base.canvas())?;
        painter.clear(Rgba8::BLACK);
        painter.draw_image(base, crate::foundation::core::Affine::IDENTITY, 1.0);
        self.paint(&mut painter);
        Ok(painter.finish())
    }
}

impl std::fmt::Debug for OverlayPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayPlan")
            .field("caption", &self.caption.is_some())
            .field("badges", &self.badges.len())
            .finish()
    }
}

/// Lays out overlays for photo plates.
pub struct OverlayRenderer<'k> {
    text: &'k mut TextKit,
}

impl<'k> OverlayRenderer<'k> {
    pub fn new(text: &'k mut TextKit) -> Self {
        Self { text }
    }

    /// Shape and place the overlays for a plate `plate_width` pixels wide.
    ///
    /// `window` is the frame-sized area of the plate the overlays are laid out against.
    pub fn plan(
        &mut self,
        window: Rect,
        plate_width: f64,
        content: &OverlayText<'_>,
        style: &OverlayStyle,
    ) -> RenderResult<OverlayPlan> {
        let layout = OverlayLayout::compute(window, plate_width, style.orientation);
        let mut plan = OverlayPlan::default();

        if let Some(caption) = content.caption {
            let (x0, x1) = layout.caption_text_span;
            let block = self.text.layout(
                caption,
                TextStyle::new(layout.caption_size_px, Rgba8::WHITE).wrap_at(x1 - x0),
            )?;
            if let Some(block) = block {
                let origin = Point::new(
                    aligned_x(&block, x0, x1, style.align),
                    layout.caption_center_y - block.height() / 2.0,
                );
                plan.caption = Some(CaptionItem {
                    band: layout.caption_band,
                    band_color: layout.caption_band_color,
                    block,
                    origin,
                });
            }
        }

        if let Some(banner) = content.banner {
            let fg = style.accent.contrasting_text();
            let block = self
                .text
                .layout(banner, TextStyle::new(layout.banner_size_px, fg).bold())?;
            if let Some(block) = block {
                plan.badges.push(Badge {
                    block,
                    anchor: layout.banner_anchor,
                    fill: style.accent,
                });
            }
        }

        if let Some(price) = content.price {
            let block = self
                .text
                .layout(price, TextStyle::new(layout.price_size_px, style.accent).bold())?;
            if let Some(block) = block {
                plan.badges.push(Badge {
                    block,
                    anchor: layout.price_anchor,
                    fill: Rgba8::WHITE.with_alpha(235),
                });
            }
        }

        Ok(plan)
    }

    /// Draw `base` with overlays into a new plate-sized frame.
    pub fn render(
        &mut self,
        base: &ImagePaint,
        window: Rect,
        content: &OverlayText<'_>,
        style: &OverlayStyle,
    ) -> RenderResult<FrameRGBA> {
        self.plan(window, f64::from(base.width), content, style)?
            .onto(base)
    }
}

fn draw_badge(painter: &mut Painter, block: &TextBlock, anchor: Anchor, fill: Rgba8) {
    let size = block.height().max(1.0);
    let (pad_x, pad_y) = (0.5 * size, 0.25 * size);
    let rect = anchor.place(block.width() + 2.0 * pad_x, block.height() + 2.0 * pad_y);
    painter.fill_rounded_rect(rect, 0.2 * size, fill);
    painter.draw_text(block, Point::new(rect.x0 + pad_x, rect.y0 + pad_y));
}

pub(crate) fn aligned_x(block: &TextBlock, x0: f64, x1: f64, align: TextAlign) -> f64 {
    match align {
        TextAlign::Left => x0,
        TextAlign::Center => x0 + ((x1 - x0) - block.width()).max(0.0) / 2.0,
        TextAlign::Right => (x1 - block.width()).max(x0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
