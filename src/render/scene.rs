//! Intro and outro cards.
//!
//! Both are static white frames laid out with percentages of the frame, so one layout serves every
//! resolution. Portrait frames stack the agent block vertically; landscape and square frames put the
//! details beside the portrait.

use crate::{
    assets::{
        color::Rgba8,
        fonts::{TextBlock, TextKit, TextStyle},
    },
    foundation::{
        core::{Canvas, Point, Rect},
        error::RenderResult,
    },
    model::domain::Orientation,
    render::raster::{FrameRGBA, ImagePaint, Painter},
};

/// Literal marker shown between the logo and the title.
pub const PRESENTS: &str = "presents";

/// Outro headline.
pub const CONTACT_HEADLINE: &str = "Contact";

/// A static frame with the time it stays on screen.
#[derive(Clone, Debug)]
pub struct Bookend {
    pub frame: FrameRGBA,
    pub duration_secs: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct IntroCard<'a> {
    pub title: &'a str,
    pub logo: Option<&'a ImagePaint>,
}

#[derive(Clone, Copy, Debug)]
pub struct AgentCard<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub photo: Option<&'a ImagePaint>,
}

#[derive(Clone, Copy, Debug)]
pub struct OutroCard<'a> {
    pub agent: Option<AgentCard<'a>>,
    pub website: &'a str,
    pub logo: Option<&'a ImagePaint>,
    pub accent: Rgba8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntroLayout {
    pub logo_box: Rect,
    pub presents_center_y: f64,
    pub presents_size_px: f64,
    pub title_gap: f64,
    pub title_size_px: f64,
    pub title_wrap_px: f64,
}

impl IntroLayout {
    pub fn compute(canvas: Canvas, orientation: Orientation) -> Self {
        let (w, h) = dims(canvas);
        let unit = w.min(h);
        let (logo_box, presents_y) = match orientation {
            Orientation::Horizontal => (
                Rect::from_center_size((w / 2.0, 0.23 * h), (0.40 * w, 0.22 * h)),
                0.48 * h,
            ),
            Orientation::Vertical => (
                Rect::from_center_size((w / 2.0, 0.28 * h), (0.60 * w, 0.16 * h)),
                0.45 * h,
            ),
        };
        Self {
            logo_box,
            presents_center_y: presents_y,
            presents_size_px: 0.05 * unit,
            title_gap: 0.03 * h,
            title_size_px: 0.11 * unit,
            title_wrap_px: 0.85 * w,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutroLayout {
    pub headline_top: f64,
    pub headline_size_px: f64,
    pub portrait_center: Point,
    pub portrait_radius: f64,
    /// Left edge of the details column, `None` when details are centered.
    pub details_x: Option<f64>,
    /// Vertical center of the details block (beside) or its top edge (stacked).
    pub details_y: f64,
    pub name_size_px: f64,
    pub line_size_px: f64,
    pub line_gap: f64,
    pub website_center_y: f64,
    pub website_size_px: f64,
    pub logo_box: Rect,
}

impl OutroLayout {
    pub fn compute(canvas: Canvas, orientation: Orientation) -> Self {
        let (w, h) = dims(canvas);
        let unit = w.min(h);
        let common = |portrait_center, portrait_radius, details_x, details_y, logo_box| Self {
            headline_top: 0.08 * h,
            headline_size_px: 0.09 * unit,
            portrait_center,
            portrait_radius,
            details_x,
            details_y,
            name_size_px: 0.06 * unit,
            line_size_px: 0.045 * unit,
            line_gap: 0.02 * h,
            website_center_y: 0.92 * h,
            website_size_px: 0.04 * unit,
            logo_box,
        };
        match orientation {
            Orientation::Horizontal => common(
                Point::new(0.30 * w, 0.50 * h),
                0.17 * h,
                Some(0.48 * w),
                0.50 * h,
                Rect::new(0.78 * w, 0.70 * h, 0.94 * w, 0.84 * h),
            ),
            Orientation::Vertical => {
                let radius = 0.20 * w;
                common(
                    Point::new(0.5 * w, 0.34 * h),
                    radius,
                    None,
                    0.34 * h + radius + 0.04 * h,
                    Rect::new(0.30 * w, 0.74 * h, 0.70 * w, 0.84 * h),
                )
            }
        }
    }
}

/// Builds the bookend frames for one render.
pub struct SceneComposer<'k> {
    text: &'k mut TextKit,
    canvas: Canvas,
    orientation: Orientation,
    painter: Painter,
}

impl<'k> SceneComposer<'k> {
    pub fn new(text: &'k mut TextKit, canvas: Canvas, orientation: Orientation) -> RenderResult<Self> {
        Ok(Self {
            text,
            canvas,
            orientation,
            painter: Painter::new(canvas)?,
        })
    }

    #[tracing::instrument(skip_all, fields(title = card.title))]
    pub fn intro(&mut self, card: &IntroCard<'_>, duration_secs: f64) -> RenderResult<Bookend> {
        let layout = IntroLayout::compute(self.canvas, self.orientation);
        let (w, _) = dims(self.canvas);
        self.painter.clear(Rgba8::WHITE);

        if let Some(logo) = card.logo {
            self.painter.draw_image_fit(logo, layout.logo_box);
        }

        let presents = self
            .text
            .layout(PRESENTS, TextStyle::new(layout.presents_size_px, Rgba8::MUTED))?;
        let mut title_top = layout.presents_center_y + layout.presents_size_px / 2.0 + layout.title_gap;
        if let Some(block) = presents {
            let top = layout.presents_center_y - block.height() / 2.0;
            self.painter
                .draw_text(&block, Point::new((w - block.width()) / 2.0, top));
            title_top = top + block.height() + layout.title_gap;
        }

        let title = self.text.layout(
            card.title,
            TextStyle::new(layout.title_size_px, Rgba8::INK)
                .bold()
                .wrap_at(layout.title_wrap_px),
        )?;
        if let Some(block) = title {
            self.painter
                .draw_text(&block, Point::new((w - block.width()) / 2.0, title_top));
        }

        Ok(Bookend {
            frame: self.painter.finish(),
            duration_secs,
        })
    }

    #[tracing::instrument(skip_all, fields(has_agent = card.agent.is_some()))]
    pub fn outro(&mut self, card: &OutroCard<'_>, duration_secs: f64) -> RenderResult<Bookend> {
        let layout = OutroLayout::compute(self.canvas, self.orientation);
        let (w, _) = dims(self.canvas);
        self.painter.clear(Rgba8::WHITE);

        let headline = self.text.layout(
            CONTACT_HEADLINE,
            TextStyle::new(layout.headline_size_px, card.accent).bold(),
        )?;
        if let Some(block) = headline {
            self.painter.draw_text(
                &block,
                Point::new((w - block.width()) / 2.0, layout.headline_top),
            );
        }

        if let Some(agent) = &card.agent {
            self.draw_agent(agent, &layout, card.accent)?;
        }

        let website = self.text.layout(
            card.website,
            TextStyle::new(layout.website_size_px, Rgba8::MUTED),
        )?;
        if let Some(block) = website {
            let top = layout.website_center_y - block.height() / 2.0;
            self.painter
                .draw_text(&block, Point::new((w - block.width()) / 2.0, top));
        }

        if let Some(logo) = card.logo {
            self.painter.draw_image_fit(logo, layout.logo_box);
        }

        Ok(Bookend {
            frame: self.painter.finish(),
            duration_secs,
        })
    }

    fn draw_agent(
        &mut self,
        agent: &AgentCard<'_>,
        layout: &OutroLayout,
        accent: Rgba8,
    ) -> RenderResult<()> {
        let (w, _) = dims(self.canvas);
        if let Some(photo) = agent.photo {
            self.painter.fill_circle(
                layout.portrait_center,
                layout.portrait_radius * 1.04,
                accent,
            );
            self.painter
                .draw_image_in_circle(photo, layout.portrait_center, layout.portrait_radius);
        }

        let mut lines: Vec<TextBlock> = Vec::with_capacity(3);
        let wrap = match layout.details_x {
            Some(x) => 0.96 * w - x,
            None => 0.9 * w,
        };
        let name_style = TextStyle::new(layout.name_size_px, Rgba8::INK)
            .bold()
            .wrap_at(wrap);
        let line_style = TextStyle::new(layout.line_size_px, Rgba8::MUTED).wrap_at(wrap);
        for (text, style) in [
            (agent.name, name_style),
            (agent.phone, line_style),
            (agent.email, line_style),
        ] {
            if let Some(block) = self.text.layout(text, style)? {
                lines.push(block);
            }
        }
        if lines.is_empty() {
            return Ok(());
        }

        let total: f64 = lines.iter().map(TextBlock::height).sum::<f64>()
            + layout.line_gap * (lines.len() - 1) as f64;
        // Beside the portrait the block is centered on `details_y`; stacked it starts there.
        let (beside, mut y) = match layout.details_x {
            Some(_) if agent.photo.is_some() => (true, layout.details_y - total / 2.0),
            Some(_) => (false, layout.details_y - total / 2.0),
            None => (false, layout.details_y),
        };
        for block in &lines {
            let x = match layout.details_x {
                Some(x) if beside => x,
                _ => (w - block.width()) / 2.0,
            };
            self.painter.draw_text(block, Point::new(x, y));
            y += block.height() + layout.line_gap;
        }
        Ok(())
    }
}

fn dims(canvas: Canvas) -> (f64, f64) {
    (f64::from(canvas.width), f64::from(canvas.height))
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
