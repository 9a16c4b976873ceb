//! ClipAssembler: intro, one animated segment per usable photo, outro.

use std::sync::Arc;

use crate::{
    assets::{
        color::Rgba8,
        decode::{decode_cover, decode_logo},
        fonts::TextKit,
    },
    config::Timing,
    effects::ken_burns::{EffectEngine, Motion},
    encode::{
        profile::EncodeProfile,
        sink::{FrameSink, SinkConfig},
    },
    foundation::{
        cancel::CancelToken,
        core::{Canvas, Fps, FrameIndex, Rect},
        error::{RenderError, RenderResult},
    },
    model::domain::{Agent, BrandingProfile, ImageRef, Orientation, Project, non_empty},
    render::{
        overlay::{OverlayPlan, OverlayRenderer, OverlayStyle, OverlayText},
        raster::{FrameRGBA, ImagePaint, Painter},
        scene::{AgentCard, IntroCard, OutroCard, SceneComposer},
    },
};

/// One contiguous run of frames.
#[derive(Clone, Debug)]
pub enum Segment {
    /// A static frame repeated `frames` times.
    Still { frame: FrameRGBA, frames: u64 },
    /// An overlaid photo plate moved by `motion`.
    Motion {
        photo_id: String,
        plate: PlateSource,
        motion: Motion,
        frames: u64,
    },
}

/// Everything needed to rebuild one photo plate: the encoded photo and its laid-out overlays.
///
/// Plates are rebuilt per segment so a render holds at most one plate's pixels at a time.
#[derive(Clone, Debug)]
pub struct PlateSource {
    encoded: Arc<[u8]>,
    canvas: Canvas,
    overlay: Arc<OverlayPlan>,
}

impl PlateSource {
    /// Plate size in pixels.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Size of the retained encoded photo.
    pub fn encoded_len(&self) -> usize {
        self.encoded.len()
    }

    /// Decode the photo to the plate size and draw its overlays.
    pub fn build(&self) -> RenderResult<ImagePaint> {
        let prepared = decode_cover(&self.encoded, self.canvas)?;
        let base = ImagePaint::from_prepared(&prepared)?;
        ImagePaint::from_frame(&self.overlay.onto(&base)?)
    }
}

impl Segment {
    pub fn frames(&self) -> u64 {
        match self {
            Self::Still { frames, .. } | Self::Motion { frames, .. } => *frames,
        }
    }

    fn is_motion(&self) -> bool {
        matches!(self, Self::Motion { .. })
    }
}

/// Frame count for a segment of `secs`; never zero.
fn segment_frames(fps: Fps, secs: f64) -> u64 {
    fps.secs_to_frames_round(secs).max(1)
}

/// Segments laid end to end on a uniform canvas and frame rate.
#[derive(Clone, Debug)]
pub struct Timeline {
    pub canvas: Canvas,
    pub fps: Fps,
    pub segments: Vec<Segment>,
}

impl Timeline {
    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(Segment::frames).sum()
    }

    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames())
    }

    /// Number of photo segments.
    pub fn photo_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_motion()).count()
    }

    /// Frame index nearest to `t_secs`, clamped to the last frame.
    pub fn frame_at_secs(&self, t_secs: f64) -> FrameIndex {
        let last = self.total_frames().saturating_sub(1);
        FrameIndex(self.fps.secs_to_frames_round(t_secs.max(0.0)).min(last))
    }

    fn locate(&self, idx: FrameIndex) -> Option<(&Segment, u64)> {
        let mut start = 0u64;
        for segment in &self.segments {
            let end = start + segment.frames();
            if idx.0 < end {
                return Some((segment, idx.0 - start));
            }
            start = end;
        }
        None
    }

    /// Render a single frame.
    pub fn render_frame(&self, idx: FrameIndex) -> RenderResult<FrameRGBA> {
        let (segment, local) = self.locate(idx).ok_or_else(|| {
            RenderError::validation(format!(
                "frame {} is outside the timeline ({} frames)",
                idx.0,
                self.total_frames()
            ))
        })?;
        match segment {
            Segment::Still { frame, .. } => Ok(frame.clone()),
            Segment::Motion { plate, motion, .. } => {
                let plate = plate.build()?;
                let mut painter = Painter::new(self.canvas)?;
                Ok(self.paint_motion(&mut painter, &plate, motion, local))
            }
        }
    }

    fn paint_motion(
        &self,
        painter: &mut Painter,
        plate: &ImagePaint,
        motion: &Motion,
        local: u64,
    ) -> FrameRGBA {
        let t = self.fps.frames_to_secs(local);
        painter.clear(Rgba8::BLACK);
        painter.draw_image(plate, motion.transform(t, plate.canvas()), 1.0);
        painter.finish()
    }

    /// Push every frame into `sink` in order. Returns the number of frames written.
    ///
    /// `cancel` is checked once per frame; on cancellation the sink is left unfinished.
    #[tracing::instrument(skip_all, fields(frames = self.total_frames(), width = cfg.width, height = cfg.height))]
    pub fn stream_into(
        &self,
        sink: &mut dyn FrameSink,
        cfg: SinkConfig,
        cancel: &CancelToken,
    ) -> RenderResult<u64> {
        if cfg.width != self.canvas.width || cfg.height != self.canvas.height {
            return Err(RenderError::validation(format!(
                "sink is {}x{} but the timeline is {}",
                cfg.width,
                cfg.height,
                self.canvas.resolution_label()
            )));
        }
        if cfg.fps != self.fps {
            return Err(RenderError::validation("sink fps differs from timeline fps"));
        }
        if self.segments.is_empty() {
            return Err(RenderError::validation("timeline has no segments"));
        }

        cancel.check()?;
        sink.begin(cfg)?;
        let mut painter = Painter::new(self.canvas)?;
        let mut idx = 0u64;
        for segment in &self.segments {
            match segment {
                Segment::Still { frame, frames } => {
                    for _ in 0..*frames {
                        cancel.check()?;
                        sink.push_frame(FrameIndex(idx), frame)?;
                        idx += 1;
                    }
                }
                Segment::Motion {
                    photo_id,
                    plate,
                    motion,
                    frames,
                } => {
                    tracing::debug!(photo_id = %photo_id, effect = ?motion.effect, frames, "photo segment");
                    let plate = plate.build()?;
                    for local in 0..*frames {
                        cancel.check()?;
                        let frame = self.paint_motion(&mut painter, &plate, motion, local);
                        sink.push_frame(FrameIndex(idx), &frame)?;
                        idx += 1;
                    }
                }
            }
        }
        sink.end()?;
        Ok(idx)
    }
}

/// Collaborator documents one assembly reads.
#[derive(Clone, Copy, Debug)]
pub struct AssemblyInput<'a> {
    pub project: &'a Project,
    pub branding: &'a BrandingProfile,
    pub agent: Option<&'a Agent>,
    /// Website line for the outro.
    pub website: &'a str,
}

/// Builds a [`Timeline`] for one render.
#[derive(Clone, Copy, Debug)]
pub struct ClipAssembler {
    canvas: Canvas,
    fps: Fps,
    orientation: Orientation,
    timing: Timing,
}

impl ClipAssembler {
    pub fn new(profile: &EncodeProfile, timing: Timing) -> Self {
        Self {
            canvas: profile.canvas,
            fps: profile.fps,
            orientation: profile.format.orientation(),
            timing,
        }
    }

    /// Frame-sized window centered on a plate.
    fn window(&self, plate: Canvas) -> Rect {
        let (fw, fh) = (f64::from(self.canvas.width), f64::from(self.canvas.height));
        let x0 = (f64::from(plate.width) - fw) / 2.0;
        let y0 = (f64::from(plate.height) - fh) / 2.0;
        Rect::new(x0, y0, x0 + fw, y0 + fh)
    }

    /// Decode, overlay and animate every photo, then wrap the result in bookends.
    ///
    /// Photos that fail to load or decode are skipped with a warning; if none remain the
    /// result is [`RenderError::NotFound`].
    #[tracing::instrument(skip_all, fields(project_id = %input.project.id, canvas = %self.canvas.resolution_label()))]
    pub fn assemble(
        &self,
        text: &mut TextKit,
        input: &AssemblyInput<'_>,
        cancel: &CancelToken,
    ) -> RenderResult<Timeline> {
        let project = input.project;
        let photos = project.ordered_photos();
        if photos.is_empty() {
            return Err(RenderError::not_found(format!(
                "project '{}' has no photos",
                project.id
            )));
        }

        let accent = Rgba8::accent_or_default(&input.branding.accent_color);
        let style = OverlayStyle {
            orientation: self.orientation,
            accent,
            align: input.branding.alignment,
        };
        let price = project.price_label(&input.branding.currency_symbol);
        let plate_canvas = EffectEngine::plate_for(self.canvas);
        let window = self.window(plate_canvas);
        let photo_frames = segment_frames(self.fps, self.timing.photo_secs);

        let mut photo_segments = Vec::with_capacity(photos.len());
        for (position, photo) in photos.iter().enumerate() {
            cancel.check()?;
            // Decoding here only validates the photo; the pixels are rebuilt per segment.
            let encoded = photo.render_source().load_bytes().and_then(|bytes| {
                decode_cover(&bytes, plate_canvas)?;
                Ok(bytes)
            });
            let encoded = match encoded {
                Ok(bytes) => bytes,
                Err(RenderError::Resource(reason)) => {
                    tracing::warn!(photo_id = %photo.id, error = %reason, "skipping undecodable photo");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let content = OverlayText {
                banner: project.banner_label(),
                price: price.as_deref(),
                caption: non_empty(Some(photo.caption.as_str())),
            };
            let overlay = OverlayRenderer::new(text).plan(
                window,
                f64::from(plate_canvas.width),
                &content,
                &style,
            )?;
            photo_segments.push(Segment::Motion {
                photo_id: photo.id.clone(),
                plate: PlateSource {
                    encoded: encoded.into(),
                    canvas: plate_canvas,
                    overlay: Arc::new(overlay),
                },
                motion: EffectEngine::motion_for(position, self.timing.photo_secs, self.canvas),
                frames: photo_frames,
            });
        }
        if photo_segments.is_empty() {
            return Err(RenderError::not_found(format!(
                "project '{}' has no usable photos",
                project.id
            )));
        }
        tracing::debug!(
            usable = photo_segments.len(),
            skipped = photos.len() - photo_segments.len(),
            "photo segments ready"
        );

        cancel.check()?;
        let unit = self.canvas.width.min(self.canvas.height);
        let logo = load_optional(input.branding.logo.as_ref(), "logo", |bytes| {
            decode_logo(bytes, unit / 2)
        })?;
        let agent_photo = match input.agent {
            Some(agent) => load_optional(agent.photo.as_ref(), "agent photo", |bytes| {
                decode_cover(bytes, Canvas::new(unit / 2, unit / 2))
            })?,
            None => None,
        };

        let mut composer = SceneComposer::new(text, self.canvas, self.orientation)?;
        let intro = composer.intro(
            &IntroCard {
                title: &project.title,
                logo: logo.as_ref(),
            },
            self.timing.intro_secs,
        )?;
        let outro = composer.outro(
            &OutroCard {
                agent: input.agent.map(|agent| AgentCard {
                    name: &agent.name,
                    phone: &agent.phone,
                    email: &agent.email,
                    photo: agent_photo.as_ref(),
                }),
                website: input.website,
                logo: logo.as_ref(),
                accent,
            },
            self.timing.outro_secs,
        )?;

        let mut segments = Vec::with_capacity(photo_segments.len() + 2);
        segments.push(Segment::Still {
            frames: segment_frames(self.fps, intro.duration_secs),
            frame: intro.frame,
        });
        segments.extend(photo_segments);
        segments.push(Segment::Still {
            frames: segment_frames(self.fps, outro.duration_secs),
            frame: outro.frame,
        });
        Ok(Timeline {
            canvas: self.canvas,
            fps: self.fps,
            segments,
        })
    }
}

/// Decode an optional branding image; decode failures drop the image with a warning.
fn load_optional(
    image: Option<&ImageRef>,
    what: &str,
    decode: impl FnOnce(&[u8]) -> RenderResult<crate::assets::decode::PreparedImage>,
) -> RenderResult<Option<ImagePaint>> {
    let Some(image) = image else {
        return Ok(None);
    };
    match image.load_bytes().and_then(|bytes| decode(&bytes)) {
        Ok(prepared) => ImagePaint::from_prepared(&prepared).map(Some),
        Err(RenderError::Resource(reason)) => {
            tracing::warn!(error = %reason, "skipping unusable {what}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assembler.rs"]
mod tests;
