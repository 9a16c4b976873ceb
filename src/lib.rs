//! Real-estate marketing video renderer.
//!
//! A render takes a project's ordered photos plus the owner's branding and listing agent and
//! produces an H.264 video: an intro card, one pan/zoom segment per photo with banner, price and
//! caption overlays, and an outro contact card. The output quality is gated by the owner's
//! subscription plan and the finished file lands in a content-addressed [`BlobStore`].
//!
//! - Build a [`RenderPipeline`] from a [`PipelineConfig`], a [`VideoEncoder`] and a [`BlobStore`]
//! - Call [`RenderPipeline::render_project`] with the caller's collaborator stores
//! - Serve results with [`RenderPipeline::stream`] and [`RenderPipeline::download`]
#![forbid(unsafe_code)]

/// Fonts, colors and image decoding.
pub mod assets;
pub mod config;
pub mod delivery;
/// Ken Burns camera motion.
pub mod effects;
pub mod encode;
pub mod foundation;
/// Documents read from the surrounding CRUD layer and render records.
pub mod model;
pub mod pipeline;
/// Subscription plans and quality gating.
pub mod plan;
/// Raster painter, overlays and bookend cards.
pub mod render;
pub mod storage;
pub mod timeline;

pub use crate::config::{PipelineConfig, Timing};
pub use crate::encode::{
    ffmpeg::{FfmpegEncoder, FfmpegSettings},
    profile::EncodeProfile,
    sink::{FrameSink, InMemorySink, SinkConfig, SummaryEncoder, VideoEncoder},
};
pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{ErrorKind, RenderError, RenderResult};
pub use crate::model::domain::{OutputFormat, RenderRequest};
pub use crate::model::store::{Collaborators, InMemoryStore};
pub use crate::model::video::RenderedVideo;
pub use crate::pipeline::pool::{RenderJob, RenderPool};
pub use crate::pipeline::render::{RenderOutcome, RenderPipeline};
pub use crate::plan::gate::QualityTier;
pub use crate::render::raster::FrameRGBA;
pub use crate::storage::{blob::BlobStore, fs::FsBlobStore, memory::MemoryBlobStore};
