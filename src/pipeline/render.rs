//! One render request, end to end.
//!
//! Stages: plan gate, collaborator reads, timeline assembly, encoding into a scoped scratch
//! workspace, then a single blob write. Nothing is persisted unless every stage succeeds.

use std::{path::Path, sync::Arc};

use serde::Serialize;
use uuid::Uuid;

use crate::{
    assets::fonts::{FontBook, TextKit},
    config::PipelineConfig,
    delivery::{self, DownloadResponse, StreamResponse},
    encode::{
        profile::EncodeProfile,
        sink::{SinkConfig, VideoEncoder},
    },
    foundation::{
        cancel::CancelToken,
        error::{RenderError, RenderResult},
    },
    model::{
        domain::{Agent, RenderRequest},
        store::Collaborators,
        video::{RenderedVideo, VideoMeta},
    },
    plan::gate::{self, QualityTier},
    storage::blob::BlobStore,
    timeline::assembler::{AssemblyInput, ClipAssembler, Timeline},
};

/// Response body of a successful render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderOutcome {
    pub video_id: Uuid,
    pub quality: QualityTier,
    /// `WxH`, e.g. `1280x720`.
    pub resolution: String,
    /// Stored size in MiB, rounded to two decimals.
    pub file_size_mb: f64,
    pub duration_secs: f64,
    pub status: &'static str,
}

impl RenderOutcome {
    fn from_video(video: &RenderedVideo) -> Self {
        Self {
            video_id: video.id,
            quality: video.meta.quality,
            resolution: video.meta.canvas().resolution_label(),
            file_size_mb: size_mb(video.byte_size()),
            duration_secs: video.meta.duration_secs,
            status: video.status.as_str(),
        }
    }
}

fn size_mb(bytes: u64) -> f64 {
    ((bytes as f64) / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// An authorized request with its timeline built but not yet encoded.
#[derive(Debug)]
pub struct PreparedRender {
    pub profile: EncodeProfile,
    pub timeline: Timeline,
    pub meta: VideoMeta,
}

impl PreparedRender {
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            width: self.profile.canvas.width,
            height: self.profile.canvas.height,
            fps: self.profile.fps,
            bitrate_kbps: self.profile.bitrate_kbps,
        }
    }
}

/// Shared render service. Cheap to share across threads.
#[derive(Clone)]
pub struct RenderPipeline {
    config: PipelineConfig,
    fonts: Arc<FontBook>,
    encoder: Arc<dyn VideoEncoder>,
    blobs: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("config", &self.config)
            .field("fonts", &self.fonts.len())
            .field("encoder", &self.encoder.name())
            .finish_non_exhaustive()
    }
}

impl RenderPipeline {
    /// Validate `config` and discover fonts from its directories plus the system ones.
    pub fn new(
        config: PipelineConfig,
        encoder: Arc<dyn VideoEncoder>,
        blobs: Arc<dyn BlobStore>,
    ) -> RenderResult<Self> {
        config.validate()?;
        let fonts = Arc::new(FontBook::discover(&config.font_dirs));
        tracing::debug!(fonts = fonts.len(), encoder = encoder.name(), "render pipeline ready");
        Ok(Self {
            config,
            fonts,
            encoder,
            blobs,
        })
    }

    /// Replace the discovered font book.
    pub fn with_fonts(mut self, fonts: Arc<FontBook>) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    /// Authorize `request` for `user_id`, read its documents and assemble the timeline.
    pub fn prepare(
        &self,
        user_id: &str,
        request: &RenderRequest,
        collab: Collaborators<'_>,
        cancel: &CancelToken,
    ) -> RenderResult<PreparedRender> {
        let plan = collab.accounts.plan_name(user_id)?;
        gate::authorize(&plan, request.quality)?;

        let project = collab.projects.get_project(&request.project_id, user_id)?;
        if project.photos.is_empty() {
            return Err(RenderError::not_found(format!(
                "project '{}' has no photos",
                project.id
            )));
        }
        let branding = collab.accounts.branding(user_id)?;
        let agent = self.resolve_agent(collab, project.agent_id.as_deref(), user_id)?;
        cancel.check()?;

        let profile = EncodeProfile::resolve(request.quality, request.format);
        tracing::debug!(
            plan = %plan,
            canvas = %profile.canvas.resolution_label(),
            fps = profile.fps.num,
            photos = project.photos.len(),
            "render authorized"
        );

        let mut text = TextKit::load(&self.fonts, &branding.font);
        let timeline = ClipAssembler::new(&profile, self.config.timing).assemble(
            &mut text,
            &AssemblyInput {
                project: &project,
                branding: &branding,
                agent: agent.as_ref(),
                website: &self.config.company_website,
            },
            cancel,
        )?;

        let meta = VideoMeta {
            project_id: project.id.clone(),
            owner_id: user_id.to_string(),
            title: project.title.clone(),
            format: request.format,
            quality: request.quality,
            width: profile.canvas.width,
            height: profile.canvas.height,
            duration_secs: timeline.duration_secs(),
        };
        Ok(PreparedRender {
            profile,
            timeline,
            meta,
        })
    }

    fn resolve_agent(
        &self,
        collab: Collaborators<'_>,
        agent_id: Option<&str>,
        owner_id: &str,
    ) -> RenderResult<Option<Agent>> {
        let Some(agent_id) = agent_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        collab
            .agents
            .get_agent(agent_id, owner_id)?
            .map(Some)
            .ok_or_else(|| RenderError::not_found(format!("agent '{agent_id}' not found")))
    }

    /// Render, encode and store one video.
    ///
    /// On any error nothing is stored: the scratch workspace is removed and no record exists.
    #[tracing::instrument(
        name = "render_project",
        skip_all,
        fields(user_id = %user_id, project_id = %request.project_id, quality = %request.quality, format = %request.format)
    )]
    pub fn render_project(
        &self,
        user_id: &str,
        request: &RenderRequest,
        collab: Collaborators<'_>,
        cancel: &CancelToken,
    ) -> RenderResult<RenderOutcome> {
        let prepared = self.prepare(user_id, request, collab, cancel)?;

        let workspace = self.scratch_workspace()?;
        let out_path = workspace.path().join("render.mp4");
        self.encode(&prepared, &out_path, cancel)?;
        cancel.check()?;

        let mut file = std::fs::File::open(&out_path).map_err(|e| {
            RenderError::encoding(format!(
                "{} produced no readable output at '{}': {e}",
                self.encoder.name(),
                out_path.display()
            ))
        })?;
        let video = self.blobs.put(Uuid::new_v4(), &mut file, &prepared.meta)?;
        drop(workspace);

        tracing::info!(
            video_id = %video.id,
            resolution = %video.meta.canvas().resolution_label(),
            bytes = video.byte_size(),
            duration_secs = video.meta.duration_secs,
            "render completed"
        );
        Ok(RenderOutcome::from_video(&video))
    }

    fn encode(
        &self,
        prepared: &PreparedRender,
        out_path: &Path,
        cancel: &CancelToken,
    ) -> RenderResult<()> {
        let mut sink = self.encoder.open(out_path)?;
        let frames = prepared
            .timeline
            .stream_into(sink.as_mut(), prepared.sink_config(), cancel)?;
        tracing::debug!(frames, encoder = self.encoder.name(), "encoding finished");
        Ok(())
    }

    fn scratch_workspace(&self) -> RenderResult<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("reels-render-");
        let dir = match &self.config.scratch_dir {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| {
                    RenderError::storage(format!(
                        "create scratch dir '{}': {e}",
                        root.display()
                    ))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };
        dir.map_err(|e| RenderError::storage(format!("create render workspace: {e}")))
    }

    /// Stored record for `id`.
    pub fn video(&self, id: Uuid) -> RenderResult<RenderedVideo> {
        self.blobs.find_by_video_id(id)
    }

    /// Streaming response, honoring an optional single `Range` header.
    pub fn stream(&self, id: Uuid, range_header: Option<&str>) -> RenderResult<StreamResponse> {
        delivery::stream_video(self.blobs.as_ref(), id, range_header)
    }

    /// Whole-file attachment response.
    pub fn download(&self, id: Uuid) -> RenderResult<DownloadResponse> {
        delivery::download_video(self.blobs.as_ref(), id)
    }
}
