//! Bounded parallelism across independent render requests.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::PipelineConfig,
    foundation::{
        cancel::CancelToken,
        error::{RenderError, RenderResult},
    },
    model::{domain::RenderRequest, store::Collaborators},
    pipeline::render::{RenderOutcome, RenderPipeline},
};

/// One queued render, e.g. `{"user_id": "u1", "project_id": "p1", "format_type": "9:16", "quality": "hd"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderJob {
    pub user_id: String,
    #[serde(flatten)]
    pub request: RenderRequest,
}

/// Worker pool sized to the available cores unless configured otherwise.
///
/// Each job runs the whole pipeline on one worker; frames of a single render are produced
/// sequentially.
pub struct RenderPool {
    pool: rayon::ThreadPool,
}

impl RenderPool {
    pub fn new(workers: Option<usize>) -> RenderResult<Self> {
        Ok(Self {
            pool: build_thread_pool(workers)?,
        })
    }

    /// Pool sized by `config.workers`.
    pub fn from_config(config: &PipelineConfig) -> RenderResult<Self> {
        Self::new(config.workers)
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `jobs` concurrently. Results come back in submission order.
    ///
    /// Jobs fail independently; cancelling `cancel` stops every job that has not finished.
    #[tracing::instrument(skip_all, fields(jobs = jobs.len(), workers = self.workers()))]
    pub fn render_all(
        &self,
        pipeline: &RenderPipeline,
        collab: Collaborators<'_>,
        jobs: &[RenderJob],
        cancel: &CancelToken,
    ) -> Vec<RenderResult<RenderOutcome>> {
        self.pool.install(|| {
            jobs.par_iter()
                .map(|job| pipeline.render_project(&job.user_id, &job.request, collab, cancel))
                .collect()
        })
    }
}

fn build_thread_pool(threads: Option<usize>) -> RenderResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(RenderError::validation("render workers must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("reels-render-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RenderError::Other(anyhow::anyhow!("failed to build render pool: {e}")))
}
