//! Finished render records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{foundation::core::Canvas, model::domain::OutputFormat, plan::gate::QualityTier};

/// Descriptive metadata stored next to a video blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    pub project_id: String,
    pub owner_id: String,
    pub title: String,
    pub format: OutputFormat,
    pub quality: QualityTier,
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
}

impl VideoMeta {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// Location and identity of a stored blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    /// Store-relative key.
    pub key: String,
    /// Lowercase hex SHA-256 of the blob bytes.
    pub sha256: String,
    pub byte_size: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Completed,
}

impl VideoStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }
}

/// A successfully rendered and stored video. Exists only once its blob is readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderedVideo {
    pub id: Uuid,
    #[serde(flatten)]
    pub meta: VideoMeta,
    pub status: VideoStatus,
    pub blob: BlobRef,
    pub created_at: DateTime<Utc>,
}

impl RenderedVideo {
    pub fn byte_size(&self) -> u64 {
        self.blob.byte_size
    }

    /// Attachment file name used by downloads (`<title>_<quality>.mp4`).
    pub fn download_file_name(&self) -> String {
        let mut stem: String = self
            .meta
            .title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        stem = stem.trim_matches('_').to_string();
        if stem.is_empty() {
            stem = "video".to_string();
        }
        format!("{stem}_{}.mp4", self.meta.quality)
    }
}
