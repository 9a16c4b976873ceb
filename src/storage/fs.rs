//! Filesystem-backed blob store.
//!
//! Layout: `<root>/<first two hex chars of id>/<id>.mp4` with a `<id>.json` record beside it. Both
//! files are written to temporaries in the same directory and renamed into place; the record goes
//! last, so a video is visible only once its bytes are complete.

use std::{
    fs::File,
    io::{Read, Seek as _, SeekFrom, Write as _},
    path::{Path, PathBuf},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    foundation::error::{RenderError, RenderResult},
    model::video::{BlobRef, RenderedVideo, VideoMeta, VideoStatus},
    storage::blob::{BlobStore, ByteRange, ChunkStream, DEFAULT_CHUNK_BYTES, DigestingCopy, clamp_range},
};

#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    chunk_bytes: usize,
}

impl FsBlobStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> RenderResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            RenderError::storage(format!("create blob root '{}': {e}", root.display()))
        })?;
        Ok(Self {
            root,
            chunk_bytes: DEFAULT_CHUNK_BYTES,
        })
    }

    pub fn with_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.chunk_bytes = chunk_bytes.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key(id: Uuid) -> String {
        let s = id.simple().to_string();
        format!("{}/{s}.mp4", &s[..2])
    }

    fn blob_path(&self, id: Uuid) -> PathBuf {
        self.root.join(Self::key(id))
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.blob_path(id).with_extension("json")
    }
}

impl BlobStore for FsBlobStore {
    #[tracing::instrument(skip(self, source, meta), fields(project = %meta.project_id))]
    fn put(&self, id: Uuid, source: &mut dyn Read, meta: &VideoMeta) -> RenderResult<RenderedVideo> {
        let blob_path = self.blob_path(id);
        let record_path = self.record_path(id);
        if record_path.exists() || blob_path.exists() {
            return Err(RenderError::storage(format!("video {id} already exists")));
        }
        let dir = blob_path
            .parent()
            .ok_or_else(|| RenderError::storage("blob path has no parent"))?;
        std::fs::create_dir_all(dir)
            .map_err(|e| RenderError::storage(format!("create '{}': {e}", dir.display())))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| RenderError::storage(format!("create temp blob: {e}")))?;
        let mut copy = DigestingCopy::new();
        copy.copy(source, tmp.as_file_mut())?;
        tmp.as_file_mut()
            .sync_all()
            .map_err(|e| RenderError::storage(format!("sync blob: {e}")))?;
        let (sha256, byte_size) = copy.finish();
        if byte_size == 0 {
            return Err(RenderError::storage("refusing to store an empty video"));
        }
        tmp.persist_noclobber(&blob_path)
            .map_err(|e| RenderError::storage(format!("persist blob {id}: {}", e.error)))?;

        let record = RenderedVideo {
            id,
            meta: meta.clone(),
            status: VideoStatus::Completed,
            blob: BlobRef {
                key: Self::key(id),
                sha256,
                byte_size,
            },
            created_at: Utc::now(),
        };
        if let Err(e) = write_record(dir, &record_path, &record) {
            remove_orphan_blob(id, &blob_path);
            return Err(e);
        }
        tracing::info!(%id, byte_size, "stored video blob");
        Ok(record)
    }

    fn find_by_video_id(&self, id: Uuid) -> RenderResult<RenderedVideo> {
        let path = self.record_path(id);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::not_found(format!("video {id} not found")));
            }
            Err(e) => return Err(RenderError::storage(format!("read record {id}: {e}"))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| RenderError::storage(format!("corrupt record {id}: {e}")))
    }

    fn open_range(&self, id: Uuid, range: Option<ByteRange>) -> RenderResult<ChunkStream> {
        let record = self.find_by_video_id(id)?;
        let (start, len) = clamp_range(range, record.blob.byte_size)?;
        let mut file = File::open(self.blob_path(id))
            .map_err(|e| RenderError::storage(format!("open blob {id}: {e}")))?;
        if start > 0 {
            file.seek(SeekFrom::Start(start))
                .map_err(|e| RenderError::storage(format!("seek blob {id}: {e}")))?;
        }
        Ok(ChunkStream::new(
            Box::new(file.take(len)),
            len,
            self.chunk_bytes,
        ))
    }
}

fn write_record(dir: &Path, path: &Path, record: &RenderedVideo) -> RenderResult<()> {
    let json = serde_json::to_vec_pretty(record)
        .map_err(|e| RenderError::storage(format!("serialize record: {e}")))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| RenderError::storage(format!("create temp record: {e}")))?;
    tmp.write_all(&json)
        .and_then(|()| tmp.as_file_mut().sync_all())
        .map_err(|e| RenderError::storage(format!("write record: {e}")))?;
    tmp.persist_noclobber(path)
        .map_err(|e| RenderError::storage(format!("persist record: {}", e.error)))?;
    Ok(())
}

/// Delete a blob whose record could not be written. Returns whether the blob is gone.
fn remove_orphan_blob(id: Uuid, blob_path: &Path) -> bool {
    match std::fs::remove_file(blob_path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => {
            tracing::warn!(%id, path = %blob_path.display(), error = %e, "failed to remove orphaned video blob");
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/fs.rs"]
mod tests;
