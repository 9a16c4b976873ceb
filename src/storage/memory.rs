//! Process-local blob store.

use std::{
    collections::HashMap,
    io::{Cursor, Read},
    sync::{Arc, RwLock},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    foundation::error::{RenderError, RenderResult},
    model::video::{BlobRef, RenderedVideo, VideoMeta, VideoStatus},
    storage::blob::{BlobStore, ByteRange, ChunkStream, DEFAULT_CHUNK_BYTES, DigestingCopy, clamp_range},
};

/// Map-backed [`BlobStore`] for tests and one-shot CLI runs.
#[derive(Debug)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<Uuid, (Arc<Vec<u8>>, RenderedVideo)>>,
    chunk_bytes: usize,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            chunk_bytes: DEFAULT_CHUNK_BYTES,
        }
    }

    pub fn with_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.chunk_bytes = chunk_bytes.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, id: Uuid) -> RenderResult<(Arc<Vec<u8>>, RenderedVideo)> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RenderError::storage("blob map lock poisoned"))?;
        entries
            .get(&id)
            .cloned()
            .ok_or_else(|| RenderError::not_found(format!("video {id} not found")))
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, id: Uuid, source: &mut dyn Read, meta: &VideoMeta) -> RenderResult<RenderedVideo> {
        let mut bytes = Vec::new();
        let mut copy = DigestingCopy::new();
        copy.copy(source, &mut bytes)?;
        let (sha256, byte_size) = copy.finish();
        if byte_size == 0 {
            return Err(RenderError::storage("refusing to store an empty video"));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| RenderError::storage("blob map lock poisoned"))?;
        if entries.contains_key(&id) {
            return Err(RenderError::storage(format!("video {id} already exists")));
        }
        let record = RenderedVideo {
            id,
            meta: meta.clone(),
            status: VideoStatus::Completed,
            blob: BlobRef {
                key: format!("mem/{}", id.simple()),
                sha256,
                byte_size,
            },
            created_at: Utc::now(),
        };
        entries.insert(id, (Arc::new(bytes), record.clone()));
        Ok(record)
    }

    fn find_by_video_id(&self, id: Uuid) -> RenderResult<RenderedVideo> {
        self.get(id).map(|(_, record)| record)
    }

    fn open_range(&self, id: Uuid, range: Option<ByteRange>) -> RenderResult<ChunkStream> {
        let (bytes, record) = self.get(id)?;
        let (start, len) = clamp_range(range, record.blob.byte_size)?;
        let (start, end) = (start as usize, (start + len) as usize);
        let slice = bytes
            .get(start..end)
            .ok_or_else(|| RenderError::storage(format!("blob {id} shorter than its record")))?
            .to_vec();
        Ok(ChunkStream::new(
            Box::new(Cursor::new(slice)),
            len,
            self.chunk_bytes,
        ))
    }
}
