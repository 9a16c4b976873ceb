//! Blob store contract and chunked reads.

use std::io::Read;

use sha2::{Digest as _, Sha256};
use uuid::Uuid;

use crate::{
    foundation::error::{RenderError, RenderResult},
    model::video::{RenderedVideo, VideoMeta},
};

/// Default chunk size for streamed reads (1 MiB).
pub const DEFAULT_CHUNK_BYTES: usize = 1024 * 1024;

/// Inclusive byte range within a blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    /// Inclusive.
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> RenderResult<Self> {
        if end < start {
            return Err(RenderError::validation(format!(
                "byte range end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whole object of `total` bytes; `None` for empty objects.
    pub fn full(total: u64) -> Option<Self> {
        (total > 0).then(|| Self {
            start: 0,
            end: total - 1,
        })
    }
}

/// Sequential chunked reader over a stored blob (or a slice of it).
///
/// Yields `Ok(chunk)` items of at most `chunk_size` bytes until exactly `len` bytes were produced.
/// A source that ends early yields a [`RenderError::Storage`].
pub struct ChunkStream {
    reader: Box<dyn Read + Send>,
    remaining: u64,
    len: u64,
    chunk_size: usize,
    failed: bool,
}

impl ChunkStream {
    pub fn new(reader: Box<dyn Read + Send>, len: u64, chunk_size: usize) -> Self {
        Self {
            reader,
            remaining: len,
            len,
            chunk_size: chunk_size.max(1),
            failed: false,
        }
    }

    /// Total bytes this stream produces.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drain the stream into one buffer.
    pub fn read_to_vec(self) -> RenderResult<Vec<u8>> {
        let mut out = Vec::with_capacity(usize::try_from(self.len).unwrap_or(0));
        for chunk in self {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStream")
            .field("len", &self.len)
            .field("remaining", &self.remaining)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

impl Iterator for ChunkStream {
    type Item = RenderResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.failed {
            return None;
        }
        let want = self.remaining.min(self.chunk_size as u64) as usize;
        let mut buf = vec![0u8; want];
        let mut filled = 0;
        while filled < want {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.failed = true;
                    return Some(Err(RenderError::storage(format!(
                        "blob ended early: {} of {} bytes missing",
                        self.remaining - filled as u64,
                        self.len
                    ))));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(RenderError::storage(format!("blob read failed: {e}"))));
                }
            }
        }
        self.remaining -= want as u64;
        Some(Ok(buf))
    }
}

/// Immutable storage for rendered videos, keyed by video id.
///
/// `put` is all-or-nothing: a video is either fully readable with its metadata, or absent.
pub trait BlobStore: Send + Sync {
    /// Store the bytes read from `source` under `id` and create the video record.
    ///
    /// Fails with [`RenderError::Storage`] if `id` already exists.
    fn put(&self, id: Uuid, source: &mut dyn Read, meta: &VideoMeta) -> RenderResult<RenderedVideo>;

    /// Metadata for `id`, [`RenderError::NotFound`] when absent.
    fn find_by_video_id(&self, id: Uuid) -> RenderResult<RenderedVideo>;

    /// Chunked read of `range` (the whole blob when `None`).
    fn open_range(&self, id: Uuid, range: Option<ByteRange>) -> RenderResult<ChunkStream>;

    /// Chunked sequential read of the whole blob.
    fn open_read_stream(&self, id: Uuid) -> RenderResult<ChunkStream> {
        self.open_range(id, None)
    }

    /// Whole-object read, verified against the recorded SHA-256 digest.
    fn read_all(&self, id: Uuid) -> RenderResult<Vec<u8>> {
        let record = self.find_by_video_id(id)?;
        let bytes = self.open_read_stream(id)?.read_to_vec()?;
        verify_digest(&record, &bytes)?;
        Ok(bytes)
    }
}

/// Incremental SHA-256 plus byte count while copying a source.
pub(crate) struct DigestingCopy {
    hasher: Sha256,
    pub(crate) bytes: u64,
}

impl DigestingCopy {
    pub(crate) fn new() -> Self {
        Self {
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    /// Copy `source` into `sink`, hashing as it goes.
    pub(crate) fn copy(
        &mut self,
        source: &mut dyn Read,
        sink: &mut dyn std::io::Write,
    ) -> RenderResult<()> {
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(RenderError::storage(format!("read blob source: {e}"))),
            };
            self.hasher.update(&buf[..n]);
            sink.write_all(&buf[..n])
                .map_err(|e| RenderError::storage(format!("write blob: {e}")))?;
            self.bytes += n as u64;
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> (String, u64) {
        let hash = self.hasher.finalize();
        (format!("{hash:x}"), self.bytes)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    format!("{hash:x}")
}

pub(crate) fn verify_digest(record: &RenderedVideo, bytes: &[u8]) -> RenderResult<()> {
    if bytes.len() as u64 != record.blob.byte_size {
        return Err(RenderError::storage(format!(
            "blob {} has {} bytes, expected {}",
            record.id,
            bytes.len(),
            record.blob.byte_size
        )));
    }
    let actual = sha256_hex(bytes);
    if actual != record.blob.sha256 {
        return Err(RenderError::storage(format!(
            "blob {} digest mismatch: {actual} != {}",
            record.id, record.blob.sha256
        )));
    }
    Ok(())
}

/// Resolve `range` against a blob of `total` bytes.
pub(crate) fn clamp_range(range: Option<ByteRange>, total: u64) -> RenderResult<(u64, u64)> {
    match range {
        None => Ok((0, total)),
        Some(r) if r.start < total => {
            let end = r.end.min(total - 1);
            Ok((r.start, end - r.start + 1))
        }
        Some(r) => Err(RenderError::validation(format!(
            "range start {} beyond blob size {total}",
            r.start
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/blob.rs"]
mod tests;
