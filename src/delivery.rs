//! Streaming and download responses for stored videos.
//!
//! Transport-agnostic: a response carries a status code, the headers to send and a body. Single
//! `bytes=` ranges are honored with `206 Partial Content`, so `Accept-Ranges: bytes` is truthful.

use uuid::Uuid;

use crate::{
    foundation::error::{RenderError, RenderResult},
    model::video::RenderedVideo,
    storage::blob::{BlobStore, ByteRange, ChunkStream},
};

pub const VIDEO_MP4: &str = "video/mp4";

/// Parse a `Range` header value against an object of `total` bytes.
///
/// Supports one range in the forms `bytes=a-b`, `bytes=a-` and `bytes=-n`. Multi-range requests,
/// other units and ranges starting past the end are [`RenderError::Validation`] errors (a transport
/// maps them to `416`).
pub fn parse_range(header: &str, total: u64) -> RenderResult<ByteRange> {
    let unsatisfiable = || {
        RenderError::validation(format!(
            "range '{header}' not satisfiable for {total} bytes"
        ))
    };
    let spec = header
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(|| RenderError::validation(format!("unsupported range unit in '{header}'")))?;
    if spec.contains(',') {
        return Err(RenderError::validation("multiple ranges are not supported"));
    }
    let (start, end) = spec
        .split_once('-')
        .ok_or_else(|| RenderError::validation(format!("malformed range '{header}'")))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u64>()
            .map_err(|_| RenderError::validation(format!("malformed range '{header}'")))
    };
    if total == 0 {
        return Err(unsatisfiable());
    }

    match (start.trim().is_empty(), end.trim().is_empty()) {
        (true, true) => Err(RenderError::validation(format!("malformed range '{header}'"))),
        // Suffix: the last n bytes.
        (true, false) => {
            let n = parse(end)?;
            if n == 0 {
                return Err(unsatisfiable());
            }
            ByteRange::new(total.saturating_sub(n), total - 1)
        }
        (false, true) => {
            let start = parse(start)?;
            if start >= total {
                return Err(unsatisfiable());
            }
            ByteRange::new(start, total - 1)
        }
        (false, false) => {
            let (start, end) = (parse(start)?, parse(end)?);
            if start >= total || end < start {
                return Err(unsatisfiable());
            }
            ByteRange::new(start, end.min(total - 1))
        }
    }
}

/// A chunked `video/mp4` response.
#[derive(Debug)]
pub struct StreamResponse {
    /// `200` for the whole object, `206` for a range.
    pub status: u16,
    pub content_length: u64,
    /// `bytes start-end/total` for partial responses.
    pub content_range: Option<String>,
    pub body: ChunkStream,
}

impl StreamResponse {
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Content-Type", VIDEO_MP4.to_string()),
            ("Content-Length", self.content_length.to_string()),
            ("Accept-Ranges", "bytes".to_string()),
        ];
        if let Some(range) = &self.content_range {
            headers.push(("Content-Range", range.clone()));
        }
        headers
    }
}

/// A whole-file attachment response.
#[derive(Debug)]
pub struct DownloadResponse {
    pub file_name: String,
    pub body: Vec<u8>,
}

impl DownloadResponse {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }

    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", VIDEO_MP4.to_string()),
            ("Content-Length", self.body.len().to_string()),
            ("Content-Disposition", self.content_disposition()),
        ]
    }
}

/// Open a video for streaming, honoring an optional `Range` header.
#[tracing::instrument(skip(store))]
pub fn stream_video(
    store: &dyn BlobStore,
    id: Uuid,
    range_header: Option<&str>,
) -> RenderResult<StreamResponse> {
    let record = store.find_by_video_id(id)?;
    let total = record.byte_size();
    match range_header.map(|h| parse_range(h, total)).transpose()? {
        Some(range) => Ok(StreamResponse {
            status: 206,
            content_length: range.len(),
            content_range: Some(format!("bytes {}-{}/{total}", range.start, range.end)),
            body: store.open_range(id, Some(range))?,
        }),
        None => Ok(StreamResponse {
            status: 200,
            content_length: total,
            content_range: None,
            body: store.open_read_stream(id)?,
        }),
    }
}

/// Read a whole video as an attachment named `<title>_<quality>.mp4`.
#[tracing::instrument(skip(store))]
pub fn download_video(store: &dyn BlobStore, id: Uuid) -> RenderResult<DownloadResponse> {
    let record: RenderedVideo = store.find_by_video_id(id)?;
    let body = store.read_all(id)?;
    Ok(DownloadResponse {
        file_name: record.download_file_name(),
        body,
    })
}
