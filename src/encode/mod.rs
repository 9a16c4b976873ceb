//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order; [`sink::VideoEncoder`] creates one per render.

/// `ffmpeg`-based MP4 output.
pub mod ffmpeg;
/// Tier/format → canvas, fps and bitrate.
pub mod profile;
/// Frame sink traits and built-in sinks.
pub mod sink;
