//! Encoding sinks.
//!
//! Sinks consume finished frames in order and are driven by the render pipeline.

/// `ffmpeg`-based MP4 sink.
pub(crate) mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub(crate) mod sink;
