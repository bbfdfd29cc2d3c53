//! Stillreel turns a directory of still images with mixed resolutions into one fixed-size video.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: list the input directory, keep one extension, sort by file name
//! 2. **Probe**: read every image header and build an [`ImageSet`] (the run record)
//! 3. **Size**: the [`CanvasSize`] is the component-wise maximum over all sources
//! 4. **Composite**: per image, scale to the canvas height and center it on a fresh background
//! 5. **Encode**: stream frames in order into a [`FrameSink`] (MP4 via the system `ffmpeg`)
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Sequential**: frames are produced and consumed one at a time, in discovery order.
//! - **Sink finalization is guaranteed**: once a sink has begun, `end` runs exactly once.
//! - **RGB8** end-to-end: alpha is dropped when an image is loaded.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod encode;
mod foundation;
mod render;

pub use assets::decode::{SourceImage, load_image, probe_dimensions, probe_shape};
pub use assets::discover::{ImageExtension, discover_images};
pub use config::{DEFAULT_FPS, DEFAULT_VIDEO_FILENAME, StillreelConfig};
pub use encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path, output_pix_fmt,
};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{CanvasSize, Fps, FrameIndex, FrameRgb};
pub use foundation::error::{StillreelError, StillreelResult};
pub use render::background::{
    BackgroundMode, BackgroundProvider, NoiseBackground, SolidBackground, background_for_mode,
};
pub use render::canvas::canvas_size;
pub use render::compositor::{
    CompositedFrame, FrameStats, ScaledSize, centering_offsets, composite_frame, scaled_size,
};
pub use render::pipeline::{
    ImageSet, RenderStats, SourceEntry, render_frame, render_to_mp4, render_to_sink,
    render_with_config,
};
