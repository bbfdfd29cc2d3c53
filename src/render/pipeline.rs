use std::path::{Path, PathBuf};

use crate::{
    assets::{
        decode::{load_image, probe_shape},
        discover::{ImageExtension, discover_images},
    },
    config::StillreelConfig,
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        sink::{FrameSink, SinkConfig},
    },
    foundation::{
        core::{CanvasSize, Fps, FrameIndex},
        error::{StillreelError, StillreelResult},
    },
    render::{
        background::{BackgroundProvider, background_for_mode},
        canvas::canvas_size,
        compositor::{CompositedFrame, composite_frame},
    },
};

/// One discovered input file and its probed size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    /// Position in the input sequence, which is also the frame index.
    pub index: usize,
    /// File path.
    pub path: PathBuf,
    /// Rows.
    pub height: u32,
    /// Columns.
    pub width: u32,
    /// Channels stored in the file; frames are always composited as RGB.
    pub channels: u8,
}

/// Run record: the ordered inputs and the canvas size computed from all of them.
///
/// Building an `ImageSet` is the loading pass; the canvas is fixed from then on.
#[derive(Clone, Debug)]
pub struct ImageSet {
    entries: Vec<SourceEntry>,
    canvas: CanvasSize,
}

impl ImageSet {
    /// Discover `ext` files in `dir` (sorted by name) and probe each of them.
    pub fn from_dir(dir: &Path, ext: ImageExtension) -> StillreelResult<Self> {
        tracing::debug!(input = %dir.display(), format = %ext, "loading image data");
        let paths = discover_images(dir, ext)?;
        Self::from_paths(dir, paths)
    }

    /// Probe `paths` in the given order. `source` names the input set in errors.
    pub fn from_paths(source: &Path, paths: Vec<PathBuf>) -> StillreelResult<Self> {
        let mut entries = Vec::with_capacity(paths.len());
        for (index, path) in paths.into_iter().enumerate() {
            let (height, width, channels) = probe_shape(&path)?;
            tracing::debug!(
                index,
                shape = ?(height, width, channels),
                file = %path.display(),
                "image"
            );
            entries.push(SourceEntry {
                index,
                path,
                height,
                width,
                channels,
            });
        }

        let canvas = canvas_size(entries.iter().map(|e| (e.height, e.width)), source)?;
        tracing::debug!(
            shape = ?(canvas.max_height, canvas.max_width, 3),
            "frame canvas"
        );
        Ok(Self { entries, canvas })
    }

    /// Inputs in frame order.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Size of every frame in this run.
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Number of frames this run produces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no entries; never the case for a set built by the constructors.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters returned by the render entry points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames in the input set.
    pub frames_total: u64,
    /// Frames accepted by the sink.
    pub frames_written: u64,
}

/// Decode and composite the frame at `index` without involving a sink.
pub fn render_frame(
    set: &ImageSet,
    index: usize,
    background: &mut dyn BackgroundProvider,
) -> StillreelResult<CompositedFrame> {
    let entry = set.entries.get(index).ok_or_else(|| {
        StillreelError::validation(format!(
            "frame index {index} out of range (set has {} images)",
            set.len()
        ))
    })?;
    let image = load_image(&entry.path, entry.index)?;
    let out = composite_frame(&image, set.canvas, background)?;
    log_frame(&out, set.len());
    Ok(out)
}

/// Composite every image of `set` in order and push the frames into `sink`.
///
/// `sink.end()` runs exactly once after a successful `begin`, including when loading,
/// compositing or a frame write fails. The first error is returned; a finalization error that
/// follows another error is logged.
#[tracing::instrument(skip_all, fields(frames = set.len()))]
pub fn render_to_sink(
    set: &ImageSet,
    background: &mut dyn BackgroundProvider,
    sink: &mut dyn FrameSink,
    fps: Fps,
) -> StillreelResult<RenderStats> {
    sink.begin(SinkConfig {
        width: set.canvas.max_width,
        height: set.canvas.max_height,
        fps,
    })?;

    let pushed = push_frames(set, background, sink);
    let ended = sink.end();

    match (pushed, ended) {
        (Ok(stats), Ok(())) => Ok(stats),
        (Ok(_), Err(end_err)) => Err(end_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(end_err)) => {
            tracing::error!(error = %end_err, "sink finalization failed after an earlier error");
            Err(err)
        }
    }
}

fn push_frames(
    set: &ImageSet,
    background: &mut dyn BackgroundProvider,
    sink: &mut dyn FrameSink,
) -> StillreelResult<RenderStats> {
    let mut stats = RenderStats {
        frames_total: set.len() as u64,
        frames_written: 0,
    };

    for entry in &set.entries {
        let image = load_image(&entry.path, entry.index)?;
        let out = composite_frame(&image, set.canvas, background)?;
        log_frame(&out, set.len());

        sink.push_frame(FrameIndex(entry.index as u64), &out.frame)?;
        stats.frames_written += 1;
    }

    Ok(stats)
}

fn log_frame(out: &CompositedFrame, total: usize) {
    tracing::debug!(
        frame = out.stats.index + 1,
        of = total,
        size = ?(out.stats.scaled.rows, out.stats.scaled.cols),
        range = ?(out.stats.min_value, out.stats.max_value),
        ratio = format_args!("{:.2}", out.stats.ratio),
        "composited"
    );
}

/// Run the whole pipeline described by `cfg` into `sink`.
///
/// The configuration is validated before the input directory is read, and an empty input set is
/// reported before the sink is started.
pub fn render_with_config(
    cfg: &StillreelConfig,
    sink: &mut dyn FrameSink,
) -> StillreelResult<RenderStats> {
    cfg.validate()?;
    let mode = cfg.background_mode()?;
    let fps = cfg.fps()?;

    let set = ImageSet::from_dir(&cfg.input_path, cfg.image_extension)?;
    tracing::info!(
        images = set.len(),
        width = set.canvas.max_width,
        height = set.canvas.max_height,
        background = %mode,
        "rendering"
    );

    let mut background = background_for_mode(mode, cfg.seed);
    render_to_sink(&set, background.as_mut(), sink, fps)
}

/// Render the images selected by `cfg` to an MP4 at [`StillreelConfig::video_path`].
///
/// `ffmpeg` must be installed and on `PATH`. The output directory is created if absent.
#[tracing::instrument(skip(cfg), fields(input = %cfg.input_path.display()))]
pub fn render_to_mp4(cfg: &StillreelConfig) -> StillreelResult<RenderStats> {
    let out_path = cfg.video_path();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: out_path.clone(),
        overwrite: cfg.overwrite,
    });
    let stats = render_with_config(cfg, &mut sink)?;
    tracing::info!(out = %out_path.display(), frames = stats.frames_written, "video written");
    Ok(stats)
}
