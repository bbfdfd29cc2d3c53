use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{CanvasSize, FrameIndex, FrameRgb};
use crate::foundation::error::{StillreelError, StillreelResult};

/// Where [`FfmpegSink`] writes the video.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Destination `.mp4` file.
    pub out_path: PathBuf,
    /// Replace `out_path` when it exists; otherwise `begin` refuses to start.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Write to `out_path`, replacing any existing file.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// H.264 MP4 sink: canvas frames go as raw `rgb24` into a spawned `ffmpeg`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    encoder: Option<EncoderProcess>,
    canvas: Option<CanvasSize>,
    prev_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            canvas: None,
            prev_idx: None,
        }
    }

    /// Video file this sink produces.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()> {
        if self.encoder.is_some() {
            return Err(StillreelError::validation("video encoder already running"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StillreelError::validation(format!(
                "cannot encode a {}x{} canvas",
                cfg.width, cfg.height
            )));
        }

        let out = &self.opts.out_path;
        ensure_parent_dir(out)?;
        if !self.opts.overwrite && out.exists() {
            return Err(StillreelError::validation(format!(
                "refusing to replace existing video '{}'",
                out.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(StillreelError::encode(
                "writing MP4 needs `ffmpeg`, which is not on PATH",
            ));
        }

        let encoder = EncoderProcess::spawn(encoder_args(cfg, out, self.opts.overwrite))?;
        tracing::debug!(
            out = %out.display(),
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps.get(),
            pix_fmt = output_pix_fmt(cfg.width, cfg.height),
            "encoder started"
        );

        self.encoder = Some(encoder);
        self.canvas = Some(CanvasSize::new(cfg.height, cfg.width));
        self.prev_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb) -> StillreelResult<()> {
        let (Some(canvas), Some(encoder)) = (self.canvas, self.encoder.as_mut()) else {
            return Err(StillreelError::encode("video encoder not running"));
        };
        if let Some(prev) = self.prev_idx
            && idx <= prev
        {
            return Err(StillreelError::encode(format!(
                "frame {} arrived after frame {}",
                idx.0, prev.0
            )));
        }
        if frame.size() != canvas || frame.data.len() != canvas.rgb8_len() {
            return Err(StillreelError::validation(format!(
                "frame {} is {}x{} ({} bytes), canvas is {}x{}",
                idx.0,
                frame.width,
                frame.height,
                frame.data.len(),
                canvas.max_width,
                canvas.max_height
            )));
        }

        encoder.write(&frame.data)?;
        self.prev_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> StillreelResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| StillreelError::encode("video encoder not running"))?;
        self.canvas = None;

        encoder.finish()?;
        tracing::debug!(out = %self.opts.out_path.display(), "encoder finished");
        Ok(())
    }
}

/// A running `ffmpeg` child. Dropping it closes stdin and reaps the process, so an
/// abandoned sink never leaves a zombie behind.
struct EncoderProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    log: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl EncoderProcess {
    fn spawn(args: Vec<OsString>) -> StillreelResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StillreelError::encode(format!("could not start ffmpeg: {e}")))?;

        let stdin = child.stdin.take();
        // Drained on its own thread; a full stderr pipe would stall the encoder.
        let log = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                stderr.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });
        Ok(Self { child, stdin, log })
    }

    fn write(&mut self, bytes: &[u8]) -> StillreelResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| StillreelError::encode("ffmpeg input is closed"))?;
        stdin
            .write_all(bytes)
            .map_err(|e| StillreelError::encode(format!("ffmpeg stopped accepting frames: {e}")))
    }

    /// Close the input and wait; a non-zero exit becomes an error carrying ffmpeg's log.
    fn finish(mut self) -> StillreelResult<()> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| StillreelError::encode(format!("waiting for ffmpeg: {e}")))?;
        let log = self.collect_log();
        if status.success() {
            return Ok(());
        }
        Err(StillreelError::encode(format!(
            "ffmpeg exited with {status}: {}",
            log.trim()
        )))
    }

    fn collect_log(&mut self) -> String {
        match self.log.take().map(JoinHandle::join) {
            Some(Ok(Ok(bytes))) => String::from_utf8_lossy(&bytes).into_owned(),
            _ => String::new(),
        }
    }
}

impl Drop for EncoderProcess {
    fn drop(&mut self) {
        drop(self.stdin.take());
        let _ = self.child.wait();
        let _ = self.collect_log();
    }
}

/// `ffmpeg` arguments for one run: `rgb24` frames of the sink canvas on stdin, H.264 MP4 at
/// `out_path`.
pub(crate) fn encoder_args(cfg: SinkConfig, out_path: &Path, overwrite: bool) -> Vec<OsString> {
    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = cfg.fps.get().to_string();
    let replace = if overwrite { "-y" } else { "-n" };

    // `-r` must come before `-i` to set the rawvideo input rate.
    let mut args: Vec<OsString> = [
        replace,
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgb24",
        "-s",
        size.as_str(),
        "-r",
        rate.as_str(),
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        output_pix_fmt(cfg.width, cfg.height),
        "-movflags",
        "+faststart",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(out_path.as_os_str().to_owned());
    args
}

/// Encoder pixel format for a `width x height` stream.
///
/// 4:2:0 chroma subsampling needs even dimensions. The canvas size comes from the input
/// images, so odd sizes fall back to 4:4:4 instead of being padded or cropped.
pub fn output_pix_fmt(width: u32, height: u32) -> &'static str {
    if width.is_multiple_of(2) && height.is_multiple_of(2) {
        "yuv420p"
    } else {
        "yuv444p"
    }
}

/// Create the directory that will hold `path`, if any.
pub fn ensure_parent_dir(path: &Path) -> StillreelResult<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    use anyhow::Context as _;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create output directory '{}'", parent.display()))?;
    Ok(())
}

/// `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
