use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    assets::discover::ImageExtension,
    foundation::{
        core::Fps,
        error::{StillreelError, StillreelResult},
    },
    render::background::BackgroundMode,
};

/// Frame rate used when none is configured.
pub const DEFAULT_FPS: u32 = 4;
/// Output file name used when none is configured.
pub const DEFAULT_VIDEO_FILENAME: &str = "video.mp4";

/// Everything a run needs, as read from the command line or a JSON file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StillreelConfig {
    /// Directory holding the source images.
    pub input_path: PathBuf,
    /// Directory the video is written to; created if absent. `None` means the working directory.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Which files to pick up.
    #[serde(default)]
    pub image_extension: ImageExtension,
    /// Output file name inside `output_path`.
    #[serde(default = "default_video_filename")]
    pub video_filename: String,
    /// `"noise"` or `"black"`. Kept as text so a bad value surfaces as
    /// [`StillreelError::UnknownBackgroundMode`].
    #[serde(default = "default_background_color")]
    pub background_color: String,
    /// Output frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Seed for reproducible noise backgrounds.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Replace an existing output file.
    #[serde(default = "default_true")]
    pub overwrite: bool,
    /// Emit per-image diagnostics.
    #[serde(default)]
    pub verbose: bool,
}

fn default_video_filename() -> String {
    DEFAULT_VIDEO_FILENAME.to_string()
}

fn default_background_color() -> String {
    BackgroundMode::Noise.as_str().to_string()
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_true() -> bool {
    true
}

impl StillreelConfig {
    /// Config with defaults for everything but the input directory.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            image_extension: ImageExtension::default(),
            video_filename: default_video_filename(),
            background_color: default_background_color(),
            fps: DEFAULT_FPS,
            seed: None,
            overwrite: true,
            verbose: false,
        }
    }

    /// Read a JSON config file.
    pub fn from_path(path: &Path) -> StillreelResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Check every option that can be checked without touching the input directory.
    pub fn validate(&self) -> StillreelResult<()> {
        self.background_mode()?;
        self.fps()?;
        if self.video_filename.trim().is_empty() {
            return Err(StillreelError::validation("video filename must not be empty"));
        }
        Ok(())
    }

    /// Parsed background selector.
    pub fn background_mode(&self) -> StillreelResult<BackgroundMode> {
        self.background_color.parse()
    }

    /// Validated frame rate.
    pub fn fps(&self) -> StillreelResult<Fps> {
        Fps::new(self.fps)
    }

    /// Where the video is written: `output_path/video_filename`, or just the file name.
    pub fn video_path(&self) -> PathBuf {
        match &self.output_path {
            Some(dir) => dir.join(&self.video_filename),
            None => PathBuf::from(&self.video_filename),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
