use std::path::{Path, PathBuf};

use crate::foundation::error::{StillreelError, StillreelResult};

/// Input file extensions the loader accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    /// `*.png`
    #[default]
    Png,
    /// `*.jpg`
    Jpg,
}

impl ImageExtension {
    /// Extension text without the leading dot.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.as_str()))
    }
}

impl std::str::FromStr for ImageExtension {
    type Err = StillreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.') {
            "png" => Ok(Self::Png),
            "jpg" => Ok(Self::Jpg),
            other => Err(StillreelError::validation(format!(
                "unsupported image extension '{other}' (expected \"png\" or \"jpg\")"
            ))),
        }
    }
}

impl std::fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// List the files in `dir` (non-recursive) with extension `ext`, sorted by file name.
///
/// Directory listing order is platform dependent, so the result is always sorted to keep the
/// frame order reproducible.
pub fn discover_images(dir: &Path, ext: ImageExtension) -> StillreelResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| StillreelError::load(dir, e))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StillreelError::load(dir, e))?;
        let path = entry.path();
        if path.is_file() && ext.matches(&path) {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/discover.rs"]
mod tests;
