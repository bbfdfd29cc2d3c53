use std::path::PathBuf;

/// Convenience result type used across Stillreel.
pub type StillreelResult<T> = Result<T, StillreelError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum StillreelError {
    /// A file or directory could not be found, read or decoded.
    #[error("load error: '{}': {reason}", path.display())]
    Load {
        /// Offending file or directory.
        path: PathBuf,
        /// Underlying failure, rendered as text.
        reason: String,
    },

    /// The input set contained no images.
    #[error("no images found in '{}'", dir.display())]
    NoImages {
        /// Directory (or source description) that was searched.
        dir: PathBuf,
    },

    /// Background selector was not one of the recognized modes.
    #[error("unknown background mode '{0}' (expected \"noise\" or \"black\")")]
    UnknownBackgroundMode(String),

    /// A source image has a zero dimension or scales to zero columns.
    #[error("degenerate image #{index} '{}': {detail}", path.display())]
    DegenerateImage {
        /// Offending file.
        path: PathBuf,
        /// Discovery index of the file.
        index: usize,
        /// What made the image unusable.
        detail: String,
    },

    /// Invalid user-provided configuration or API misuse.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures talking to the video encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StillreelError {
    /// Build a [`StillreelError::Load`] value.
    pub fn load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`StillreelError::DegenerateImage`] value.
    pub fn degenerate(path: impl Into<PathBuf>, index: usize, detail: impl Into<String>) -> Self {
        Self::DegenerateImage {
            path: path.into(),
            index,
            detail: detail.into(),
        }
    }

    /// Build a [`StillreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StillreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
