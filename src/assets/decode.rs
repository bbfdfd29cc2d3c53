use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use image::ImageDecoder as _;

use crate::foundation::error::{StillreelError, StillreelResult};

/// A decoded source image: RGB8 pixels plus where it came from.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Discovery index, which is also the frame order.
    pub index: usize,
    /// File the pixels were decoded from.
    pub path: PathBuf,
    /// Decoded pixels, alpha dropped.
    pub pixels: image::RgbImage,
}

impl SourceImage {
    /// Build a source image from pixels that are already in memory.
    pub fn new(index: usize, path: impl Into<PathBuf>, pixels: image::RgbImage) -> Self {
        Self {
            index,
            path: path.into(),
            pixels,
        }
    }

    /// Rows.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Columns.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }
}

/// Decode the image at `path` into RGB8.
///
/// The decoder is picked from the file extension; unknown extensions fall back to sniffing the
/// file header. Any alpha channel is discarded.
pub fn load_image(path: &Path, index: usize) -> StillreelResult<SourceImage> {
    let reader = open_reader(path)?;
    let decoded = reader
        .decode()
        .map_err(|e| StillreelError::load(path, format!("decode failed: {e}")))?;

    Ok(SourceImage {
        index,
        path: path.to_path_buf(),
        pixels: decoded.to_rgb8(),
    })
}

/// Read only the header of the image at `path` and return `(height, width)`.
pub fn probe_dimensions(path: &Path) -> StillreelResult<(u32, u32)> {
    let (height, width, _) = probe_shape(path)?;
    Ok((height, width))
}

/// Read only the header of the image at `path` and return `(height, width, channels)`.
///
/// `channels` is the stored channel count (4 for RGBA, 1 for grayscale), before the
/// conversion to RGB8 that [`load_image`] performs.
pub fn probe_shape(path: &Path) -> StillreelResult<(u32, u32, u8)> {
    let decoder = open_reader(path)?
        .into_decoder()
        .map_err(|e| StillreelError::load(path, format!("read header failed: {e}")))?;
    let (width, height) = decoder.dimensions();
    Ok((height, width, decoder.color_type().channel_count()))
}

fn open_reader(path: &Path) -> StillreelResult<image::ImageReader<BufReader<File>>> {
    let mut reader = image::ImageReader::open(path).map_err(|e| StillreelError::load(path, e))?;
    match image::ImageFormat::from_path(path) {
        Ok(format) => reader.set_format(format),
        Err(_) => {
            reader = reader
                .with_guessed_format()
                .map_err(|e| StillreelError::load(path, e))?;
        }
    }
    Ok(reader)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
