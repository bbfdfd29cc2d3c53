use crate::foundation::error::{StillreelError, StillreelResult};

/// 0-based position of a frame in the output stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Integer frame rate used for encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps(u32);

impl Fps {
    /// Build a frame rate, rejecting zero.
    pub fn new(fps: u32) -> StillreelResult<Self> {
        if fps == 0 {
            return Err(StillreelError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Size shared by every frame of one run: the component-wise maximum of all source sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Canvas rows.
    pub max_height: u32,
    /// Canvas columns.
    pub max_width: u32,
}

impl CanvasSize {
    /// Build a canvas size from `(height, width)`.
    pub fn new(max_height: u32, max_width: u32) -> Self {
        Self {
            max_height,
            max_width,
        }
    }

    /// Number of bytes in one RGB8 frame of this size.
    pub fn rgb8_len(self) -> usize {
        self.max_height as usize * self.max_width as usize * 3
    }
}

/// One finished RGB8 frame, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// Take ownership of an `image` buffer.
    pub fn from_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Canvas size of this frame.
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.height, self.width)
    }

    /// RGB value at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} frame",
            self.width,
            self.height
        );
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
