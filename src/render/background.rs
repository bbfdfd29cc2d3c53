use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::foundation::{core::CanvasSize, error::StillreelError};

/// Recognized background selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundMode {
    /// Independent uniform random value per channel per pixel, redrawn every frame.
    Noise,
    /// All zero.
    Black,
}

impl BackgroundMode {
    /// Selector text accepted by [`str::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noise => "noise",
            Self::Black => "black",
        }
    }
}

impl std::str::FromStr for BackgroundMode {
    type Err = StillreelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "noise" => Ok(Self::Noise),
            "black" => Ok(Self::Black),
            other => Err(StillreelError::UnknownBackgroundMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of frame backgrounds.
///
/// Every call to [`BackgroundProvider::fill`] must overwrite every byte of the canvas.
pub trait BackgroundProvider {
    /// Overwrite `canvas` with a background.
    fn fill(&mut self, canvas: &mut image::RgbImage);

    /// Allocate a fresh canvas of `size` and fill it.
    fn canvas(&mut self, size: CanvasSize) -> image::RgbImage {
        let mut canvas = image::RgbImage::new(size.max_width, size.max_height);
        self.fill(&mut canvas);
        canvas
    }
}

/// Uniform color background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidBackground(pub [u8; 3]);

impl SolidBackground {
    /// `[0, 0, 0]` everywhere.
    pub const BLACK: Self = Self([0, 0, 0]);
}

impl BackgroundProvider for SolidBackground {
    fn fill(&mut self, canvas: &mut image::RgbImage) {
        for px in canvas.pixels_mut() {
            *px = image::Rgb(self.0);
        }
    }
}

/// Per-pixel random background, re-randomized on every fill.
#[derive(Clone, Debug)]
pub struct NoiseBackground<R = StdRng> {
    rng: R,
}

impl NoiseBackground<StdRng> {
    /// Noise seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible noise.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> NoiseBackground<R> {
    /// Noise drawn from a caller-provided generator.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> BackgroundProvider for NoiseBackground<R> {
    fn fill(&mut self, canvas: &mut image::RgbImage) {
        let bytes: &mut [u8] = canvas;
        self.rng.fill(bytes);
    }
}

/// Provider for a configured mode. `seed` only affects [`BackgroundMode::Noise`].
pub fn background_for_mode(mode: BackgroundMode, seed: Option<u64>) -> Box<dyn BackgroundProvider> {
    match (mode, seed) {
        (BackgroundMode::Black, _) => Box::new(SolidBackground::BLACK),
        (BackgroundMode::Noise, Some(seed)) => Box::new(NoiseBackground::seeded(seed)),
        (BackgroundMode::Noise, None) => Box::new(NoiseBackground::from_entropy()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
