use image::imageops::{self, FilterType};

use crate::{
    assets::decode::SourceImage,
    foundation::{
        core::{CanvasSize, FrameRgb},
        error::{StillreelError, StillreelResult},
    },
    render::background::BackgroundProvider,
};

/// Size a source is resized to before it is placed on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaledSize {
    /// Always the canvas height.
    pub rows: u32,
    /// `min(canvas width, floor(canvas height / ratio))`.
    pub cols: u32,
}

/// Per-frame diagnostics collected while compositing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// Discovery index of the source.
    pub index: usize,
    /// Size the source was resized to.
    pub scaled: ScaledSize,
    /// Column where the scaled image starts.
    pub offset_x: u32,
    /// Row where the scaled image starts.
    pub offset_y: u32,
    /// Smallest channel value in the scaled image.
    pub min_value: u8,
    /// Largest channel value in the scaled image.
    pub max_value: u8,
    /// Source height divided by source width.
    pub ratio: f64,
}

/// A finished frame with the diagnostics gathered while building it.
#[derive(Clone, Debug)]
pub struct CompositedFrame {
    /// Pixels, exactly the canvas size.
    pub frame: FrameRgb,
    /// What happened to the source.
    pub stats: FrameStats,
}

/// Scaled size of a `src_height x src_width` source on `canvas`.
///
/// The height always becomes the canvas height; the width follows the aspect ratio and is then
/// clipped to the canvas width, which stretches sources that are wider than the canvas ratio.
/// `floor(max_height / (src_height / src_width))` is evaluated exactly in integers.
///
/// Returns `None` when either source dimension is zero or the result has no columns.
pub fn scaled_size(src_height: u32, src_width: u32, canvas: CanvasSize) -> Option<ScaledSize> {
    if src_height == 0 || src_width == 0 || canvas.max_height == 0 {
        return None;
    }

    let fit = u64::from(canvas.max_height) * u64::from(src_width) / u64::from(src_height);
    let cols = fit.min(u64::from(canvas.max_width)) as u32;
    if cols == 0 {
        return None;
    }

    Some(ScaledSize {
        rows: canvas.max_height,
        cols,
    })
}

/// `(delta_x, delta_y)` that centers `scaled` on `canvas`, rounding down.
pub fn centering_offsets(canvas: CanvasSize, scaled: ScaledSize) -> (u32, u32) {
    (
        canvas.max_width.saturating_sub(scaled.cols) / 2,
        canvas.max_height.saturating_sub(scaled.rows) / 2,
    )
}

/// Scale `image` to the canvas height, center it on a fresh background and return the frame.
pub fn composite_frame(
    image: &SourceImage,
    canvas: CanvasSize,
    background: &mut dyn BackgroundProvider,
) -> StillreelResult<CompositedFrame> {
    let (src_h, src_w) = (image.height(), image.width());
    let scaled = scaled_size(src_h, src_w, canvas).ok_or_else(|| {
        StillreelError::degenerate(
            &image.path,
            image.index,
            format!("{src_h}x{src_w} (rows x cols) cannot be scaled onto {canvas:?}"),
        )
    })?;
    let ratio = f64::from(src_h) / f64::from(src_w);

    // Triangle widens its support when shrinking, which gives the anti-aliasing; values stay in
    // 0..=255 and are not renormalized.
    let resized = if (scaled.cols, scaled.rows) == image.pixels.dimensions() {
        image.pixels.clone()
    } else {
        imageops::resize(&image.pixels, scaled.cols, scaled.rows, FilterType::Triangle)
    };

    let (min_value, max_value) = resized
        .as_raw()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let (offset_x, offset_y) = centering_offsets(canvas, scaled);
    let mut out = background.canvas(canvas);
    imageops::replace(&mut out, &resized, i64::from(offset_x), i64::from(offset_y));

    Ok(CompositedFrame {
        frame: FrameRgb::from_image(out),
        stats: FrameStats {
            index: image.index,
            scaled,
            offset_x,
            offset_y,
            min_value,
            max_value,
            ratio,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
