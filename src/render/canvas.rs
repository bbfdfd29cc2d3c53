use std::path::Path;

use crate::foundation::{
    core::CanvasSize,
    error::{StillreelError, StillreelResult},
};

/// Component-wise maximum over `(height, width)` pairs.
///
/// `source` only names the input set in the [`StillreelError::NoImages`] raised for an empty
/// iterator.
pub fn canvas_size(
    dims: impl IntoIterator<Item = (u32, u32)>,
    source: &Path,
) -> StillreelResult<CanvasSize> {
    let mut dims = dims.into_iter();
    let Some((h0, w0)) = dims.next() else {
        return Err(StillreelError::NoImages {
            dir: source.to_path_buf(),
        });
    };

    let (max_height, max_width) = dims.fold((h0, w0), |(mh, mw), (h, w)| (mh.max(h), mw.max(w)));
    Ok(CanvasSize::new(max_height, max_width))
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
