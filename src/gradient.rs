//! Demo image with a horizontal alpha ramp.
//!
//! Useful for seeing where a given threshold cuts: after processing, every
//! column left of `threshold * (size - 1)` is transparent.

use std::path::Path;

use ndarray::Array3;

use crate::buffer::{self, SampleDepth};
use crate::error::Result;
use crate::threshold::RGBA_CHANNELS;

/// Side length of the default demo image.
pub const DEFAULT_GRADIENT_SIZE: usize = 512;

/// Fill color of the demo image (a purple).
pub const GRADIENT_RGB: [f32; 3] = [0.5, 0.2, 0.7];

/// Build a `size x size` RGBA buffer whose alpha rises linearly from 0 on the
/// left column to 1 on the right column.
#[must_use]
pub fn gradient_image(size: usize) -> Array3<f32> {
    #[allow(clippy::cast_precision_loss)]
    let last = size.saturating_sub(1).max(1) as f32;
    Array3::from_shape_fn((size, size, RGBA_CHANNELS), |(_, x, c)| match c {
        0..=2 => GRADIENT_RGB[c],
        #[allow(clippy::cast_precision_loss)]
        _ => x as f32 / last,
    })
}

/// Write the demo image to `path` as 8-bit RGBA.
///
/// # Errors
///
/// Returns an error if the format cannot store alpha or encoding fails.
pub fn save_gradient_image(path: &Path, size: usize) -> Result<()> {
    buffer::save_rgba(&gradient_image(size), SampleDepth::Eight, path)
}
