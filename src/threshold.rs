//! Alpha thresholding over in-memory RGBA buffers.
//!
//! Every alpha sample strictly above the threshold becomes fully opaque (`1.0`),
//! every other sample becomes fully transparent (`0.0`):
//! `alpha' = if alpha > threshold { 1 } else { 0 }`
//!
//! Buffers are `(height, width, 4)` arrays of samples in `[0, 1]`. Nothing in
//! this module touches the file system or logs.

use ndarray::{Array3, ArrayView2, Axis};

use crate::error::{Error, Result};

/// Number of channels in an RGBA buffer.
pub const RGBA_CHANNELS: usize = 4;

/// Index of the alpha channel along the last axis.
pub const ALPHA_CHANNEL: usize = 3;

/// Translucency status of an alpha channel before and after thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslucencyReport {
    /// Whether the input contained any translucent pixels.
    pub before: bool,
    /// Whether the output contains any translucent pixels. Always `false`.
    pub after: bool,
}

/// A thresholded copy of an image together with its translucency status.
#[derive(Debug, Clone)]
pub struct Thresholded {
    /// The processed `(height, width, 4)` buffer.
    pub image: Array3<f32>,
    /// Whether the input contained any translucent pixels.
    pub translucent_before: bool,
    /// Whether the output contains any translucent pixels.
    pub translucent_after: bool,
}

/// Check whether an alpha channel contains translucent pixels.
///
/// A sample is translucent when `0 < sample < 1`. Empty channels and channels
/// holding only `0` and `1` are not translucent.
#[must_use]
pub fn has_translucent_pixels(alpha: ArrayView2<'_, f32>) -> bool {
    alpha.iter().any(|&a| a > 0.0 && a < 1.0)
}

/// Ensure a threshold lies in `[0, 1]`.
///
/// # Errors
///
/// Returns [`Error::InvalidThreshold`] for values outside the range, including NaN.
pub fn validate_threshold(threshold: f32) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(Error::InvalidThreshold(threshold))
    }
}

fn validate_channels(image: &Array3<f32>) -> Result<()> {
    let channels = image.len_of(Axis(2));
    if channels == RGBA_CHANNELS {
        Ok(())
    } else {
        Err(Error::MissingAlphaChannel {
            channels: u8::try_from(channels).unwrap_or(u8::MAX),
        })
    }
}

/// Threshold the alpha channel of an RGBA buffer, returning a new buffer.
///
/// The input is left untouched. Red, green and blue samples are copied
/// bit-for-bit; only alpha changes.
///
/// # Errors
///
/// Returns [`Error::InvalidThreshold`] if `threshold` is outside `[0, 1]` and
/// [`Error::MissingAlphaChannel`] if the last axis is not exactly 4 wide.
pub fn apply_threshold(image: &Array3<f32>, threshold: f32) -> Result<Thresholded> {
    validate_threshold(threshold)?;
    validate_channels(image)?;

    let mut processed = image.clone();
    let report = threshold_alpha(&mut processed, threshold);

    Ok(Thresholded {
        image: processed,
        translucent_before: report.before,
        translucent_after: report.after,
    })
}

/// Threshold the alpha channel of an RGBA buffer in place.
///
/// Both preconditions are checked before any sample is written, so on error
/// the buffer is unchanged.
///
/// # Errors
///
/// Same as [`apply_threshold`].
pub fn apply_threshold_in_place(
    image: &mut Array3<f32>,
    threshold: f32,
) -> Result<TranslucencyReport> {
    validate_threshold(threshold)?;
    validate_channels(image)?;
    Ok(threshold_alpha(image, threshold))
}

fn threshold_alpha(image: &mut Array3<f32>, threshold: f32) -> TranslucencyReport {
    let mut alpha = image.index_axis_mut(Axis(2), ALPHA_CHANNEL);
    let before = has_translucent_pixels(alpha.view());

    alpha.mapv_inplace(|a| if a > threshold { 1.0 } else { 0.0 });

    let after = has_translucent_pixels(alpha.view());
    TranslucencyReport { before, after }
}
