//! Error types for the alpha-threshold crate.

use std::path::PathBuf;

/// Errors that can occur while thresholding an image's alpha channel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The threshold lies outside `[0, 1]` (or is NaN).
    #[error("threshold {0} must be between 0 and 1")]
    InvalidThreshold(f32),

    /// The image has no alpha channel.
    #[error("image must have an alpha channel (RGBA), found {channels} channel(s)")]
    MissingAlphaChannel {
        /// Number of channels the input actually carries.
        channels: u8,
    },

    /// The input file could not be read or decoded.
    #[error("failed to read image {}: {source}", .path.display())]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// Underlying codec error.
        source: image::ImageError,
    },

    /// The output file could not be encoded or written.
    #[error("failed to save image {}: {source}", .path.display())]
    Encode {
        /// Destination that failed to encode.
        path: PathBuf,
        /// Underlying codec error.
        source: image::ImageError,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pixel data did not match the expected `(height, width, 4)` layout.
    #[error("buffer shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
