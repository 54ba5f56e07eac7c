//! Conversion between decoded images and `(height, width, 4)` float buffers.
//!
//! Integer samples are normalized to `[0, 1]` before thresholding: 8-bit
//! samples are divided by 255, 16-bit samples by 65535. Float samples are
//! clamped into `[0, 1]`. Writing reverses this with rounding.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{
    ColorType, DynamicImage, ImageBuffer, ImageError, ImageFormat, ImageReader, ImageResult, Rgba,
    RgbaImage,
};
use ndarray::{Array3, ErrorKind, ShapeError};

use crate::error::{Error, Result};
use crate::threshold::RGBA_CHANNELS;

/// Storage depth of the samples an image was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDepth {
    /// 8 bits per sample (`0..=255`).
    Eight,
    /// 16 bits per sample (`0..=65535`).
    Sixteen,
    /// 32-bit float samples.
    Float,
}

impl SampleDepth {
    /// Largest integer sample value for this depth, `1.0` for float.
    #[must_use]
    pub fn max_value(self) -> f32 {
        match self {
            Self::Eight => f32::from(u8::MAX),
            Self::Sixteen => f32::from(u16::MAX),
            Self::Float => 1.0,
        }
    }

    /// Map a raw sample of this depth into `[0, 1]`.
    #[must_use]
    pub fn normalize(self, raw: f32) -> f32 {
        (raw / self.max_value()).clamp(0.0, 1.0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * f32::from(u8::MAX)).round() as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize_u16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * f32::from(u16::MAX)).round() as u16
}

fn overflow() -> Error {
    Error::Shape(ShapeError::from_kind(ErrorKind::Overflow))
}

/// Convert a decoded image into a normalized RGBA buffer.
///
/// Gray+alpha images are expanded to RGBA with the luma copied into R, G and B.
///
/// # Errors
///
/// Returns [`Error::MissingAlphaChannel`] if the image's color type carries
/// no alpha channel.
pub fn to_rgba_buffer(img: &DynamicImage) -> Result<(Array3<f32>, SampleDepth)> {
    let color = img.color();
    if !color.has_alpha() {
        return Err(Error::MissingAlphaChannel {
            channels: color.channel_count(),
        });
    }

    let shape = (img.height() as usize, img.width() as usize, RGBA_CHANNELS);

    match color {
        ColorType::La8 | ColorType::Rgba8 => {
            let depth = SampleDepth::Eight;
            let samples: Vec<f32> = img
                .to_rgba8()
                .into_raw()
                .into_iter()
                .map(|v| depth.normalize(f32::from(v)))
                .collect();
            Ok((Array3::from_shape_vec(shape, samples)?, depth))
        }
        ColorType::La16 | ColorType::Rgba16 => {
            let depth = SampleDepth::Sixteen;
            let samples: Vec<f32> = img
                .to_rgba16()
                .into_raw()
                .into_iter()
                .map(|v| depth.normalize(f32::from(v)))
                .collect();
            Ok((Array3::from_shape_vec(shape, samples)?, depth))
        }
        _ => {
            let depth = SampleDepth::Float;
            let samples: Vec<f32> = img
                .to_rgba32f()
                .into_raw()
                .into_iter()
                .map(|v| depth.normalize(v))
                .collect();
            Ok((Array3::from_shape_vec(shape, samples)?, depth))
        }
    }
}

/// Convert a normalized RGBA buffer back into an image of the given depth.
///
/// 8-bit depth produces `Rgba8`; 16-bit and float produce `Rgba16`.
///
/// # Errors
///
/// Returns [`Error::MissingAlphaChannel`] if the last axis is not 4 wide and
/// [`Error::Shape`] if the dimensions do not fit an image.
pub fn from_rgba_buffer(buffer: &Array3<f32>, depth: SampleDepth) -> Result<DynamicImage> {
    let (height, width, channels) = buffer.dim();
    if channels != RGBA_CHANNELS {
        return Err(Error::MissingAlphaChannel {
            channels: u8::try_from(channels).unwrap_or(u8::MAX),
        });
    }
    let width = u32::try_from(width).map_err(|_| overflow())?;
    let height = u32::try_from(height).map_err(|_| overflow())?;

    let img = match depth {
        SampleDepth::Eight => {
            let raw: Vec<u8> = buffer.iter().map(|&v| quantize_u8(v)).collect();
            RgbaImage::from_raw(width, height, raw).map(DynamicImage::ImageRgba8)
        }
        SampleDepth::Sixteen | SampleDepth::Float => {
            let raw: Vec<u16> = buffer.iter().map(|&v| quantize_u16(v)).collect();
            ImageBuffer::<Rgba<u16>, _>::from_raw(width, height, raw)
                .map(DynamicImage::ImageRgba16)
        }
    };

    img.ok_or_else(overflow)
}

/// Depth to encode with for `format`, or `None` if it cannot store alpha.
fn output_depth(format: ImageFormat, depth: SampleDepth) -> Option<SampleDepth> {
    match format {
        ImageFormat::Png | ImageFormat::Tiff => Some(depth),
        ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Tga => Some(SampleDepth::Eight),
        _ => None,
    }
}

/// Check if a path's extension names a format that can store an alpha channel.
#[must_use]
pub fn is_alpha_capable(path: &Path) -> bool {
    ImageFormat::from_path(path)
        .ok()
        .and_then(|format| output_depth(format, SampleDepth::Eight))
        .is_some()
}

/// Format and depth `save_rgba` writes for `path`.
///
/// Extensions that cannot store alpha (or are unknown) fall back to PNG.
#[must_use]
pub fn output_format(path: &Path, depth: SampleDepth) -> (ImageFormat, SampleDepth) {
    ImageFormat::from_path(path)
        .ok()
        .and_then(|format| output_depth(format, depth).map(|d| (format, d)))
        .unwrap_or((ImageFormat::Png, depth))
}

/// Decode an image file into a normalized RGBA buffer.
///
/// The format is sniffed from the file contents, so PNG data behind another
/// extension still decodes.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be read or decoded, and
/// [`Error::MissingAlphaChannel`] if it has no alpha channel.
pub fn load_rgba(path: &Path) -> Result<(Array3<f32>, SampleDepth)> {
    let decode_err = |source| Error::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| decode_err(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;
    to_rgba_buffer(&img)
}

fn write_encoded(img: &DynamicImage, format: ImageFormat, path: &Path) -> ImageResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    img.write_to(&mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode a normalized RGBA buffer to `path`.
///
/// The format comes from the extension, see [`output_format`]. PNG and TIFF
/// keep 16-bit depth; WebP, BMP and TGA are written as 8-bit. If encoding
/// fails and this call created the file, the partial file is removed; a file
/// that existed beforehand is never deleted.
///
/// # Errors
///
/// Returns [`Error::Encode`] if encoding, writing or flushing fails.
pub fn save_rgba(buffer: &Array3<f32>, depth: SampleDepth, path: &Path) -> Result<()> {
    let (format, depth) = output_format(path, depth);
    let img = from_rgba_buffer(buffer, depth)?;

    let existed = path.symlink_metadata().is_ok();
    if let Err(source) = write_encoded(&img, format, path) {
        if !existed && path.exists() {
            if let Err(e) = std::fs::remove_file(path) {
                log::warn!("Failed to remove partial output {}: {e}", path.display());
            }
        }
        return Err(Error::Encode {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
