//! File-level pipeline: load, threshold, save.

use std::path::{Path, PathBuf};

use crate::buffer;
use crate::error::{Error, Result};
use crate::threshold::{self, TranslucencyReport};

/// Default alpha threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Default suffix inserted before the output file's extension.
pub const DEFAULT_SUFFIX: &str = "_processed";

/// Options controlling how a file is processed.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Alpha threshold (0.0-1.0). Samples strictly above it become opaque.
    pub threshold: f32,
    /// Suffix for the output filename.
    pub suffix: String,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// Outcome of processing a single image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    /// Path of the input file.
    pub input: PathBuf,
    /// Path the processed image was written to.
    pub output: PathBuf,
    /// Whether the input had translucent pixels.
    pub translucent_before: bool,
    /// Whether the output has translucent pixels.
    pub translucent_after: bool,
}

/// Process a single image file: load, threshold, save.
///
/// The threshold is checked before the input is read. If the output
/// extension cannot store alpha the file is written as PNG data.
///
/// # Errors
///
/// Returns [`Error::InvalidThreshold`], [`Error::Decode`],
/// [`Error::MissingAlphaChannel`], [`Error::Io`] or [`Error::Encode`].
/// On failure no output file is left behind, and neither are any parent
/// directories this call created.
pub fn process_file(input: &Path, output: &Path, threshold: f32) -> Result<ProcessReport> {
    threshold::validate_threshold(threshold)?;

    let (mut image, depth) = buffer::load_rgba(input)?;
    let (height, width, _) = image.dim();
    log::debug!(
        "Loaded {} ({width}x{height}, {depth:?} samples)",
        input.display()
    );

    let TranslucencyReport { before, after } =
        threshold::apply_threshold_in_place(&mut image, threshold)?;
    log::info!("Translucent pixels present (pre-processing): {before}");
    log::info!("Translucent pixels present (post-processing): {after}");

    if !buffer::is_alpha_capable(output) {
        log::warn!(
            "{} cannot store an alpha channel, writing PNG data",
            output.display()
        );
    }

    let created = create_parent_dirs(output)?;
    if let Err(e) = buffer::save_rgba(&image, depth, output) {
        remove_created_dirs(&created);
        return Err(e);
    }
    log::info!("Processed image saved to: {}", output.display());

    Ok(ProcessReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        translucent_before: before,
        translucent_after: after,
    })
}

/// Create the missing parent directories of `output`, deepest first in the
/// returned list.
fn create_parent_dirs(output: &Path) -> Result<Vec<PathBuf>> {
    let Some(parent) = output.parent() else {
        return Ok(Vec::new());
    };
    let missing: Vec<PathBuf> = parent
        .ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .map(Path::to_path_buf)
        .collect();
    if !missing.is_empty() {
        std::fs::create_dir_all(parent).map_err(Error::Io)?;
    }
    Ok(missing)
}

fn remove_created_dirs(created: &[PathBuf]) {
    for dir in created {
        if let Err(e) = std::fs::remove_dir(dir) {
            log::warn!("Failed to remove directory {}: {e}", dir.display());
            return;
        }
    }
}

/// Process an image, writing next to it with [`ProcessOptions::suffix`] appended.
///
/// # Errors
///
/// Same as [`process_file`].
pub fn process_image(input: &Path, opts: &ProcessOptions) -> Result<ProcessReport> {
    let output = default_output_path(input, &opts.suffix);
    process_file(input, &output, opts.threshold)
}

/// Generate an output path by inserting `suffix` before the extension.
///
/// Example: `"sprite.png"` with `"_processed"` becomes `"sprite_processed.png"`.
#[must_use]
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new(""));
    match input.extension() {
        Some(ext) => parent.join(format!("{stem}{suffix}.{}", ext.to_string_lossy())),
        None => parent.join(format!("{stem}{suffix}")),
    }
}

/// Pick the output path: `explicit` if given, else [`default_output_path`].
#[must_use]
pub fn resolve_output_path(input: &Path, explicit: Option<&Path>, suffix: &str) -> PathBuf {
    explicit.map_or_else(|| default_output_path(input, suffix), Path::to_path_buf)
}
