//! Turn translucent pixels into a binary transparency mask.
//!
//! Every alpha sample strictly above a threshold becomes fully opaque, every
//! other sample becomes fully transparent. Red, green and blue are untouched.
//! The crate also reports whether the image had translucent pixels before and
//! after processing (after is always `false`).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use alpha_threshold::{process_image, ProcessOptions};
//!
//! let report = process_image(Path::new("sprite.png"), &ProcessOptions::default())
//!     .expect("failed to process");
//! println!("translucent before: {}", report.translucent_before);
//! println!("written to: {}", report.output.display());
//! ```
//!
//! # In-memory buffers
//!
//! The thresholding core works on `(height, width, 4)` [`ndarray`] buffers
//! and never touches the file system.
//!
//! ```
//! use alpha_threshold::apply_threshold;
//! use ndarray::Array3;
//!
//! let mut img = Array3::<f32>::zeros((1, 3, 4));
//! img[[0, 0, 3]] = 0.3;
//! img[[0, 1, 3]] = 0.5;
//! img[[0, 2, 3]] = 0.9;
//!
//! let out = apply_threshold(&img, 0.5).unwrap();
//! assert_eq!(out.image[[0, 0, 3]], 0.0);
//! assert_eq!(out.image[[0, 1, 3]], 0.0);
//! assert_eq!(out.image[[0, 2, 3]], 1.0);
//! assert!(out.translucent_before);
//! assert!(!out.translucent_after);
//! ```

#![deny(missing_docs)]

pub mod buffer;
pub mod error;
pub mod gradient;
mod processor;
pub mod threshold;

pub use buffer::SampleDepth;
pub use error::{Error, Result};
pub use processor::{
    default_output_path, process_file, process_image, resolve_output_path, ProcessOptions,
    ProcessReport, DEFAULT_SUFFIX, DEFAULT_THRESHOLD,
};
pub use threshold::{
    apply_threshold, apply_threshold_in_place, has_translucent_pixels, Thresholded,
    TranslucencyReport,
};
