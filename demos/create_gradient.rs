//! Write a demo image with a horizontal alpha gradient.
//!
//! Usage:
//! ```sh
//! cargo run --example create_gradient -- [output.png] [size]
//! ```

use std::env;
use std::path::PathBuf;
use std::process;

use alpha_threshold::gradient::{save_gradient_image, DEFAULT_GRADIENT_SIZE};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let output = args
        .get(1)
        .map_or_else(|| PathBuf::from("./gradient_example.png"), PathBuf::from);
    let size = match args.get(2).map(|s| s.parse::<usize>()) {
        None => DEFAULT_GRADIENT_SIZE,
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            eprintln!("Usage: {} [output.png] [size>0]", args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = save_gradient_image(&output, size) {
        log::error!("Failed to create example image: {e}");
        process::exit(1);
    }
    log::info!("Example image created at: {}", output.display());
}
