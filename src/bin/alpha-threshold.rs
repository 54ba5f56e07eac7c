use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::LevelFilter;

use alpha_threshold::{process_file, resolve_output_path, DEFAULT_SUFFIX, DEFAULT_THRESHOLD};

#[derive(Parser)]
#[command(
    name = "alpha-threshold",
    about = "Process image alpha channel using thresholding",
    version,
    after_help = "Alpha values strictly above the threshold become opaque, all others transparent.\n\
                  Example: alpha-threshold sprite.png -t 0.4  (writes sprite_processed.png)"
)]
struct Cli {
    /// Path to input image file
    input: PathBuf,

    /// Alpha threshold value (0.0-1.0)
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Output filename suffix
    #[arg(short, long, default_value = DEFAULT_SUFFIX)]
    suffix: String,

    /// Explicit output path (overrides --suffix)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let output = resolve_output_path(&cli.input, cli.output.as_deref(), &cli.suffix);

    if let Err(e) = run(&cli.input, &output, cli.threshold) {
        log::error!("Processing failed: {e}");
        process::exit(1);
    }
}

fn run(input: &Path, output: &Path, threshold: f32) -> alpha_threshold::Result<()> {
    let report = process_file(input, output, threshold)?;
    log::debug!(
        "{} -> {} (before={}, after={})",
        report.input.display(),
        report.output.display(),
        report.translucent_before,
        report.translucent_after
    );
    Ok(())
}
