// Command-line front end: queue the given images, run one conversion pass
// and print what happened to each of them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{ArgGroup, Parser};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webp_batch_lib::utils::{filter_supported, validate_settings};
use webp_batch_lib::{
    ConversionQueue, ConversionSettings, DEFAULT_QUALITY, ImageStatus, MemoryPreviewStore,
    NamingOptions, RunOutcome, WebpConverter, WebpConverterConfig,
};

#[derive(Debug, Parser)]
#[command(name = "webp-batch")]
#[command(version, about = "Convert a batch of images to WebP, one at a time", long_about = None)]
#[command(group(ArgGroup::new("naming").args(["suffix", "pattern", "keep_original"])))]
struct Cli {
    /// Encoder quality
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Append SUFFIX to each file stem
    #[arg(long)]
    suffix: Option<String>,

    /// Name outputs from a pattern using {name}, {index} and {date}
    #[arg(long)]
    pattern: Option<String>,

    /// Keep the original file stem (default)
    #[arg(long)]
    keep_original: bool,

    /// Write outputs here instead of next to each source
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    #[arg(value_name = "IMAGES", required = true)]
    paths: Vec<String>,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<ConversionSettings> {
        let naming = match (&self.suffix, &self.pattern) {
            (Some(suffix), _) => NamingOptions::add_suffix(suffix.clone()),
            (_, Some(pattern)) => NamingOptions::custom(pattern.clone()),
            _ => NamingOptions::keep_original(),
        };
        let settings = ConversionSettings { quality: self.quality, naming };
        validate_settings(&settings)?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)          // Keep colored output
        .with_writer(std::io::stderr)
        .compact();               // Use compact formatter instead of pretty

    subscriber.init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    let requested = cli.paths.len();
    let accepted = filter_supported(cli.paths);
    if accepted.len() < requested {
        warn!("Ignoring {} path(s) without a supported image extension", requested - accepted.len());
    }

    let converter = WebpConverter::new(WebpConverterConfig {
        output_dir: cli.out,
        include_payload: false,
    });
    let queue = ConversionQueue::with_settings(
        Arc::new(converter),
        Arc::new(MemoryPreviewStore::new()),
        settings,
    );

    let added = queue.submit(accepted).await;
    info!("Queued {} image(s)", added.len());

    let summary = match queue.run_conversion().await {
        RunOutcome::Finished(summary) => summary,
        RunOutcome::NothingPending => bail!("none of the inputs could be read"),
        RunOutcome::AlreadyRunning => bail!("a conversion is already running"),
    };

    for image in queue.snapshot().images {
        match image.status {
            ImageStatus::Completed => println!(
                "ok    {} -> {} ({} -> {} bytes)",
                image.source_path,
                image.output_path.unwrap_or_default(),
                image.original_size,
                image.compressed_size.unwrap_or(0),
            ),
            _ => println!(
                "fail  {}: {}",
                image.source_path,
                image.error_message.unwrap_or_else(|| "not converted".to_string()),
            ),
        }
    }

    if summary.original_bytes > 0 {
        let saved = summary.original_bytes as i64 - summary.compressed_bytes as i64;
        println!(
            "{} converted, {} failed, {:.1}% saved",
            summary.succeeded,
            summary.failed,
            saved as f64 / summary.original_bytes as f64 * 100.0
        );
    }

    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
