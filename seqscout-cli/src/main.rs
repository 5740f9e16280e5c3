use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use seqscout::{
    config::{ScanConfig, BYTES_PER_GIGABYTE, BYTES_PER_MEGABYTE},
    load_files, scan, ScanSummary, SequenceBuffer,
};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Searches genomic sequence files for a literal pattern in parallel.
///
/// Input files are concatenated into one fixed-capacity in-memory buffer
/// (annotation lines stripped), then scanned by N worker threads. Files may
/// be flat text or gzip-compressed; both are detected automatically.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Allocate <BYTES> bytes for sequence data
    #[arg(short = 'b', long, group = "capacity")]
    bytes: Option<u64>,

    /// Allocate <MEGABYTES> MB for sequence data
    #[arg(short = 'm', long, group = "capacity")]
    megabytes: Option<u64>,

    /// Allocate <GIGABYTES> GB for sequence data
    #[arg(short = 'g', long, group = "capacity")]
    gigabytes: Option<u64>,

    /// Literal pattern to search for
    #[arg(short = 'p', long)]
    pattern: Option<String>,

    /// Number of worker threads (default: CPU cores)
    #[arg(short = 'n', long)]
    threads: Option<NonZeroUsize>,

    /// Enable verbose output: debug logging plus one context line per match
    #[arg(short, long)]
    verbose: bool,

    /// Print the summary as JSON instead of the plain report
    #[arg(long)]
    json: bool,

    /// Path to a YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sequence files to load, concatenated in argument order
    files: Vec<PathBuf>,
}

impl Cli {
    fn capacity_bytes(&self) -> anyhow::Result<u64> {
        if let Some(bytes) = self.bytes {
            return Ok(bytes);
        }
        if let Some(mb) = self.megabytes {
            return mb
                .checked_mul(BYTES_PER_MEGABYTE)
                .with_context(|| format!("--megabytes {mb} overflows the byte budget"));
        }
        if let Some(gb) = self.gigabytes {
            return gb
                .checked_mul(BYTES_PER_GIGABYTE)
                .with_context(|| format!("--gigabytes {gb} overflows the byte budget"));
        }
        Ok(0)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = ScanConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration file")?;

    let cli_config = ScanConfig {
        pattern: cli.pattern.clone().unwrap_or_default(),
        capacity_bytes: cli.capacity_bytes()?,
        verbose: cli.verbose,
        log_level: if cli.verbose {
            "debug".to_string()
        } else {
            "info".to_string()
        },
        files: cli.files.clone(),
        ..ScanConfig::default()
    };

    let config = file_config.merge_with_cli(cli_config, cli.threads);
    init_tracing(&config.log_level);
    config.validate()?;

    let capacity = usize::try_from(config.capacity_bytes)
        .context("buffer capacity does not fit in this platform's address space")?;
    let mut buffer = SequenceBuffer::with_capacity(capacity);

    let stats = load_files(&config.files, &mut buffer)?;
    tracing::info!(
        "loaded {} bytes from {} file(s) ({} lines kept, {} skipped)",
        stats.bytes_loaded,
        stats.files,
        stats.lines_kept,
        stats.lines_skipped
    );

    println!("MATCHING ...");
    let summary = scan(
        &buffer,
        config.pattern.as_bytes(),
        config.thread_count,
        config.verbose,
    )?;

    if cli.json {
        print_json_summary(&summary, &config.pattern)?;
    } else {
        print_summary(&summary, &config.pattern);
    }
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &ScanSummary, pattern: &str) {
    println!("    TOOK {:.3} seconds", summary.elapsed.as_secs_f64());
    println!("   TRIED {} matches", summary.trial_count);
    println!(" PATTERN {}", pattern.cyan());
    let times = if summary.match_count == 1 {
        "time"
    } else {
        "times"
    };
    println!(
        "   MATCH {} {}",
        summary.match_count.to_string().green().bold(),
        times
    );
}

fn print_json_summary(summary: &ScanSummary, pattern: &str) -> anyhow::Result<()> {
    let report = serde_json::json!({
        "pattern": pattern,
        "match_count": summary.match_count,
        "trial_count": summary.trial_count,
        "elapsed_seconds": summary.elapsed.as_secs_f64(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
