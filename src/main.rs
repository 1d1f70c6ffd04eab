//! Job-Harvest main entry point
//!
//! This is the command-line interface for the Job-Harvest listing scraper.

use anyhow::Context;
use clap::Parser;
use job_harvest::config::{load_config_with_hash, validate, Config};
use job_harvest::crawler::{discover_jobs, run_harvest};
use job_harvest::output::print_summary;
use job_harvest::storage::CommandConverter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Job-Harvest: a categorized listing scraper
///
/// Job-Harvest reads section links from a root listing page, collects the
/// item links of every section concurrently, and converts each item page
/// into a document stored in a folder named after its category.
#[derive(Parser, Debug)]
#[command(name = "job-harvest")]
#[command(version)]
#[command(about = "A categorized listing scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discover and list jobs without creating folders or artifacts
    #[arg(long)]
    dry_run: bool,

    /// Override the number of workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Exit with a non-zero status if any unit of work failed
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config).await?;
        return Ok(ExitCode::SUCCESS);
    }

    handle_harvest(config, cli.strict).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_harvest=info,warn"),
            1 => EnvFilter::new("job_harvest=debug,info"),
            2 => EnvFilter::new("job_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (or defaults) and applies CLI overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(workers) = cli.workers {
        config.pipeline.workers = workers;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: lists discovered jobs and exits
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Job-Harvest Dry Run ===\n");
    println!("Root: {}", config.source.root_url);
    println!("Workers: {}", config.pipeline.workers);
    println!("Output: {}\n", config.output.directory);

    let jobs = discover_jobs(config).await?;

    println!("Jobs ({}):", jobs.len());
    for job in &jobs {
        println!("  - {}", job);
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, strict: bool) -> anyhow::Result<ExitCode> {
    let converter = CommandConverter::new(&config.converter);
    if !converter.is_available().await {
        tracing::warn!(
            program = converter.program(),
            "Converter not found; every artifact will fail to persist until it is installed"
        );
    }

    tracing::info!(
        root = %config.source.root_url,
        workers = config.pipeline.workers,
        "Job harvest initialized"
    );

    let summary = run_harvest(config, Arc::new(converter))
        .await
        .context("harvest could not start")?;

    print_summary(&summary);

    if strict && summary.has_failures() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
