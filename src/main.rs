//! Crawl-Ingest main entry point
//!
//! This is the command-line interface for running a single crawl ingestion.

use anyhow::Context;
use clap::Parser;
use crawl_ingest::config::{load_config_with_hash, Config};
use crawl_ingest::output::print_report;
use crawl_ingest::CrawlPipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crawl-Ingest: turn a crawled website into knowledge-base documents
///
/// Asks the crawl service to crawl START_URL, writes one document per page
/// under <storage-root>/documents/<site>-<suffix>/, and prints the produced
/// documents as JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "crawl-ingest")]
#[command(version)]
#[command(about = "Turn a crawled website into knowledge-base documents", long_about = None)]
struct Cli {
    /// URL the crawl starts from
    #[arg(value_name = "START_URL", required_unless_present = "health")]
    start_url: Option<String>,

    /// Link depth to follow from the start URL
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum number of pages to crawl
    #[arg(short, long)]
    max_pages: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the storage root directory
    #[arg(long, value_name = "DIR")]
    storage_root: Option<PathBuf>,

    /// Write under the fixed development storage root
    #[arg(long)]
    dev: bool,

    /// Override the crawl service endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Check crawl service health and exit
    #[arg(long)]
    health: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let pipeline = CrawlPipeline::new(config).context("Failed to build crawl pipeline")?;

    if cli.health {
        return handle_health(&pipeline).await;
    }

    let start_url = cli
        .start_url
        .as_deref()
        .context("START_URL is required")?;
    handle_ingest(&pipeline, start_url, cli.depth, cli.max_pages, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_ingest=info,warn"),
            1 => EnvFilter::new("crawl_ingest=debug,info"),
            2 => EnvFilter::new("crawl_ingest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(root) = &cli.storage_root {
        config.storage.storage_root = root.clone();
    }
    if cli.dev {
        config.storage.dev_mode = true;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.service.endpoint = endpoint.clone();
    }

    crawl_ingest::config::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --health mode: probes the crawl service
async fn handle_health(pipeline: &CrawlPipeline) -> anyhow::Result<()> {
    let client = pipeline.client();
    let health = client
        .health()
        .await
        .with_context(|| format!("Crawl service at {} is unreachable", client.base_url()))?;

    println!(
        "{} {} at {}: {}",
        health.service.as_deref().unwrap_or("crawl service"),
        health.version.as_deref().unwrap_or(""),
        client.base_url(),
        health.status
    );

    if !health.is_healthy() {
        anyhow::bail!("Crawl service reported status '{}'", health.status);
    }
    Ok(())
}

/// Handles the main ingestion run
async fn handle_ingest(
    pipeline: &CrawlPipeline,
    start_url: &str,
    depth: Option<u32>,
    max_pages: Option<u32>,
    quiet: bool,
) -> anyhow::Result<()> {
    let defaults = &pipeline.config().crawl;
    let depth = depth.unwrap_or(defaults.default_depth);
    let max_pages = max_pages.unwrap_or(defaults.default_max_pages);

    let outcome = pipeline
        .try_run(start_url, depth, max_pages)
        .await
        .with_context(|| format!("Ingestion of {} failed", start_url))?;

    println!("{}", serde_json::to_string_pretty(&outcome.documents)?);

    if !quiet {
        print_report(&outcome.report);
    }

    Ok(())
}
