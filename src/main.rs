//! UN/LOCODE crawler main entry point
//!
//! This is the command-line interface for crawling the UN/LOCODE tables and
//! querying the dataset they produce.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unlocode_crawler::config::{load_config, Config};
use unlocode_crawler::crawler::{crawl, Coordinator, MAX_CONCURRENT_FETCHES};
use unlocode_crawler::output::{print_statistics, write_index};
use unlocode_crawler::search::Dataset;

/// UN/LOCODE crawler
///
/// Crawls the UNECE country index and every country's location table,
/// normalizes coordinates, deduplicates locations into ports and writes the
/// dataset as JSON.
#[derive(Parser, Debug)]
#[command(name = "unlocode-crawler")]
#[command(version)]
#[command(about = "Crawls UN/LOCODE tables into a JSON dataset", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["index_only", "search", "country"])]
    dry_run: bool,

    /// Fetch only the country index and write the index artifact
    #[arg(long, conflicts_with_all = ["dry_run", "search", "country"])]
    index_only: bool,

    /// Search the existing dataset and print the matches as JSON
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["dry_run", "index_only", "country"])]
    search: Option<String>,

    /// Print one country of the existing dataset as JSON
    #[arg(long, value_name = "CODE", conflicts_with_all = ["dry_run", "index_only", "search"])]
    country: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully");
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.index_only {
        handle_index_only(config).await?;
    } else if let Some(query) = &cli.search {
        handle_search(&config, query)?;
    } else if let Some(code) = &cli.country {
        handle_country(&config, code)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("unlocode_crawler=info,warn"),
            1 => EnvFilter::new("unlocode_crawler=debug,info"),
            2 => EnvFilter::new("unlocode_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows what a crawl would do
fn handle_dry_run(config: &Config) {
    println!("=== UN/LOCODE Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Index URL: {}", config.crawler.index_url);
    println!("  Max concurrent fetches: {}", MAX_CONCURRENT_FETCHES);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Index: {}", config.output.index_path().display());
    println!("  Countries: {}", config.output.countries_path().display());

    println!("\n✓ Configuration is valid");
}

/// Handles the --index-only mode: writes just the country index
async fn handle_index_only(config: Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let entries = coordinator.fetch_index().await?;

    let path = coordinator.config().output.index_path();
    write_index(&path, &entries).with_context(|| format!("failed to write {}", path.display()))?;

    println!("✓ {} countries written to: {}", entries.len(), path.display());
    Ok(())
}

/// Handles the --search mode
fn handle_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let dataset = Dataset::load(&config.output.countries_path())?;
    let results = dataset.search(query);
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Handles the --country mode
fn handle_country(config: &Config, code: &str) -> anyhow::Result<()> {
    let dataset = Dataset::load(&config.output.countries_path())?;
    let detail = dataset.country_detail(code)?;
    println!("{}", serde_json::to_string_pretty(&detail)?);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl of {} (max {} concurrent fetches)",
        config.crawler.index_url,
        MAX_CONCURRENT_FETCHES
    );

    match crawl(config).await {
        Ok(outcome) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&outcome.statistics);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
