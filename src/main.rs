//! Film-Scraper main entry point
//!
//! This is the command-line interface for the Film-Scraper crawler.

use anyhow::Context;
use clap::Parser;
use film_scraper::config::{load_config_with_hash, Config};
use film_scraper::crawler::run_crawl;
use film_scraper::output::{load_statistics, print_statistics};
use film_scraper::storage::open_storage;
use film_scraper::url::listing_page_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Film-Scraper: a resumable movie-listing crawler
///
/// Film-Scraper walks the numbered pages of a film listing, visits every
/// film's detail page, and writes the collected records to a JSON file.
/// Progress is saved after each page so an interrupted crawl can resume.
#[derive(Parser, Debug)]
#[command(name = "film-scraper")]
#[command(version)]
#[command(about = "A resumable movie-listing crawler", long_about = None)]
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

    /// Resume from the saved progress marker (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh crawl, ignoring saved progress
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the progress and result files and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("film_scraper=info,warn"),
            1 => EnvFilter::new("film_scraper=debug,info"),
            2 => EnvFilter::new("film_scraper=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Film-Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing path: {}", config.site.listing_path);
    println!("  Total pages: {}", config.site.total_pages);
    println!("  Films per page: {}", config.site.films_per_page);

    println!("\nCrawler:");
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!("  Start page: {}", config.crawler.start_page);
    println!("  Checkpoint results: {}", config.crawler.checkpoint_results);

    println!("\nUser Agent:");
    println!(
        "  {}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    println!("  Progress: {}", config.output.progress_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling at {}",
        listing_page_url(&config.site, config.crawler.start_page)
    );
}

/// Handles the --stats mode: shows statistics from the persisted files
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(&config.output);
    let stats = load_statistics(&storage, config).context("failed to read crawl files")?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring saved progress)");
    } else {
        tracing::info!("Starting crawl (will resume from saved progress if present)");
    }

    tracing::info!(
        "Pages: {}, films per page: {}, concurrency: {}",
        config.site.total_pages,
        config.site.films_per_page,
        config.crawler.max_concurrency
    );

    let report = run_crawl(config, fresh).await.context("crawl failed")?;
    tracing::info!(
        "Crawl finished: {} pages fetched, {} films collected, next page {}",
        report.pages_fetched,
        report.films_scraped,
        report.progress.last_page
    );

    Ok(())
}
