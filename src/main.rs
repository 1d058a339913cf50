//! url-crawler main entry point
//!
//! This is the command-line interface for the single-domain site inventory
//! crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url_crawler::config::{self, Config};
use url_crawler::crawler::run_crawl;
use url_crawler::output::{format_statistics, write_report, CrawlStatistics, OutputFormat};
use url_crawler::ScopePolicy;

/// url-crawler: a single-domain site inventory crawler
///
/// Crawls a site breadth-first from a root URL, never leaving the root's
/// domain, and lists every link and image found on each visited page.
#[derive(Parser, Debug)]
#[command(name = "url-crawler")]
#[command(version)]
#[command(about = "A single-domain site inventory crawler", long_about = None)]
struct Cli {
    /// URL to start from; its domain bounds the crawl
    #[arg(value_name = "ROOT_URL")]
    root_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every page record as it is scraped
    #[arg(long)]
    debug: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,

    /// Presentation format of the inventory
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the inventory to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of levels to crawl (0 = unlimited)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of pages fetched at once
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Only accept the root host and its subdomains
    #[arg(long)]
    strict_scope: bool,

    /// Keep off-domain links in page records
    #[arg(long)]
    record_off_domain_links: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(verbosity(&cli), cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.quiet).await
}

/// Effective verbosity: `--debug` counts as at least `-v`
fn verbosity(cli: &Cli) -> u8 {
    if cli.debug {
        cli.verbose.max(1)
    } else {
        cli.verbose
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the inventory.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("url_crawler=info,warn"),
            1 => EnvFilter::new("url_crawler=debug,info"),
            2 => EnvFilter::new("url_crawler=trace,debug"),
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

/// Loads the config file (if any), applies command-line overrides, and
/// validates the result
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };

    if let Some(root_url) = &cli.root_url {
        config.crawler.root_url = root_url.clone();
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_pages_open = concurrency;
    }
    if cli.strict_scope {
        config.crawler.scope_policy = ScopePolicy::Strict;
    }
    if cli.record_off_domain_links {
        config.crawler.record_off_domain_links = true;
    }

    config::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = config::load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== url-crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    match config.crawler.max_depth {
        0 => println!("  Max depth: unlimited"),
        depth => println!("  Max depth: {}", depth),
    }
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );
    println!("  Scope policy: {}", config.crawler.scope_policy);
    println!(
        "  Record off-domain links: {}",
        config.crawler.record_off_domain_links
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    println!(
        "  Destination: {}",
        config.output.path.as_deref().unwrap_or("stdout")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let report = run_crawl(&config, cancel).await?;

    let path = config.output.path.as_deref().map(Path::new);
    write_report(&report, config.output.format, path).context("Failed to write inventory")?;

    if !quiet {
        eprint!("{}", format_statistics(&CrawlStatistics::from_report(&report)));
    }

    Ok(())
}

/// Cancels the crawl on the first Ctrl-C; the current level still completes
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received; stopping after the current level");
                cancel.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}
