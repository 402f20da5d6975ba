//! ke-ershoufang main entry point
//!
//! This is the command-line interface for the second-hand listing scraper.

use clap::Parser;
use ke_ershoufang::config::{load_config_with_hash, Config};
use ke_ershoufang::crawler::run_scrape;
use ke_ershoufang::output::print_statistics;
use ke_ershoufang::record::Field;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ke-ershoufang: scrape Beike second-hand listings into a CSV file
///
/// Walks the configured number of list pages, visits every listing's detail
/// page and writes one 25-column row per listing.
#[derive(Parser, Debug)]
#[command(name = "ke-ershoufang")]
#[command(version)]
#[command(about = "Scrape Beike second-hand listings into CSV", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of list pages to scrape
    #[arg(short, long)]
    pages: Option<u32>,

    /// Output CSV path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without sending requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to the built-in defaults
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    // Command-line overrides, then validate the merged result
    if let Some(pages) = cli.pages {
        config.site.pages = pages;
    }
    if let Some(output) = cli.output {
        config.output.csv_path = output;
    }
    ke_ershoufang::config::validate(&config)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_scrape(config, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ke_ershoufang=info,warn"),
            1 => EnvFilter::new("ke_ershoufang=debug,info"),
            _ => EnvFilter::new("ke_ershoufang=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and the
/// list pages that would be fetched
fn handle_dry_run(config: &Config) {
    println!("=== ke-ershoufang Dry Run ===\n");

    println!("Site:");
    println!("  List URL template: {}", config.site.list_url_template);
    println!("  Pages: {}", config.site.pages);

    println!("\nRequest:");
    println!("  User-Agent: {}", config.request.user_agent);
    println!("  Referer: {}", config.request.referer);
    println!("  Accept-Language: {}", config.request.accept_language);
    println!("  Timeout: {}s", config.request.timeout_secs);

    println!("\nPacing:");
    println!(
        "  Delay: {}-{}ms after each request",
        config.pacing.min_delay_ms, config.pacing.max_delay_ms
    );

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    println!(
        "  Columns ({}): {}",
        Field::ALL.len(),
        Field::labels().collect::<Vec<_>>().join(", ")
    );

    println!("\nList pages:");
    for page in 1..=config.site.pages {
        println!("  - {}", config.site.list_url(page));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    match run_scrape(config).await {
        Ok(summary) => {
            if !quiet {
                println!();
                print_statistics(&summary.stats);
            }
            println!(
                "\nWrote {} records -> {}",
                summary.records_written,
                summary.output_path.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
