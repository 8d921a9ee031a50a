//! Partner-Crawl main entry point
//!
//! This is the command-line interface for the partner directory harvester.

use anyhow::Context;
use clap::Parser;
use partner_crawl::config::{Config, DEFAULT_INPUT_PATH};
use partner_crawl::crawler::crawl;
use partner_crawl::output::{print_statistics, CrawlStatistics};
use partner_crawl::CrawlError;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Partner-Crawl: a partner directory harvester
///
/// Fetches each partner's profile page, extracts company details and
/// writes them to a spreadsheet. Press Ctrl+C to stop early; results
/// collected so far are still saved.
#[derive(Parser, Debug)]
#[command(name = "partner-crawl")]
#[command(version)]
#[command(about = "A partner directory harvester", long_about = None)]
struct Cli {
    /// Path to the JSON file of partner records
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("partner_crawl=info,warn"),
            1 => EnvFilter::new("partner_crawl=debug,info"),
            2 => EnvFilter::new("partner_crawl=trace,debug"),
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

async fn run(cli: Cli) -> anyhow::Result<()> {
    let input = match cli.input {
        Some(path) => path,
        None => {
            tracing::info!("No input file given, using {}", DEFAULT_INPUT_PATH);
            PathBuf::from(DEFAULT_INPUT_PATH)
        }
    };

    let config = Config::default();
    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    match crawl(&config, &input, cancel).await {
        Ok(report) => {
            if !cli.quiet {
                print_statistics(&CrawlStatistics::from_report(&report));
            }
            Ok(())
        }
        Err(e @ CrawlError::Load(_)) => {
            Err(e).with_context(|| format!("Could not start crawl from {}", input.display()))
        }
        Err(e @ CrawlError::Write(_)) => Err(e).with_context(|| {
            format!(
                "Crawl finished but results could not be saved to {}",
                config.output.results_path
            )
        }),
        Err(e) => Err(e).context("Crawl failed"),
    }
}

/// Cancels the crawl on Ctrl+C so collected results are still written
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupted, saving results collected so far...");
                cancel.cancel();
            }
            Err(e) => tracing::error!("Unable to listen for Ctrl+C: {}", e),
        }
    });
}
