//! Crawler module for partner page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of one page per record
//! - Structural HTML extraction of company details
//! - The shared work queue
//! - The bounded worker pool that drains it

mod coordinator;
mod fetcher;
mod parser;
mod queue;

pub use coordinator::{Coordinator, CrawlReport, RecordOutcome};
pub use fetcher::{build_http_client, FetchResult, PageFetcher};
pub use parser::{apply_profile, parse_profile, CompanyProfile};
pub use queue::{QueuedRecord, WorkQueue};

use crate::config::{validate, Config};
use crate::output::{write_results, CrawlStatistics};
use crate::record::load_records;
use crate::CrawlError;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Runs the whole pipeline: load, crawl, write
///
/// This is the main entry point for a run. It will:
/// 1. Load the input records (fatal on failure, before any request)
/// 2. Drain them through the worker pool
/// 3. Write every record, crawled or not, to the results spreadsheet
///
/// Cancellation only cuts step 2 short; whatever was collected is still
/// written.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `input` - Path to the JSON input file
/// * `cancel` - Token that stops the crawl early
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Results were written
/// * `Err(CrawlError::Config)` - The configuration is invalid
/// * `Err(CrawlError::Load)` - Input could not be loaded
/// * `Err(CrawlError::Write)` - Crawl finished but the spreadsheet could not be saved
///
/// # Example
///
/// ```no_run
/// use partner_crawl::config::Config;
/// use partner_crawl::crawler::crawl;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(&Config::default(), Path::new("partners.json"), CancellationToken::new()).await?;
/// println!("{} records written", report.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    input: &Path,
    cancel: CancellationToken,
) -> Result<CrawlReport, CrawlError> {
    validate(config)?;

    tracing::info!("Loading records from {}", input.display());
    let records = load_records(input)?;

    let mut coordinator = Coordinator::new(&config.crawler)?;
    let report = coordinator.run(records, cancel).await;

    let stats = CrawlStatistics::from_report(&report);
    tracing::info!("{}", stats.summary_line());

    let output = Path::new(&config.output.results_path);
    write_results(&report.records, output, &config.output.sheet_name)?;
    tracing::info!("Results saved to {}", output.display());

    Ok(report)
}
