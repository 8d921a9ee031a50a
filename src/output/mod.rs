//! Output module for persisting crawl results
//!
//! This module handles:
//! - Writing the results spreadsheet
//! - Summarizing and printing run statistics

mod spreadsheet;
pub mod stats;

pub use spreadsheet::{row_cells, write_results, HEADERS};
pub use stats::{print_statistics, CrawlStatistics};
