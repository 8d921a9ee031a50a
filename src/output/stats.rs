//! Run statistics
//!
//! Summarizes how each record's crawl ended and how long the run took.

use crate::crawler::CrawlReport;
use crate::state::RecordState;
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Total number of input records
    pub total_records: u64,

    /// Count of records by final state
    pub records_by_state: HashMap<RecordState, u64>,

    /// Failure messages of failed records, keyed by record id
    pub failures: Vec<(String, String)>,

    /// Wall-clock duration of the crawl in milliseconds
    pub elapsed_ms: i64,

    /// True if the run was interrupted
    pub cancelled: bool,
}

impl CrawlStatistics {
    /// Builds statistics from a finished run
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut records_by_state = HashMap::new();
        for outcome in &report.outcomes {
            *records_by_state.entry(outcome.state).or_insert(0) += 1;
        }

        let failures = report
            .outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| (o.id.clone(), e.to_string())))
            .collect();

        Self {
            total_records: report.outcomes.len() as u64,
            records_by_state,
            failures,
            elapsed_ms: (report.finished_at - report.started_at).num_milliseconds(),
            cancelled: report.cancelled,
        }
    }

    /// Number of records that ended in `state`
    pub fn count(&self, state: RecordState) -> u64 {
        self.records_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Number of records that were fully crawled
    pub fn succeeded(&self) -> u64 {
        self.records_by_state
            .iter()
            .filter(|(state, _)| state.is_success())
            .map(|(_, count)| count)
            .sum()
    }

    /// Percentage of records that were fully crawled
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        (self.succeeded() as f64 / self.total_records as f64) * 100.0
    }

    /// Non-zero state counts in lifecycle order
    pub fn state_counts(&self) -> Vec<(RecordState, u64)> {
        RecordState::all_states()
            .into_iter()
            .map(|state| (state, self.count(state)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// One-line summary for the log
    pub fn summary_line(&self) -> String {
        format!(
            "{} records: {} done, {} not found, {} failed, {} abandoned, {} pending ({:.1}s{})",
            self.total_records,
            self.count(RecordState::Done),
            self.count(RecordState::Skipped),
            self.count(RecordState::Failed),
            self.count(RecordState::Abandoned),
            self.count(RecordState::Pending),
            self.elapsed_ms as f64 / 1000.0,
            if self.cancelled { ", interrupted" } else { "" }
        )
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Records by State:");
    for (state, count) in stats.state_counts() {
        let percentage = if stats.total_records > 0 {
            (count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    if !stats.failures.is_empty() {
        println!("Failures ({}):", stats.failures.len());
        for (id, message) in &stats.failures {
            println!("  - {}: {}", id, message);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} records crawled)",
        stats.success_rate(),
        stats.succeeded(),
        stats.total_records
    );
    println!("Elapsed: {:.2}s", stats.elapsed_ms as f64 / 1000.0);
    if stats.cancelled {
        println!("Run was interrupted before the queue drained");
    }
}
