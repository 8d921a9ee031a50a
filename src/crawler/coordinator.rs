//! Crawler coordinator - the bounded worker pool
//!
//! This module contains the crawl loop that:
//! - Builds the work queue from the loaded records
//! - Spawns a fixed number of workers that drain it
//! - Fetches and parses each record's page, skipping failures
//! - Stops early on cancellation without losing finished records
//! - Reassembles every record in input order

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::parser::apply_profile;
use crate::crawler::queue::{QueuedRecord, WorkQueue};
use crate::record::Record;
use crate::state::{RecordState, RunState, SharedRunState};
use crate::RecordError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// How a single record's crawl ended
#[derive(Debug)]
pub struct RecordOutcome {
    /// Record id
    pub id: String,

    /// Final state; `Pending` if no worker reached it before cancellation
    pub state: RecordState,

    /// Why the record was skipped, for `Failed` records
    pub error: Option<RecordError>,
}

/// Every record after a run, in input order
#[derive(Debug)]
pub struct CrawlReport {
    /// Records in input order; unprocessed ones are unchanged from input
    pub records: Vec<Record>,

    /// Outcomes, index-aligned with `records`
    pub outcomes: Vec<RecordOutcome>,

    /// True if the run was cut short by cancellation
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Number of records that ended in `state`
    pub fn count(&self, state: RecordState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }
}

/// A record handed back by a worker
#[derive(Debug)]
struct CompletedRecord {
    index: usize,
    record: Record,
    outcome: RecordOutcome,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<PageFetcher>,
    worker_count: usize,
    state: Arc<SharedRunState>,
}

impl Coordinator {
    /// Creates a coordinator from the crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(reqwest::Error)` - The HTTP client could not be built
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let fetcher = PageFetcher::new(config)?;
        Ok(Self::with_fetcher(fetcher, config.worker_count))
    }

    /// Creates a coordinator around an existing fetcher
    ///
    /// A `worker_count` of zero is treated as one.
    pub fn with_fetcher(fetcher: PageFetcher, worker_count: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            worker_count: worker_count.max(1),
            state: Arc::new(SharedRunState::new()),
        }
    }

    /// Current lifecycle state of the latest run
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Each record is attempted at most once. Per-record failures are
    /// logged and kept on the record's outcome; they never stop the run.
    /// Returns only after every worker has exited.
    ///
    /// # Arguments
    ///
    /// * `records` - Records to crawl, in the order the output should keep
    /// * `cancel` - Once cancelled, no new fetch starts and in-flight
    ///   fetches are dropped, leaving their records unchanged
    pub async fn run(&mut self, records: Vec<Record>, cancel: CancellationToken) -> CrawlReport {
        let started_at = Utc::now();
        let total = records.len();
        self.state = Arc::new(SharedRunState::new());

        let records: Vec<Record> = records
            .into_iter()
            .map(|mut record| {
                record.url = Some(self.fetcher.page_url(&record.id));
                record
            })
            .collect();
        // Untouched copies stand in for any record a worker fails to hand back
        let inputs = records.clone();
        let queue = Arc::new(WorkQueue::new(records));

        tracing::info!(
            "Starting crawl of {} records with {} workers (Ctrl+C to stop)",
            total,
            self.worker_count
        );
        self.state.advance(RunState::Running);

        let (results_tx, mut results_rx) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();
        for worker_id in 0..self.worker_count {
            let worker = Worker {
                id: worker_id,
                queue: queue.clone(),
                fetcher: self.fetcher.clone(),
                cancel: cancel.clone(),
                results: results_tx.clone(),
                run_state: self.state.clone(),
            };
            workers.spawn(worker.run());
        }
        drop(results_tx);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }
        self.state.advance(RunState::Draining);

        let mut slots: Vec<Option<(Record, RecordOutcome)>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        while let Some(completed) = results_rx.recv().await {
            slots[completed.index] = Some((completed.record, completed.outcome));
        }

        // Anything still queued was never picked up because of cancellation
        for queued in queue.drain_remaining() {
            let outcome = RecordOutcome {
                id: queued.record.id.clone(),
                state: RecordState::Pending,
                error: None,
            };
            slots[queued.index] = Some((queued.record, outcome));
        }

        let (records, outcomes) = fill_slots(inputs, slots);
        let report = CrawlReport {
            records,
            outcomes,
            cancelled: cancel.is_cancelled(),
            started_at,
            finished_at: Utc::now(),
        };

        self.state.advance(RunState::Terminated);
        if report.cancelled {
            tracing::warn!("Crawl interrupted, keeping results collected so far");
        } else {
            tracing::info!("Crawl completed, queue drained");
        }

        report
    }
}

/// Unzips result slots in input order
///
/// An empty slot means a worker died holding that record. It is replaced by
/// the input record as loaded and marked `Failed`, so no row is ever lost.
fn fill_slots(
    inputs: Vec<Record>,
    slots: Vec<Option<(Record, RecordOutcome)>>,
) -> (Vec<Record>, Vec<RecordOutcome>) {
    let mut records = Vec::with_capacity(inputs.len());
    let mut outcomes = Vec::with_capacity(inputs.len());

    for (index, (input, slot)) in inputs.into_iter().zip(slots).enumerate() {
        let (record, outcome) = slot.unwrap_or_else(|| {
            tracing::error!("Record {} at position {} was lost by its worker", input.id, index);
            let outcome = RecordOutcome {
                id: input.id.clone(),
                state: RecordState::Failed,
                error: None,
            };
            (input, outcome)
        });
        records.push(record);
        outcomes.push(outcome);
    }

    (records, outcomes)
}

/// One logical worker draining the shared queue
struct Worker {
    id: usize,
    queue: Arc<WorkQueue>,
    fetcher: Arc<PageFetcher>,
    cancel: CancellationToken,
    results: mpsc::UnboundedSender<CompletedRecord>,
    run_state: Arc<SharedRunState>,
}

impl Worker {
    async fn run(self) {
        let mut processed = 0usize;

        loop {
            if self.cancel.is_cancelled() {
                tracing::debug!("Worker {} stopping: cancelled", self.id);
                break;
            }

            let Some(queued) = self.queue.pop() else {
                tracing::debug!("Worker {} stopping: queue drained", self.id);
                break;
            };

            let completed = self.process(queued).await;
            processed += 1;

            if self.results.send(completed).is_err() {
                tracing::error!("Worker {} lost its result channel", self.id);
                break;
            }
        }

        self.run_state.advance(RunState::Draining);
        tracing::trace!("Worker {} exited after {} records", self.id, processed);
    }

    /// Fetches and parses one record, containing every failure
    async fn process(&self, queued: QueuedRecord) -> CompletedRecord {
        let QueuedRecord { index, mut record } = queued;
        let mut progress = Progress::new(&record.id);
        let mut error = None;

        progress.advance(RecordState::Fetching);
        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                progress.advance(RecordState::Abandoned);
                None
            }
            result = self.fetcher.fetch(&record.id) => Some(result),
        };

        match fetched {
            None => {}
            Some(Ok(FetchResult::Success { body, .. })) => {
                tracing::info!("{} fetched, parsing page", record.id);
                progress.advance(RecordState::Parsing);

                match apply_profile(&body, &mut record) {
                    Ok(()) => progress.advance(RecordState::Done),
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", record.id, e);
                        progress.advance(RecordState::Failed);
                        error = Some(RecordError::from(e));
                    }
                }
            }
            Some(Ok(FetchResult::NotFound { url })) => {
                tracing::info!("{} not found at {}", record.id, url);
                progress.advance(RecordState::Skipped);
            }
            Some(Err(e)) => {
                tracing::warn!("Skipping {}: {}", record.id, e);
                progress.advance(RecordState::Failed);
                error = Some(RecordError::from(e));
            }
        }

        CompletedRecord {
            index,
            outcome: RecordOutcome {
                id: record.id.clone(),
                state: progress.state,
                error,
            },
            record,
        }
    }
}

/// Per-record state machine, logging each transition
struct Progress {
    id: String,
    state: RecordState,
}

impl Progress {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state: RecordState::Pending,
        }
    }

    fn advance(&mut self, next: RecordState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{}: {} -> {}", self.id, self.state, next);
        self.state = next;
    }
}
