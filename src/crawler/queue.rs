//! Shared work queue drained by the worker pool
//!
//! The queue is filled once before any worker starts and never refilled,
//! so an empty pop means the drain is over.

use crate::record::Record;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A record handed to a worker, tagged with its input position
#[derive(Debug, Clone)]
pub struct QueuedRecord {
    /// Position in the input sequence
    pub index: usize,

    /// The record, owned by whichever worker popped it
    pub record: Record,
}

/// Ordered multi-consumer queue of records
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<QueuedRecord>>,
}

impl WorkQueue {
    /// Builds a queue holding `records` in their given order
    pub fn new(records: Vec<Record>) -> Self {
        let items = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| QueuedRecord { index, record })
            .collect();

        Self {
            items: Mutex::new(items),
        }
    }

    /// Takes the next record, or `None` once the queue is drained
    ///
    /// Never blocks beyond the short critical section.
    pub fn pop(&self) -> Option<QueuedRecord> {
        self.lock().pop_front()
    }

    /// Number of records not yet handed out
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every record that was never handed out
    pub fn drain_remaining(&self) -> Vec<QueuedRecord> {
        self.lock().drain(..).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<QueuedRecord>> {
        // A poisoned lock only means a worker panicked mid-pop; the deque is still intact
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
