/// Record state definitions for tracking crawl progress
///
/// This module defines all possible states a record can be in during a run.
use std::fmt;

/// Represents the current state of a record in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    // ===== Active States =====
    /// Record is queued and has not been picked up by a worker
    Pending,

    /// The record's page is being requested
    Fetching,

    /// The page was fetched and its HTML is being extracted
    Parsing,

    // ===== Terminal States =====
    /// Page was fetched and parsed, crawl fields populated
    Done,

    /// Page returned HTTP 404; record left as loaded
    Skipped,

    /// Fetch or parse failed; record left as loaded
    Failed,

    /// Run was cancelled while this record was in flight
    Abandoned,
}

impl RecordState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Returns true if this is an active state (record may still be processed)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Fetching | Self::Parsing)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `Pending → Fetching → Parsing → Done`, `Fetching → Skipped`,
    /// any active state `→ Failed`, and `Fetching | Parsing → Abandoned`.
    pub fn can_transition_to(&self, next: RecordState) -> bool {
        use RecordState::*;
        matches!(
            (*self, next),
            (Pending, Fetching)
                | (Fetching, Parsing)
                | (Parsing, Done)
                | (Fetching, Skipped)
                | (Pending | Fetching | Parsing, Failed)
                | (Fetching | Parsing, Abandoned)
        )
    }

    /// Short lowercase name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Done => "done",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Returns all possible record states
    pub fn all_states() -> [Self; 7] {
        [
            Self::Pending,
            Self::Fetching,
            Self::Parsing,
            Self::Done,
            Self::Skipped,
            Self::Failed,
            Self::Abandoned,
        ]
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
