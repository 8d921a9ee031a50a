//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RecordState`: Tracks the state of an individual record (pending, fetching, parsing, done, etc.)
//! - `RunState`: Tracks the lifecycle of the whole run (idle, running, draining, terminated)

mod record_state;
mod run_state;

// Re-export main types
pub use record_state::RecordState;
pub use run_state::{RunState, SharedRunState};
