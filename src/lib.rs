//! Partner-Crawl: a partner directory harvester
//!
//! This crate fetches a fixed list of partner-company pages from a vendor
//! portal, extracts company details from each page, and writes the
//! aggregated results to a spreadsheet.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for Partner-Crawl operations
///
/// Only load-time, configuration and persistence failures end up here.
/// Per-record failures are kept on the record's outcome instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load input records: {0}")]
    Load(#[from] LoadError),

    #[error("Failed to save results: {0}")]
    Write(#[from] WriteError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),
}

/// Errors raised while loading the input record file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Input file not found: {0}")]
    NotFound(String),

    #[error("Malformed input file {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Input file {0} contains no records")]
    Empty(String),

    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),
}

/// Network-level failure for a single page request
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },
}

/// HTML extraction failure for a single page
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing element: {0}")]
    MissingElement(&'static str),
}

/// Any failure that causes a single record to be skipped
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors raised while persisting the results spreadsheet
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Partner-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for input loading
pub type LoadResult<T> = std::result::Result<T, LoadError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport};
pub use record::{load_records, Record};
pub use state::{RecordState, RunState};
