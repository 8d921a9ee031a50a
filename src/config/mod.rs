//! Configuration module for Partner-Crawl
//!
//! The binary runs with [`Config::default`]; library consumers may load a
//! TOML file instead.
//!
//! # Example
//!
//! ```no_run
//! use partner_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("partner-crawl.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.worker_count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, DEFAULT_INPUT_PATH, DEFAULT_RESULTS_PATH,
    DEFAULT_SHEET_NAME, DEFAULT_URL_TEMPLATE, DEFAULT_WORKER_COUNT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
