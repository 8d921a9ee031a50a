//! Input records
//!
//! A [`Record`] is one partner company. Records are read once from a JSON
//! array, enriched in place by the crawler, and finally written out.

mod loader;
mod types;

pub use loader::load_records;
pub use types::{ProfileField, Record};
