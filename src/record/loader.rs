use crate::record::types::Record;
use crate::{LoadError, LoadResult};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

/// Loads the input records from a JSON array file
///
/// # Arguments
///
/// * `path` - Path to a JSON file holding an array of record objects
///
/// # Returns
///
/// * `Ok(Vec<Record>)` - Records in file order
/// * `Err(LoadError::NotFound)` - The path does not exist
/// * `Err(LoadError::Malformed)` - Not valid JSON, not an array, or a bad record
/// * `Err(LoadError::Empty)` - The array has no elements
pub fn load_records(path: &Path) -> LoadResult<Vec<Record>> {
    let path_name = path.display().to_string();

    // Invalid UTF-8 surfaces as a JSON error, i.e. Malformed
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadError::NotFound(path_name)),
        Err(e) => return Err(LoadError::Io(e)),
    };

    let records: Vec<Record> =
        serde_json::from_slice(&content).map_err(|e| LoadError::Malformed {
            path: path_name.clone(),
            message: e.to_string(),
        })?;

    if records.is_empty() {
        return Err(LoadError::Empty(path_name));
    }

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.id.as_str()) {
            tracing::warn!("Duplicate record id {} in {}", record.id, path_name);
        }
    }

    tracing::debug!("Loaded {} records from {}", records.len(), path_name);
    Ok(records)
}
