//! Spreadsheet output
//!
//! Writes one row per record, in the order given, under a fixed header.
//! Absent fields are left as blank cells.

use crate::record::{ProfileField, Record};
use crate::WriteError;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Column headers, in column order
pub const HEADERS: [&str; 8] = [
    "Company Name",
    "Address",
    "Website",
    "Membership Level",
    "Region",
    "Headquarters",
    "Ownership",
    "Employees",
];

/// Longest string an xlsx cell can hold, in characters
pub const MAX_CELL_CHARS: usize = 32_767;

/// Cell values for one record, aligned with [`HEADERS`]
pub fn row_cells(record: &Record) -> [Option<&str>; 8] {
    [
        record.name.as_deref(),
        record.add.as_deref(),
        record.website.as_deref(),
        record.field(ProfileField::Level),
        record.field(ProfileField::Area),
        record.field(ProfileField::Headquarters),
        record.field(ProfileField::Ownership),
        record.field(ProfileField::EmployeeCount),
    ]
}

/// Writes records to a single-sheet spreadsheet, replacing any existing file
///
/// # Arguments
///
/// * `records` - Records in output order
/// * `output_path` - Destination `.xlsx` path
/// * `sheet_name` - Name of the worksheet
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(WriteError)` - The workbook could not be built or saved
pub fn write_results(
    records: &[Record],
    output_path: &Path,
    sheet_name: &str,
) -> Result<(), WriteError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (line, record) in records.iter().enumerate() {
        let row = line as u32 + 1;
        tracing::info!("Saving row {} (id {})", row, record.id);

        for (col, cell) in row_cells(record).into_iter().enumerate() {
            if let Some(value) = cell {
                worksheet.write_string(row, col as u16, fit_cell(value, &record.id, col))?;
            }
        }
    }

    workbook.save(output_path)?;
    Ok(())
}

/// Truncates a value to [`MAX_CELL_CHARS`], logging when it does
fn fit_cell<'a>(value: &'a str, id: &str, col: usize) -> &'a str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            tracing::warn!(
                "Truncating {} for id {} to {} characters",
                HEADERS[col],
                id,
                MAX_CELL_CHARS
            );
            &value[..cut]
        }
        None => value,
    }
}
