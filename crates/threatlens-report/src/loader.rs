//! Loading a persisted incident table

use crate::error::ReportError;
use crate::frame::{Column, RawFrame};
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Cell texts read as null
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn cell(value: &str) -> Option<String> {
    if NULL_MARKERS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Read a comma-delimited table with a header row from any reader
///
/// Rows with fewer cells than the header are padded with nulls; extra
/// cells are dropped.
pub fn read_frame<R: io::Read>(reader: R) -> Result<RawFrame, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<Column> = rdr.headers()?.iter().map(Column::from_name).collect();

    let mut rows = Vec::new();
    let mut overlong = 0usize;
    for record in rdr.records() {
        let record = record?;
        if record.len() > columns.len() {
            overlong += 1;
        }
        rows.push(record.iter().map(cell).collect());
    }
    if overlong > 0 {
        warn!(
            "{} rows had more cells than the {} header columns; extra cells dropped",
            overlong,
            columns.len()
        );
    }

    Ok(RawFrame::new(columns, rows))
}

/// Load the table stored at `path`
pub fn load_frame(path: impl AsRef<Path>) -> Result<RawFrame, ReportError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| ReportError::persistence(path, e))?;
    let frame = read_frame(file).map_err(|e| ReportError::persistence(path, e))?;
    info!(
        "Loaded {} rows with {} columns from {}",
        frame.len(),
        frame.width(),
        path.display()
    );
    Ok(frame)
}
