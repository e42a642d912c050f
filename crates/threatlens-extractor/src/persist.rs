//! Writing the merged table as CSV

use crate::error::ExtractorError;
use std::io;
use std::path::Path;
use threatlens_domain::{Field, Table};
use tracing::info;

/// Write `table` to any writer: header row, then one row per record
pub fn write_table<W: io::Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(Field::header())?;
    for record in table {
        wtr.write_record(record.values())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the table to a CSV file, replacing any existing file
pub fn save_table(table: &Table, path: impl AsRef<Path>) -> Result<(), ExtractorError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| ExtractorError::persistence(path, e))?;
    write_table(table, file).map_err(|e| ExtractorError::persistence(path, e))?;
    info!("Data saved to {}", path.display());
    Ok(())
}
