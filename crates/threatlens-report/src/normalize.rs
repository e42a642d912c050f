//! Repair and cleaning of a loaded table
//!
//! Steps run in a fixed order: schema repair, trimming, removal of rows
//! with null cells, then timestamp coercion. Coercion runs last so an
//! unparseable timestamp only drops the row from the time series.

use crate::error::ReportError;
use crate::frame::{Column, RawFrame};
use crate::loader::load_frame;
use crate::timestamp::parse_timestamp;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use threatlens_domain::{reconcile, Field, Reconciliation, FIELD_COUNT};
use tracing::{debug, info, warn};

/// Separator found in tables whose fields were joined into one column
pub const COMBINED_SEPARATOR: char = '|';

/// Split a single combined column back into the schema columns
///
/// Frames with more than one column are returned untouched. The split
/// width is the widest row; the real columns take the schema names in
/// order and any shortfall is filled with null placeholder columns.
pub fn repair_schema(frame: RawFrame) -> (RawFrame, Reconciliation) {
    if frame.width() != 1 {
        return (frame, Reconciliation::Reconciled);
    }

    let (_, rows) = frame.into_parts();
    if rows.is_empty() {
        let columns = Field::ALL.iter().copied().map(Column::Field).collect();
        return (RawFrame::new(columns, rows), Reconciliation::Reconciled);
    }

    let split: Vec<Vec<Option<String>>> = rows
        .into_iter()
        .map(|row| match row.into_iter().next().flatten() {
            Some(value) => value
                .split(COMBINED_SEPARATOR)
                .map(|part| Some(part.to_string()))
                .collect(),
            None => Vec::new(),
        })
        .collect();

    let width = split.iter().map(Vec::len).max().unwrap_or(0);
    info!(
        "Detected improperly formatted data, {} columns after splitting",
        width
    );

    let mut columns: Vec<Column> = Field::ALL
        .iter()
        .copied()
        .take(width)
        .map(Column::Field)
        .collect();
    let outcome = match reconcile(&mut columns, FIELD_COUNT, Column::Placeholder) {
        // `columns` never exceeds the schema, so report the cut from `width`
        Reconciliation::Reconciled if width > FIELD_COUNT => Reconciliation::Truncated {
            dropped: width - FIELD_COUNT,
        },
        outcome => outcome,
    };

    match outcome {
        Reconciliation::PaddedWithPlaceholders { added } => {
            warn!("Added {} placeholder columns for missing fields", added)
        }
        Reconciliation::Truncated { dropped } => {
            warn!("Dropped {} extra columns beyond the schema", dropped)
        }
        Reconciliation::Reconciled => {}
    }

    (RawFrame::new(columns, split), outcome)
}

/// Trim surrounding whitespace from every cell
pub fn trim_cells(frame: RawFrame) -> RawFrame {
    let (columns, rows) = frame.into_parts();
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| cell.map(|v| v.trim().to_string()))
                .collect()
        })
        .collect();
    RawFrame::new(columns, rows)
}

/// Remove rows holding a null in any column, returning the count removed
pub fn drop_incomplete(frame: RawFrame) -> (RawFrame, usize) {
    let (columns, mut rows) = frame.into_parts();
    let before = rows.len();
    rows.retain(|row| row.iter().all(Option::is_some));
    let dropped = before - rows.len();
    (RawFrame::new(columns, rows), dropped)
}

/// Result of [`normalize`]
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The cleaned table
    pub frame: NormalizedFrame,

    /// What schema repair did
    pub reconciliation: Reconciliation,

    /// Rows removed for holding nulls
    pub dropped_rows: usize,
}

/// Run the full cleaning pipeline on a loaded table
pub fn normalize(frame: RawFrame) -> Normalized {
    let (frame, reconciliation) = repair_schema(frame);
    let frame = trim_cells(frame);
    let (frame, dropped_rows) = drop_incomplete(frame);
    if dropped_rows > 0 {
        info!("Dropped {} rows with missing values", dropped_rows);
    }

    let (columns, rows) = frame.into_parts();
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.into_iter().flatten().collect())
        .collect();

    let timestamps = columns
        .iter()
        .position(|c| c.field() == Some(Field::Timestamp))
        .map(|idx| {
            let parsed: Vec<Option<NaiveDateTime>> =
                rows.iter().map(|row| parse_timestamp(&row[idx])).collect();
            let failed = parsed.iter().filter(|t| t.is_none()).count();
            if failed > 0 {
                warn!("{} timestamps could not be parsed", failed);
            }
            parsed
        });

    debug!("Normalized frame: {} rows, {} columns", rows.len(), columns.len());

    Normalized {
        frame: NormalizedFrame {
            columns,
            rows,
            timestamps,
        },
        reconciliation,
        dropped_rows,
    }
}

/// Load the table at `path` and clean it
pub fn load_normalized(path: impl AsRef<Path>) -> Result<Normalized, ReportError> {
    load_frame(path).map(normalize)
}

/// A cleaned table with no null cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFrame {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    timestamps: Option<Vec<Option<NaiveDateTime>>>,
}

impl NormalizedFrame {
    /// Column labels in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column labels as display strings
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(ToString::to_string).collect()
    }

    /// All rows in order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows survived cleaning
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a schema column, or `None` when the column is absent
    pub fn column(&self, field: Field) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c.field() == Some(field))?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Parsed timestamps per row, or `None` without a Timestamp column
    pub fn timestamps(&self) -> Option<&[Option<NaiveDateTime>]> {
        self.timestamps.as_deref()
    }

    /// Calendar dates of the rows whose timestamp parsed
    pub fn dates(&self) -> Option<Vec<NaiveDate>> {
        self.timestamps
            .as_ref()
            .map(|ts| ts.iter().flatten().map(NaiveDateTime::date).collect())
    }
}
