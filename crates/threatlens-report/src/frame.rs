//! Column-labelled tables as loaded from disk

use std::fmt;
use threatlens_domain::Field;

/// Prefix of synthetic columns added when a row is short
pub const PLACEHOLDER_PREFIX: &str = "Extra_Column_";

/// A column label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    /// One of the six schema fields
    Field(Field),

    /// A column the schema does not know about
    Other(String),

    /// Synthetic null-valued column, numbered from 0
    Placeholder(usize),
}

impl Column {
    /// Label a column by its (untrimmed) header text
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        match Field::parse(name) {
            Some(field) => Column::Field(field),
            None => Column::Other(name.to_string()),
        }
    }

    /// The schema field, if this is one
    pub fn field(&self) -> Option<Field> {
        match self {
            Column::Field(field) => Some(*field),
            _ => None,
        }
    }

    /// True for synthetic placeholder columns
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Column::Placeholder(_))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Field(field) => f.write_str(field.as_str()),
            Column::Other(name) => f.write_str(name),
            Column::Placeholder(i) => write!(f, "{}{}", PLACEHOLDER_PREFIX, i),
        }
    }
}

/// A table of optional cells under labelled columns
///
/// Every row has exactly one cell per column; `None` is a null cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    columns: Vec<Column>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawFrame {
    /// Build a frame, padding short rows with nulls and cutting long ones
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column labels in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Rows in order
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a schema field's column
    pub fn position(&self, field: Field) -> Option<usize> {
        self.columns.iter().position(|c| c.field() == Some(field))
    }

    /// Take the frame apart
    pub fn into_parts(self) -> (Vec<Column>, Vec<Vec<Option<String>>>) {
        (self.columns, self.rows)
    }
}
