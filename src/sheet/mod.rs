//! In-memory worksheet model.
//!
//! A `Sheet` holds a fixed column schema and the rows appended to it, in
//! arrival order. It is persisted as a whole by `XlsxWriter`.

mod cell;
mod writer;

pub use cell::{classify, Cell, CellKind};
pub use writer::{DocumentProperties, XlsxWriter};

use crate::error::{ExportError, Result};

/// Display width given to every column unless configured otherwise.
pub const DEFAULT_COLUMN_WIDTH: f64 = 10.0;

/// A column of the worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub width: f64,
}

impl Column {
    pub fn new(name: impl Into<String>, width: f64) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// One row of cells, one per column.
pub type Row = Vec<Cell>;

/// A single worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Sheet {
    /// Creates an empty sheet with the given column schema.
    pub fn with_columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Returns a row of empty string cells sized to the schema.
    pub fn new_row(&self) -> Row {
        vec![Cell::empty(); self.columns.len()]
    }

    /// Returns a row of string cells holding the column names.
    pub fn title_row(&self) -> Row {
        self.columns.iter().map(|c| Cell::string(c.name.clone())).collect()
    }

    /// Appends a row after all previously appended rows.
    pub fn append_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ExportError::internal(format!(
                "row has {} cells but the sheet has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows, including a title row if one was appended.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
