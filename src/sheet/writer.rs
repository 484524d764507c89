//! XLSX persistence for a `Sheet`.
//!
//! The workbook is serialized in memory, written to a temporary file in the
//! destination directory and renamed into place, so a failed export never
//! leaves a partial file behind.

use super::{Cell, CellKind, Sheet};
use crate::error::{ExportError, Result};
use chrono::DateTime;
use rust_xlsxwriter::{DocProperties, Format, Workbook, Worksheet, XlsxError};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Number format applied to datetime cells.
const DATETIME_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Mode given to a newly created sheet. A replaced file keeps its own.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Document metadata stored in the workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentProperties {
    pub author: Option<String>,
}

impl DocumentProperties {
    /// Properties naming the current login as author, if it is known.
    pub fn current_user() -> Self {
        let author = ["USER", "USERNAME"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()));
        Self { author }
    }

    fn to_doc_properties(&self) -> DocProperties {
        let properties = DocProperties::new();
        match &self.author {
            Some(author) => properties.set_author(author),
            None => properties,
        }
    }
}

/// Writes a sheet to an `.xlsx` file.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    path: PathBuf,
    properties: DocumentProperties,
}

impl XlsxWriter {
    /// Creates a writer targeting `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            properties: DocumentProperties::default(),
        }
    }

    /// Sets the document properties recorded in the workbook.
    pub fn with_properties(mut self, properties: DocumentProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Returns the destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `sheet` and atomically replaces the destination file.
    pub fn write(&self, sheet: &Sheet) -> Result<()> {
        let buffer = self.render(sheet).map_err(derive_xlsx_error)?;
        debug!(
            "Rendered workbook: {} bytes, {} rows",
            buffer.len(),
            sheet.row_count()
        );
        self.persist(&buffer)
    }

    /// Builds the workbook bytes.
    fn render(&self, sheet: &Sheet) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        workbook.set_properties(&self.properties.to_doc_properties());

        let datetime_format = Format::new().set_num_format(DATETIME_NUM_FORMAT);
        let worksheet = workbook.add_worksheet();

        for (col, column) in sheet.columns().iter().enumerate() {
            worksheet.set_column_width(col_index(col)?, column.width)?;
        }

        for (row, cells) in sheet.rows().iter().enumerate() {
            let row = row_index(row)?;
            for (col, cell) in cells.iter().enumerate() {
                write_cell(worksheet, row, col_index(col)?, cell, &datetime_format)?;
            }
        }

        workbook.save_to_buffer()
    }

    fn persist(&self, buffer: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
            ExportError::output(format!(
                "unable to save xlsx sheet to {}: {e}",
                self.path.display()
            ))
        })?;

        tmp.write_all(buffer)
            .and_then(|_| set_output_permissions(tmp.as_file(), &self.path))
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| {
                ExportError::output(format!(
                    "unable to save xlsx sheet to {}: {e}",
                    self.path.display()
                ))
            })?;

        tmp.persist(&self.path).map_err(|e| {
            ExportError::output(format!(
                "unable to save xlsx sheet to {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}

/// Temp files are created owner-only; give the sheet regular file permissions.
#[cfg(unix)]
fn set_output_permissions(file: &File, target: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = match std::fs::metadata(target) {
        Ok(meta) => meta.permissions().mode() & 0o7777,
        Err(_) => NEW_FILE_MODE,
    };
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_output_permissions(_file: &File, _target: &Path) -> io::Result<()> {
    Ok(())
}

/// Writes one cell with the representation its kind calls for.
///
/// A number or datetime whose text cannot be interpreted is written as a
/// string rather than dropped.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    datetime_format: &Format,
) -> std::result::Result<(), XlsxError> {
    match cell.kind {
        CellKind::String => {
            if !cell.text.is_empty() {
                worksheet.write_string(row, col, cell.text.as_str())?;
            }
        }
        CellKind::Number => match cell.text.parse::<f64>() {
            Ok(n) if n.is_finite() => {
                worksheet.write_number(row, col, n)?;
            }
            _ => {
                worksheet.write_string(row, col, cell.text.as_str())?;
            }
        },
        CellKind::Datetime => match DateTime::parse_from_rfc3339(&cell.text) {
            Ok(ts) => {
                worksheet.write_datetime_with_format(
                    row,
                    col,
                    &ts.naive_local(),
                    datetime_format,
                )?;
            }
            Err(_) => {
                worksheet.write_string(row, col, cell.text.as_str())?;
            }
        },
    }
    Ok(())
}

fn row_index(row: usize) -> std::result::Result<u32, XlsxError> {
    u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_index(col: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

fn derive_xlsx_error(error: XlsxError) -> ExportError {
    ExportError::output(format!("unable to build xlsx sheet: {error}"))
}
