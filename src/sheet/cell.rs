//! Spreadsheet cells and the mapping from raw database values.
//!
//! `classify` decides the cell kind of every exported value. Text that looks
//! numeric becomes a number unless it starts with `0` and has no decimal
//! point: postal codes, UPCs and zero-padded identifiers stay strings so
//! their leading zeros survive.

use crate::db::RawValue;
use chrono::SecondsFormat;

/// How a cell is presented in the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    String,
    Number,
    Datetime,
}

/// One spreadsheet value with its display kind.
///
/// `text` is decimal ASCII for numbers, RFC 3339 for datetimes and any
/// UTF-8 for strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub text: String,
}

impl Cell {
    pub fn string(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::String,
            text: text.into(),
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Number,
            text: text.into(),
        }
    }

    pub fn datetime(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Datetime,
            text: text.into(),
        }
    }

    /// An empty string cell.
    pub fn empty() -> Self {
        Self::string("")
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

/// Converts a raw database value into a spreadsheet cell.
///
/// Never fails. Byte sequences that are not valid UTF-8 are decoded lossily.
pub fn classify(raw: &RawValue) -> Cell {
    match raw {
        RawValue::Null => Cell::empty(),
        RawValue::Bool(true) => Cell::string("Y"),
        RawValue::Bool(false) => Cell::string("N"),
        RawValue::Int(i) => Cell::number(i.to_string()),
        // Six fractional digits, same as C's `%f`.
        RawValue::Float(f) => Cell::number(format!("{f:.6}")),
        RawValue::Timestamp(ts) => Cell::datetime(ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        RawValue::Bytes(bytes) => classify_text(String::from_utf8_lossy(bytes).into_owned()),
        RawValue::Other(rendered) => Cell::string(rendered.clone()),
    }
}

/// Applies the numeric-looking heuristic to driver text.
fn classify_text(s: String) -> Cell {
    if looks_numeric(&s) {
        Cell::number(s)
    } else {
        Cell::string(s)
    }
}

fn looks_numeric(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    if !s.contains('.') && s.starts_with('0') {
        return false;
    }
    // Out-of-range and non-finite values have no numeric cell form.
    s.parse::<f64>().is_ok_and(f64::is_finite)
}
