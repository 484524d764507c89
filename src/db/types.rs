//! Result value types for pg2xlsx.
//!
//! Defines the loosely-typed values a database driver hands back for each
//! cell, before they are classified into spreadsheet cells.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type as reported by the driver.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of raw values, in column order.
pub type RawRow = Vec<RawValue>;

/// A single value as returned by the database driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawValue {
    /// NULL value.
    #[default]
    Null,

    /// Opaque byte/text sequence (numeric-as-text, character and unknown types).
    Bytes(Vec<u8>),

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// 64-bit floating point number.
    Float(f64),

    /// Timestamp with its timezone offset.
    Timestamp(DateTime<FixedOffset>),

    /// Any other driver value, carried as its generic textual rendering.
    Other(String),
}

impl RawValue {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Builds a timestamp value at UTC from a zone-less date and time.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        RawValue::Timestamp(Utc.from_utc_datetime(&datetime).fixed_offset())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "NULL"),
            RawValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Int(i) => write!(f, "{i}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            RawValue::Other(s) => write!(f, "{s}"),
        }
    }
}

// Conversion implementations for common types
impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(v as i64)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Bytes(v.into_bytes())
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(v: Vec<u8>) -> Self {
        RawValue::Bytes(v)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(v: DateTime<Utc>) -> Self {
        RawValue::Timestamp(v.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for RawValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        RawValue::Timestamp(v)
    }
}

impl From<NaiveDateTime> for RawValue {
    fn from(v: NaiveDateTime) -> Self {
        RawValue::from_naive(v)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(v: NaiveDate) -> Self {
        RawValue::from_naive(v.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T> From<Option<T>> for RawValue
where
    T: Into<RawValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => RawValue::Null,
        }
    }
}
