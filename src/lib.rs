//! pg2xlsx - Export the result of a PostgreSQL query to an xlsx spreadsheet.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod sheet;
