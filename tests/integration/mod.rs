//! Integration tests for pg2xlsx.

pub mod cli_test;
pub mod credentials_test;
pub mod export_test;
pub mod postgres_test;
