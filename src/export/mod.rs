//! The query-to-spreadsheet export.
//!
//! `run` drives one whole export: credentials, query text, execution, sheet
//! assembly and the final write. Any failure aborts the run.

mod pipeline;
mod query;

pub use pipeline::build_sheet;
pub use query::QuerySource;

use crate::config::{ConnectionParams, ExportConfig, RunMode};
use crate::credentials::{CredentialResolver, PasswordPrompt, PasswordStore};
use crate::db::{self, DatabaseClient};
use crate::error::Result;
use crate::sheet::{DocumentProperties, XlsxWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a finished export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub columns: usize,
    /// Data rows, not counting a title row.
    pub rows: usize,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Exported(ExportSummary),
    /// Connection test succeeded; carries the display-safe target.
    Connected(String),
}

/// Runs one export (or connection test) as configured.
pub async fn run(
    config: &ExportConfig,
    store: &dyn PasswordStore,
    prompt: &dyn PasswordPrompt,
) -> Result<RunOutcome> {
    let params = resolve_connection(config, store, prompt)?;
    info!("Connection: {}", params.display_string());

    let output = match &config.mode {
        RunMode::TestConnection => {
            let client = db::connect(&params).await?;
            client.close().await?;
            return Ok(RunOutcome::Connected(params.display_string()));
        }
        RunMode::Export { output } => output,
    };

    let sql = config.query_source.read_query()?;

    let client = db::connect(&params).await?;
    let result = export_with_client(config, client.as_ref(), &sql, output).await;
    client.close().await?;

    result.map(RunOutcome::Exported)
}

/// Executes `sql` on `client` and writes the sheet to `output`.
pub async fn export_with_client(
    config: &ExportConfig,
    client: &dyn DatabaseClient,
    sql: &str,
    output: &Path,
) -> Result<ExportSummary> {
    let sheet = build_sheet(client, sql, config.column_width, config.titles).await?;

    let title_rows = usize::from(config.titles);
    let summary = ExportSummary {
        output: output.to_path_buf(),
        columns: sheet.columns().len(),
        rows: sheet.row_count() - title_rows,
    };

    let properties = match &config.author {
        Some(author) => DocumentProperties {
            author: Some(author.clone()),
        },
        None => DocumentProperties::current_user(),
    };

    XlsxWriter::new(output)
        .with_properties(properties)
        .write(&sheet)?;

    info!(
        "Wrote {} rows x {} columns to {}",
        summary.rows,
        summary.columns,
        summary.output.display()
    );
    Ok(summary)
}

/// Fills in the password when one is needed and not already known.
///
/// A stored-password miss falls back to the prompt; an empty answer means
/// connecting without a password.
pub fn resolve_connection(
    config: &ExportConfig,
    store: &dyn PasswordStore,
    prompt: &dyn PasswordPrompt,
) -> Result<ConnectionParams> {
    let params = &config.connection;
    if !params.needs_password(config.no_password) {
        return Ok(params.clone());
    }

    if config.query_source.is_stdin() && config.mode != RunMode::TestConnection {
        warn!("A password prompt will read from standard input, which also supplies the query");
    }

    let password = CredentialResolver::new(store, prompt).resolve(&params.credential_key())?;
    if password.is_empty() {
        Ok(params.clone())
    } else {
        Ok(params.with_password(password))
    }
}
