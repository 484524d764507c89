//! Assembles a worksheet from a query result.

use crate::db::DatabaseClient;
use crate::error::Result;
use crate::sheet::{classify, Column, Row, Sheet};
use futures::TryStreamExt;
use tracing::debug;

/// Runs `sql` and collects the result into a sheet.
///
/// The schema comes from the query's metadata, so a zero-row result still
/// yields the right columns. It is read after the rows so that settings made
/// earlier in a multi-statement script apply to it. With `titles`, the first
/// row holds the column names. Data rows keep the order the database returned
/// them in.
pub async fn build_sheet(
    client: &dyn DatabaseClient,
    sql: &str,
    column_width: f64,
    titles: bool,
) -> Result<Sheet> {
    let mut data: Vec<Row> = Vec::new();
    let mut rows = client.fetch_rows(sql);
    while let Some(raw) = rows.try_next().await? {
        data.push(raw.iter().map(classify).collect());
    }
    // The stream holds the only pooled connection.
    drop(rows);
    debug!("Query returned {} rows", data.len());

    let columns: Vec<Column> = client
        .describe(sql)
        .await?
        .into_iter()
        .map(|info| Column::new(info.name, column_width))
        .collect();
    debug!("Query returns {} columns", columns.len());

    let mut sheet = Sheet::with_columns(columns);

    if titles {
        sheet.append_row(sheet.title_row())?;
    }

    for row in data {
        sheet.append_row(row)?;
    }

    Ok(sheet)
}
