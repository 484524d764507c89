//! Reader for the PostgreSQL password file (`~/.pgpass`).
//!
//! Each entry is `host:port:dbname:username:password`. Lines starting with
//! `#` are comments. Any malformed entry makes the whole file unusable.

use super::{CredentialKey, PasswordStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the password file location.
const PGPASSFILE_ENV: &str = "PGPASSFILE";

const FIELDS_PER_RECORD: usize = 5;

/// A password file on disk.
#[derive(Debug, Clone)]
pub struct PgPassFile {
    path: PathBuf,
}

impl PgPassFile {
    /// Uses the password file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `$PGPASSFILE` if set, otherwise `~/.pgpass`.
    pub fn default_location() -> Option<Self> {
        if let Some(path) = std::env::var_os(PGPASSFILE_ENV).filter(|p| !p.is_empty()) {
            return Some(Self::new(path));
        }
        dirs::home_dir().map(|home| Self::new(home.join(".pgpass")))
    }

    /// Returns the path of the password file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PasswordStore for PgPassFile {
    fn lookup(&self, key: &CredentialKey) -> Option<String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Cannot read {}: {e}", self.path.display());
                return None;
            }
        };

        match find_password(&content, key) {
            Ok(found) => found,
            Err(line) => {
                debug!(
                    "Ignoring {}: malformed entry on line {line}",
                    self.path.display()
                );
                None
            }
        }
    }
}

/// Parses one entry line into its fields, or `None` if the field count is wrong.
fn parse_record(line: &str) -> Option<Vec<&str>> {
    let fields: Vec<&str> = line.split(':').map(str::trim_start).collect();
    (fields.len() == FIELDS_PER_RECORD).then_some(fields)
}

/// Returns the password of the first entry matching `key`.
///
/// Every entry is validated before any match is returned; the error carries
/// the 1-based line number of the first malformed entry.
pub(crate) fn find_password(
    content: &str,
    key: &CredentialKey,
) -> std::result::Result<Option<String>, usize> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        records.push(parse_record(line).ok_or(index + 1)?);
    }

    Ok(records
        .into_iter()
        .find(|r| {
            r[0] == key.host && r[1] == key.port && r[2] == key.dbname && r[3] == key.username
        })
        .map(|r| r[4].to_string()))
}
