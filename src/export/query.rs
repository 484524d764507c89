//! Where the query text comes from.

use crate::error::{ExportError, Result};
use std::io::Read;
use std::path::PathBuf;

/// Source of the SQL to execute, in priority order: inline command, file, stdin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuerySource {
    /// A single command given on the command line.
    Command(String),
    /// A file holding the query.
    File(PathBuf),
    /// Everything on standard input.
    #[default]
    Stdin,
}

impl QuerySource {
    /// Picks the source from the command and file options.
    pub fn from_options(command: Option<String>, file: Option<PathBuf>) -> Self {
        match (command.filter(|c| !c.is_empty()), file) {
            (Some(command), _) => Self::Command(command),
            (None, Some(file)) => Self::File(file),
            (None, None) => Self::Stdin,
        }
    }

    /// Returns true if the query is read from standard input.
    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Reads the query text, using standard input for `Stdin`.
    pub fn read_query(&self) -> Result<String> {
        self.read_query_from(&mut std::io::stdin().lock())
    }

    /// Reads the query text, using `stdin` for `Stdin`.
    pub fn read_query_from(&self, stdin: &mut impl Read) -> Result<String> {
        match self {
            Self::Command(command) => Ok(command.clone()),
            Self::File(path) => std::fs::read_to_string(path).map_err(|e| {
                ExportError::input(format!("unable to read query from {}: {e}", path.display()))
            }),
            Self::Stdin => {
                let mut query = String::new();
                stdin
                    .read_to_string(&mut query)
                    .map_err(|e| ExportError::input(format!("unable to read query: {e}")))?;
                Ok(query)
            }
        }
    }
}
