//! Interactive password entry.

use crate::error::{ExportError, Result};
use std::io::{self, BufRead, Write};

/// Asks the user for a password.
pub trait PasswordPrompt {
    /// Blocks until a password has been entered.
    fn prompt(&self) -> Result<String>;
}

/// Prompts on stderr and reads one line from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl PasswordPrompt for ConsolePrompt {
    fn prompt(&self) -> Result<String> {
        eprint!("Enter password: ");
        io::stderr()
            .flush()
            .map_err(|e| ExportError::input(format!("unable to read password: {e}")))?;

        read_password_line(&mut io::stdin().lock())
    }
}

/// Reads a single line and strips its line terminator.
pub(crate) fn read_password_line(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| ExportError::input(format!("unable to read password: {e}")))?;

    if read == 0 {
        return Err(ExportError::input("unable to read password: end of input"));
    }

    let trimmed = line.trim_end_matches(['\n', '\r']);
    Ok(trimmed.to_string())
}
