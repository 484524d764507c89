//! Password resolution for database connections.
//!
//! A stored password is looked up first; a miss falls back to asking the
//! user. Both sides sit behind traits so tests can replace them.

mod pgpass;
mod prompt;

pub use pgpass::PgPassFile;
pub use prompt::{ConsolePrompt, PasswordPrompt};

use crate::error::Result;
use tracing::debug;

/// Connection coordinates a stored password is keyed by.
///
/// Absent coordinates are empty strings and compare exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialKey {
    pub host: String,
    pub port: String,
    pub dbname: String,
    pub username: String,
}

impl CredentialKey {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        dbname: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            dbname: dbname.into(),
            username: username.into(),
        }
    }
}

/// A source of stored passwords.
pub trait PasswordStore {
    /// Returns the stored password for `key`, or `None` when there is none.
    fn lookup(&self, key: &CredentialKey) -> Option<String>;
}

/// An absent store never has a password.
impl<T: PasswordStore> PasswordStore for Option<T> {
    fn lookup(&self, key: &CredentialKey) -> Option<String> {
        self.as_ref().and_then(|store| store.lookup(key))
    }
}

/// Resolves a password from a store, prompting when the store has none.
pub struct CredentialResolver<'a> {
    store: &'a dyn PasswordStore,
    prompt: &'a dyn PasswordPrompt,
}

impl<'a> CredentialResolver<'a> {
    /// Creates a resolver over the given store and prompt.
    pub fn new(store: &'a dyn PasswordStore, prompt: &'a dyn PasswordPrompt) -> Self {
        Self { store, prompt }
    }

    /// Returns the password for `key`.
    ///
    /// A store miss is not an error; only a failed prompt is.
    pub fn resolve(&self, key: &CredentialKey) -> Result<String> {
        if let Some(password) = self.store.lookup(key) {
            debug!("Using stored password for user '{}'", key.username);
            return Ok(password);
        }

        debug!(
            "No stored password for user '{}', prompting",
            key.username
        );
        self.prompt.prompt()
    }
}
