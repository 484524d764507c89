//! Password file lookup tests.

use pg2xlsx::credentials::{CredentialKey, PasswordStore, PgPassFile};
use std::io::Write;

fn pgpass(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Scenario: exact four-way match
/// Given an entry localhost:5432:mydb:alice:secret
/// Then alice gets "secret" and bob gets nothing
#[test]
fn test_lookup_by_user() {
    let file = pgpass("localhost:5432:mydb:alice:secret\n");
    let store = PgPassFile::new(file.path());

    assert_eq!(
        store.lookup(&CredentialKey::new("localhost", "5432", "mydb", "alice")),
        Some("secret".to_string())
    );
    assert_eq!(
        store.lookup(&CredentialKey::new("localhost", "5432", "mydb", "bob")),
        None
    );
}

#[test]
fn test_every_field_must_match() {
    let file = pgpass("localhost:5432:mydb:alice:secret\n");
    let store = PgPassFile::new(file.path());

    for key in [
        CredentialKey::new("otherhost", "5432", "mydb", "alice"),
        CredentialKey::new("localhost", "5433", "mydb", "alice"),
        CredentialKey::new("localhost", "5432", "otherdb", "alice"),
    ] {
        assert_eq!(store.lookup(&key), None, "{key:?}");
    }
}

#[test]
fn test_commented_file() {
    let file = pgpass(
        "# staging\n\
         staging:5432:app:alice:stage-pass\n\
         # production\n\
         prod:5432:app:alice:prod-pass\n",
    );
    let store = PgPassFile::new(file.path());

    assert_eq!(
        store.lookup(&CredentialKey::new("prod", "5432", "app", "alice")),
        Some("prod-pass".to_string())
    );
}

#[test]
fn test_malformed_file_is_a_miss() {
    let file = pgpass("localhost:5432:mydb:alice:secret\nlocalhost:5432:mydb\n");
    let store = PgPassFile::new(file.path());

    assert_eq!(
        store.lookup(&CredentialKey::new("localhost", "5432", "mydb", "alice")),
        None
    );
}

#[test]
fn test_missing_store_is_a_miss() {
    let store: Option<PgPassFile> = None;
    assert_eq!(
        store.lookup(&CredentialKey::new("localhost", "5432", "mydb", "alice")),
        None
    );
}
