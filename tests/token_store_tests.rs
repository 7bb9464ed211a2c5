//! File token store: round trips, overwrite semantics and on-disk format.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use kommo_bridge::auth::{AccountToken, AuthError, FileTokenStore, TokenStore};

fn temp_store() -> (TempDir, FileTokenStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = FileTokenStore::new(dir.path().join("tokens.json"));
    (dir, store)
}

fn record(access: &str, domain: &str) -> AccountToken {
    AccountToken {
        access_token: access.to_string(),
        refresh_token: format!("{access}-refresh"),
        expires: 1_900_000_000,
        base_domain: domain.to_string(),
    }
}

#[test]
fn round_trip_preserves_record() {
    let (_dir, store) = temp_store();
    let original = record("acc-123", "acme.kommo.com");

    store.save("acme", &original).expect("save");
    let loaded = store.load("acme").expect("load").expect("present");

    assert_eq!(loaded, original);
}

#[test]
fn acme_sample_reads_back_access_token() {
    let (_dir, store) = temp_store();
    fs::write(
        store.path(),
        r#"{"acme": {"access_token":"a","refresh_token":"b","expires":999,"base_domain":"acme.kommo.com"}}"#,
    )
    .unwrap();

    let token = store.load("acme").unwrap().unwrap();
    assert_eq!(token.access_token, "a");
    assert_eq!(token.refresh_token, "b");
    assert_eq!(token.expires, 999);
    assert_eq!(token.base_domain, "acme.kommo.com");
}

#[test]
fn overwrite_keeps_other_accounts() {
    let (_dir, store) = temp_store();
    store.save("acme", &record("old", "acme.kommo.com")).unwrap();
    store.save("globex", &record("globex", "globex.kommo.com")).unwrap();

    store.save("acme", &record("new", "acme.kommo.com")).unwrap();

    assert_eq!(store.load("acme").unwrap().unwrap().access_token, "new");
    assert_eq!(
        store.load("globex").unwrap().unwrap(),
        record("globex", "globex.kommo.com")
    );
    assert_eq!(
        store.accounts().unwrap(),
        vec!["acme".to_string(), "globex".to_string()]
    );
}

#[test]
fn unknown_account_is_none() {
    let (_dir, store) = temp_store();
    store.save("acme", &record("a", "acme.kommo.com")).unwrap();
    assert!(store.load("nobody").unwrap().is_none());
}

#[test]
fn file_is_a_single_name_keyed_mapping() {
    let (_dir, store) = temp_store();
    store.save("acme", &record("a", "acme.kommo.com")).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "acme": {
                "access_token": "a",
                "refresh_token": "a-refresh",
                "expires": 1_900_000_000,
                "base_domain": "acme.kommo.com"
            }
        })
    );
}

#[test]
fn malformed_file_fails_reads_and_writes() {
    let (_dir, store) = temp_store();
    fs::write(store.path(), "[1, 2").unwrap();

    assert!(matches!(store.load("acme"), Err(AuthError::Serialization(_))));
    assert!(matches!(
        store.save("acme", &record("a", "acme.kommo.com")),
        Err(AuthError::Serialization(_))
    ));
}

#[test]
fn two_stores_on_one_file_see_each_other() {
    let (dir, first) = temp_store();
    let second = FileTokenStore::new(dir.path().join("tokens.json"));

    first.save("acme", &record("a", "acme.kommo.com")).unwrap();
    second.save("globex", &record("g", "globex.kommo.com")).unwrap();

    assert!(first.load("globex").unwrap().is_some());
    assert!(second.load("acme").unwrap().is_some());
}
