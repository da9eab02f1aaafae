//! Integration tests for file persistence and process-environment overlay.
//!
//! These tests exercise the store end to end: saving and reloading the
//! backing JSON file, the constructor that loads eagerly, load failure
//! modes, and precedence of real process environment variables.

use envstore::{Coerce, Coerced, Store, StoreError};
use serial_test::serial;

/// save followed by load on a fresh store reproduces keys and values.
#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");

    let mut original = Store::new();
    original.set("FOO", "bar").unwrap();
    original.set("BAR", "foo").unwrap();

    let text = original.save(&path).expect("save should succeed");
    let written: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(written, serde_json::json!({"FOO": "bar", "BAR": "foo"}));

    let mut restored = Store::new();
    let merged = restored.load(&path).expect("load should succeed");
    assert_eq!(merged, vec!["FOO".to_string(), "BAR".to_string()]);
    assert_eq!(restored.keys(), original.keys());
    assert_eq!(restored.get("FOO").unwrap(), Some("bar".to_string()));
    assert_eq!(restored.get("BAR").unwrap(), Some("foo".to_string()));
}

/// `Store::open` loads the file during construction.
#[test]
fn open_loads_eagerly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, r#"{"NAME": "envstore"}"#).unwrap();

    let store = Store::open(&path).expect("open should succeed");
    assert_eq!(store.get("NAME").unwrap(), Some("envstore".to_string()));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = Store::new();
    let result = store.load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(StoreError::Io(_))));
    assert!(store.is_empty());
}

#[test]
fn load_malformed_json_is_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{oops").unwrap();

    let mut store = Store::new();
    assert!(matches!(store.load(&path), Err(StoreError::Parse(_))));
}

#[test]
fn load_non_string_value_names_offending_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mixed.json");
    std::fs::write(&path, r#"{"OK": "yes", "PORT": 8089}"#).unwrap();

    let mut store = Store::new();
    match store.load(&path) {
        Err(StoreError::InvalidValue { key }) => assert_eq!(key, "PORT"),
        other => panic!("expected InvalidValue, got {other:?}"),
    }
    assert!(store.is_empty());
}

/// Process environment entries win over store entries of the same key.
#[test]
#[serial]
fn process_environment_wins_over_store() {
    let var = "ENVSTORE_IT_PRECEDENCE";
    temp_env::with_vars([(var, Some("from-env"))], || {
        let mut store = Store::new();
        store.set(var, "from-store").unwrap();
        assert_eq!(store.get(var).unwrap(), Some("from-env".to_string()));
    });
}

/// The environment lookup is case-sensitive and unaffected by `set`'s
/// upper-casing.
#[test]
#[serial]
fn process_environment_lookup_is_exact() {
    let var = "ENVSTORE_IT_EXACT";
    temp_env::with_vars([(var, Some("present"))], || {
        let store = Store::new();
        assert_eq!(store.get(var).unwrap(), Some("present".to_string()));
        assert_eq!(store.get(var.to_lowercase()).unwrap(), None);
    });
}

/// Typed reads apply to environment values like any other raw value.
#[test]
#[serial]
fn process_environment_values_coerce() {
    let var = "ENVSTORE_IT_COERCE";
    temp_env::with_vars([(var, Some("yes"))], || {
        let store = Store::new();
        assert_eq!(
            store
                .get_as(var, serde_json::Value::Null, &Coerce::Boolean)
                .unwrap(),
            Coerced::Bool(true)
        );
    });
}
