// Integration tests for snapshot parsing and loading

use std::path::PathBuf;

use regsweep_core::errors::ExErrorKind;
use regsweep_core::resolver::open_full_path;
use regsweep_core::{RegistryKey, RegistryValue};
use regsweep_store::snapshot::{load_snapshot_file, parse_snapshot_file, parse_snapshot_str};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_parse_vendor_snapshot() {
    let path = fixtures_dir().join("snapshot_vendor.yaml");

    let result = parse_snapshot_file(&path);

    assert!(result.is_ok(), "Should parse snapshot: {:?}", result.err());
    let snapshot = result.unwrap();
    assert_eq!(snapshot.schema_version, 1);
    assert_eq!(snapshot.keys.len(), 5);
    assert_eq!(snapshot.keys[0].path, "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor");
}

#[test]
fn test_load_vendor_snapshot() {
    let path = fixtures_dir().join("snapshot_vendor.yaml");

    let loaded = load_snapshot_file(&path).unwrap();

    assert_eq!(loaded.key_count, 5);
    assert_eq!(loaded.value_count, 10);
    assert_eq!(loaded.digest.len(), 64);
    // six roots plus SOFTWARE and the five listed keys
    assert_eq!(loaded.store.key_count(), 12);

    let app = open_full_path(&loaded.store, "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\App").unwrap();
    assert_eq!(
        app.get_value("Path").unwrap(),
        Some(RegistryValue::ExpandString("%ProgramFiles%\\App".to_string()))
    );
    assert_eq!(
        app.value_names().unwrap(),
        vec!["Version", "Path", "InstallDate"]
    );
}

#[test]
fn test_inaccessible_key_denies_enumeration() {
    let path = fixtures_dir().join("snapshot_vendor.yaml");
    let loaded = load_snapshot_file(&path).unwrap();

    let secrets =
        open_full_path(&loaded.store, "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\Secrets").unwrap();
    let err = secrets.subkey_names().unwrap_err();

    assert!(err.is_recoverable());
}

#[test]
fn test_load_rejects_unsupported_schema_version() {
    let path = fixtures_dir().join("snapshot_bad_version.yaml");

    let err = load_snapshot_file(&path).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(err.message().contains("Unsupported schema_version: 2"));
}

#[test]
fn test_missing_file_is_reported() {
    let path = fixtures_dir().join("does_not_exist.yaml");

    let err = load_snapshot_file(&path).unwrap_err();

    assert!(err.message().contains("Failed to read snapshot file"));
}

#[test]
fn test_load_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snap.yaml");
    std::fs::write(
        &path,
        "schema_version: 1\nkeys:\n  - path: 'HKU\\S-1-5-18'\n    values:\n      - { name: Q, kind: qword, data: 1 }\n",
    )
    .unwrap();

    let loaded = load_snapshot_file(&path).unwrap();

    let key = open_full_path(&loaded.store, "HKEY_USERS\\S-1-5-18").unwrap();
    assert_eq!(key.get_value("q").unwrap(), Some(RegistryValue::QWord(1)));
}

#[test]
fn test_multi_string_rejects_mapping() {
    let err = parse_snapshot_str(
        "schema_version: 1\nkeys:\n  - path: HKLM\n    values:\n      - { name: M, kind: multi_string, data: { a: 1 } }\n",
    )
    .unwrap_err();

    assert!(err.message().contains("expected list of text"));
}
