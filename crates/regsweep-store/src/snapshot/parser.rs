//! Snapshot parser with validation
//!
//! Parses YAML and validates schema version, root names, key and value
//! uniqueness, and that every value's data fits its kind

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regsweep_core::RootKeyType;

use crate::errors::{
    snapshot_key_invalid, snapshot_validation, snapshot_value_invalid, Result,
};
use crate::snapshot::format_v1::SnapshotV1;

/// Parse a snapshot file from a path
///
/// # Errors
///
/// Returns an `InvalidInput` error if the file cannot be read or is not a
/// valid snapshot.
pub fn parse_snapshot_file(path: &Path) -> Result<SnapshotV1> {
    let content = fs::read_to_string(path)
        .map_err(|e| snapshot_validation(&format!("Failed to read snapshot file: {}", e)))?;

    parse_snapshot_str(&content)
}

/// Parse a snapshot from a string
///
/// Key paths are returned with their root normalised to the canonical name.
///
/// # Errors
///
/// Returns an `InvalidInput` error describing the first problem found.
pub fn parse_snapshot_str(content: &str) -> Result<SnapshotV1> {
    let mut snapshot: SnapshotV1 = serde_yaml::from_str(content)
        .map_err(|e| snapshot_validation(&format!("YAML parse error: {}", e)))?;

    validate_snapshot(&mut snapshot)?;

    Ok(snapshot)
}

/// Rewrite a leading alias (`HKLM\...`) to the canonical root name
///
/// # Errors
///
/// Returns an `InvalidInput` error if the leading segment is not a root.
pub fn normalise_key_path(path: &str) -> Result<String> {
    let trimmed = path.trim_matches('\\');
    let (root_name, rest) = trimmed.split_once('\\').unwrap_or((trimmed, ""));
    let root = RootKeyType::from_name(root_name)
        .map_err(|e| snapshot_key_invalid(path, &e.to_string()))?;

    if rest.is_empty() {
        Ok(root.canonical_name().to_string())
    } else {
        Ok(format!("{}\\{}", root.canonical_name(), rest))
    }
}

fn validate_snapshot(snapshot: &mut SnapshotV1) -> Result<()> {
    if snapshot.schema_version != 1 {
        return Err(snapshot_validation(&format!(
            "Unsupported schema_version: {}. Expected 1",
            snapshot.schema_version
        )));
    }

    let mut seen_keys = HashSet::new();
    for key in &mut snapshot.keys {
        key.path = normalise_key_path(&key.path)?;

        if key.path.split('\\').any(str::is_empty) {
            return Err(snapshot_key_invalid(&key.path, "Key path has an empty segment"));
        }

        if !seen_keys.insert(key.path.to_lowercase()) {
            return Err(snapshot_key_invalid(
                &key.path,
                &format!("Duplicate key {}", key.path),
            ));
        }

        let mut seen_values = HashSet::new();
        for value in &key.values {
            if !seen_values.insert(value.name.to_lowercase()) {
                return Err(snapshot_value_invalid(
                    &key.path,
                    &value.name,
                    &format!("Duplicate value '{}' in key {}", value.name, key.path),
                ));
            }

            value
                .to_registry_value()
                .map_err(|reason| snapshot_value_invalid(&key.path, &value.name, &reason))?;
        }
    }

    Ok(())
}
