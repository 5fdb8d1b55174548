//! Snapshot digest canonicalization
//!
//! Computes stable SHA256 digests of snapshots so reports can name the
//! exact input they were produced from

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{serialization, Result};
use crate::snapshot::format_v1::{SnapshotKey, SnapshotV1};

/// Canonical representation of a snapshot for digest calculation
#[derive(Debug, Clone, Serialize)]
struct CanonicalSnapshot {
    schema_version: u32,
    keys: Vec<CanonicalKey>,
}

#[derive(Debug, Clone, Serialize)]
struct CanonicalKey {
    path: String,
    inaccessible: bool,
    /// Value order is kept; it is the enumeration order of the key
    values: Vec<CanonicalValue>,
}

#[derive(Debug, Clone, Serialize)]
struct CanonicalValue {
    name: String,
    value: regsweep_core::RegistryValue,
}

/// Compute a stable digest for a validated snapshot
///
/// Returns a SHA256 hex digest of the canonicalized snapshot. Key order,
/// path case and YAML layout do not affect it; value order does.
///
/// # Errors
///
/// Returns a serialization error if a value's data does not fit its kind
/// (cannot happen for a snapshot that passed validation).
pub fn compute_snapshot_digest(snapshot: &SnapshotV1) -> Result<String> {
    let canonical = canonicalize_snapshot(snapshot)?;

    let json = serde_json::to_string(&canonical)
        .map_err(|e| serialization("snapshot_digest", e))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    Ok(hex::encode(result))
}

fn canonicalize_snapshot(snapshot: &SnapshotV1) -> Result<CanonicalSnapshot> {
    let mut keys = snapshot
        .keys
        .iter()
        .map(canonicalize_key)
        .collect::<Result<Vec<_>>>()?;
    keys.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(CanonicalSnapshot {
        schema_version: snapshot.schema_version,
        keys,
    })
}

fn canonicalize_key(key: &SnapshotKey) -> Result<CanonicalKey> {
    let values = key
        .values
        .iter()
        .map(|v| {
            v.to_registry_value()
                .map(|value| CanonicalValue {
                    name: v.name.to_lowercase(),
                    value,
                })
                .map_err(|reason| serialization("snapshot_digest", reason))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CanonicalKey {
        path: key.path.to_lowercase(),
        inaccessible: key.inaccessible,
        values,
    })
}
