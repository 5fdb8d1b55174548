//! Snapshot loader
//!
//! Replays a validated snapshot into a fresh in-memory store

use std::path::Path;
use std::time::Instant;

use regsweep_core::{log_op_end, log_op_error, log_op_start, MemoryStore};

use crate::errors::{from_registry, snapshot_value_invalid, Result};
use crate::snapshot::digest::compute_snapshot_digest;
use crate::snapshot::format_v1::SnapshotV1;
use crate::snapshot::parser::parse_snapshot_file;

/// A store built from a snapshot file, plus what is known about the input
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub store: MemoryStore,
    /// SHA256 of the canonical snapshot
    pub digest: String,
    /// Keys listed in the file (implicit parents not counted)
    pub key_count: usize,
    pub value_count: usize,
}

/// Build a store from a validated snapshot
///
/// Keys are created in file order, intermediate keys implicitly. Keys marked
/// `inaccessible` fail enumeration with `AccessDenied`.
///
/// # Errors
///
/// Returns an error if a path or value is rejected by the store.
pub fn load_snapshot(snapshot: &SnapshotV1) -> Result<MemoryStore> {
    let mut store = MemoryStore::new();

    for key in &snapshot.keys {
        store
            .insert_key(&key.path)
            .map_err(|e| from_registry("snapshot_load", e))?;

        for value in &key.values {
            let registry_value = value
                .to_registry_value()
                .map_err(|reason| snapshot_value_invalid(&key.path, &value.name, &reason))?;
            store
                .set_value(&key.path, &value.name, registry_value)
                .map_err(|e| from_registry("snapshot_load", e))?;
        }

        if key.inaccessible {
            store
                .deny_key(&key.path)
                .map_err(|e| from_registry("snapshot_load", e))?;
        }
    }

    Ok(store)
}

/// Parse, validate, digest and load a snapshot file
///
/// # Errors
///
/// Returns an `InvalidInput` error for unreadable or invalid files.
pub fn load_snapshot_file(path: &Path) -> Result<LoadedSnapshot> {
    log_op_start!("snapshot_load", path = %path.display());
    let start = Instant::now();

    let result = load_snapshot_file_impl(path).map_err(|e| {
        log_op_error!(
            "snapshot_load",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "snapshot_load",
        duration_ms = start.elapsed().as_millis() as u64,
        key_count = result.key_count,
        value_count = result.value_count,
        digest = %result.digest
    );

    Ok(result)
}

fn load_snapshot_file_impl(path: &Path) -> Result<LoadedSnapshot> {
    let snapshot = parse_snapshot_file(path)?;
    let digest = compute_snapshot_digest(&snapshot)?;
    let store = load_snapshot(&snapshot)?;

    Ok(LoadedSnapshot {
        store,
        digest,
        key_count: snapshot.keys.len(),
        value_count: snapshot.keys.iter().map(|k| k.values.len()).sum(),
    })
}
