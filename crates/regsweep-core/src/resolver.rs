//! Root key resolution
//!
//! The only place that turns a root identifier plus key path into an opened
//! handle, and an opened handle back into its root.

use crate::errors::{RegistryError, Result};
use crate::model::RootKeyType;
use crate::store::{RegistryKey, RegistryStore};

/// Open `key_path` under `root`; an empty path returns the root handle
///
/// # Errors
///
/// * `KeyNotFound` - If the path does not exist
/// * Store errors from opening the root or the path
pub fn open_key<S: RegistryStore>(store: &S, root: RootKeyType, key_path: &str) -> Result<S::Key> {
    let root_key = store.open_root(root)?;
    if key_path.is_empty() {
        return Ok(root_key);
    }

    root_key
        .open_subkey(key_path)?
        .ok_or_else(|| RegistryError::KeyNotFound {
            root: root.canonical_name().to_string(),
            key_path: key_path.to_string(),
        })
}

/// Open `key_path` under the root named `root_name` (canonical name or alias)
///
/// # Errors
///
/// * `UnknownRoot` - If `root_name` is not in the root table
/// * `KeyNotFound` - If the path does not exist
pub fn open_key_by_name<S: RegistryStore>(
    store: &S,
    root_name: &str,
    key_path: &str,
) -> Result<S::Key> {
    let root = RootKeyType::from_name(root_name)?;
    open_key(store, root, key_path)
}

/// Open a key from its full path, `<root name>[\<key path>]`
///
/// # Errors
///
/// * `UnknownRoot` - If the leading segment is not a root name
/// * `KeyNotFound` - If the path does not exist
pub fn open_full_path<S: RegistryStore>(store: &S, full_path: &str) -> Result<S::Key> {
    let (root_name, key_path) = full_path.split_once('\\').unwrap_or((full_path, ""));
    open_key_by_name(store, root_name, key_path)
}

/// Which root an opened key descends from
///
/// # Errors
///
/// Returns `UnknownRoot` if the key's path is not under any root.
pub fn classify<K: RegistryKey>(key: &K) -> Result<RootKeyType> {
    RootKeyType::classify(key.name())
}
