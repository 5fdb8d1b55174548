use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::{RegistryError, Result};
use crate::model::{RegistryValue, RootKeyType};
use crate::store::{RegistryKey, RegistryStore};

/// One key in the in-memory tree
#[derive(Debug, Clone, Default)]
struct MemoryNode {
    /// Full path with the case it was first inserted with
    path: String,
    values: Vec<(String, RegistryValue)>,
    /// Child leaf names in insertion order
    subkeys: Vec<String>,
    /// Fails value and subkey enumeration of this key
    enumerate_failure: Option<RegistryError>,
    /// Fails opening this key from its parent
    open_failure: Option<RegistryError>,
    /// Fails reading single values, keyed by lowercase value name
    value_failures: HashMap<String, RegistryError>,
}

#[derive(Debug, Clone, Default)]
struct StoreData {
    /// Lowercase full path to node
    nodes: HashMap<String, MemoryNode>,
}

/// In-memory registry store
///
/// Keys and values keep insertion order; names are matched
/// case-insensitively. Single-threaded (`Rc`), like the engine that walks
/// it. Handles opened from the store see the data as it was when they were
/// opened.
///
/// Failures can be injected per key or per value so that both the
/// recoverable and the fatal traversal paths can be exercised.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Rc<StoreData>,
    open_handles: Rc<Cell<usize>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding the six empty roots
    pub fn new() -> Self {
        let mut data = StoreData::default();
        for root in RootKeyType::ALL {
            let path = root.canonical_name().to_string();
            data.nodes.insert(
                path.to_lowercase(),
                MemoryNode {
                    path,
                    ..MemoryNode::default()
                },
            );
        }
        Self {
            data: Rc::new(data),
            open_handles: Rc::new(Cell::new(0)),
        }
    }

    /// Number of key handles currently open
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }

    /// Number of keys, roots included
    pub fn key_count(&self) -> usize {
        self.data.nodes.len()
    }

    /// Create a key and any missing ancestors
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if `full_path` is not under a canonical root.
    pub fn insert_key(&mut self, full_path: &str) -> Result<()> {
        self.ensure_key(full_path).map(|_| ())
    }

    /// Set a value, creating the key if needed. An existing value with the
    /// same name is replaced in place.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if `full_path` is not under a canonical root.
    pub fn set_value(&mut self, full_path: &str, name: &str, value: RegistryValue) -> Result<()> {
        let node = self.node_mut(full_path)?;
        match node
            .values
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => node.values.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// Make value and subkey enumeration of a key fail with `err`
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if `full_path` is not under a canonical root.
    pub fn fail_key(&mut self, full_path: &str, err: RegistryError) -> Result<()> {
        self.node_mut(full_path)?.enumerate_failure = Some(err);
        Ok(())
    }

    /// Make enumeration of a key fail with `AccessDenied`
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if `full_path` is not under a canonical root.
    pub fn deny_key(&mut self, full_path: &str) -> Result<()> {
        let err = RegistryError::AccessDenied {
            key_path: full_path.to_string(),
            message: "Requested registry access is not allowed.".to_string(),
        };
        self.fail_key(full_path, err)
    }

    /// Make opening a key (from its parent or by path) fail with `err`
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if `full_path` is not under a canonical root.
    pub fn fail_open(&mut self, full_path: &str, err: RegistryError) -> Result<()> {
        self.node_mut(full_path)?.open_failure = Some(err);
        Ok(())
    }

    /// Make reading one value fail with `err`
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if `full_path` is not under a canonical root.
    pub fn fail_value(&mut self, full_path: &str, name: &str, err: RegistryError) -> Result<()> {
        self.node_mut(full_path)?
            .value_failures
            .insert(name.to_lowercase(), err);
        Ok(())
    }

    /// Create the key if missing and return its lookup key
    fn ensure_key(&mut self, full_path: &str) -> Result<String> {
        let root = RootKeyType::classify(full_path)?;
        let data = Rc::make_mut(&mut self.data);

        let mut current = root.canonical_name().to_string();
        let rest = &full_path[current.len()..];
        for segment in rest.split('\\').filter(|s| !s.is_empty()) {
            let child = format!("{}\\{}", current, segment);
            let child_key = child.to_lowercase();
            if !data.nodes.contains_key(&child_key) {
                if let Some(parent) = data.nodes.get_mut(&current.to_lowercase()) {
                    parent.subkeys.push(segment.to_string());
                }
                data.nodes.insert(
                    child_key.clone(),
                    MemoryNode {
                        path: child,
                        ..MemoryNode::default()
                    },
                );
            }
            // Continue from the stored spelling so paths stay consistent
            current = data.nodes[&child_key].path.clone();
        }
        Ok(current.to_lowercase())
    }

    fn node_mut(&mut self, full_path: &str) -> Result<&mut MemoryNode> {
        let lookup = self.ensure_key(full_path)?;
        Rc::make_mut(&mut self.data)
            .nodes
            .get_mut(&lookup)
            .ok_or_else(|| RegistryError::Internal {
                message: format!("key vanished after insert: {}", full_path),
            })
    }

    fn open_path(&self, full_path: &str) -> Result<Option<MemoryKey>> {
        match self.data.nodes.get(&full_path.to_lowercase()) {
            None => Ok(None),
            Some(node) => {
                if let Some(err) = &node.open_failure {
                    return Err(err.clone());
                }
                Ok(Some(MemoryKey::new(
                    &self.data,
                    &self.open_handles,
                    node.path.clone(),
                )))
            }
        }
    }
}

impl RegistryStore for MemoryStore {
    type Key = MemoryKey;

    fn open_root(&self, root: RootKeyType) -> Result<MemoryKey> {
        self.open_path(root.canonical_name())?
            .ok_or_else(|| RegistryError::Internal {
                message: format!("root missing from store: {}", root),
            })
    }
}

/// Handle to a key of a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryKey {
    data: Rc<StoreData>,
    open_handles: Rc<Cell<usize>>,
    path: String,
}

impl MemoryKey {
    fn new(data: &Rc<StoreData>, open_handles: &Rc<Cell<usize>>, path: String) -> Self {
        open_handles.set(open_handles.get() + 1);
        Self {
            data: data.clone(),
            open_handles: open_handles.clone(),
            path,
        }
    }

    fn node(&self) -> Result<&MemoryNode> {
        self.data
            .nodes
            .get(&self.path.to_lowercase())
            .ok_or_else(|| RegistryError::HandleReleased {
                key_path: self.path.clone(),
            })
    }

    fn enumerable_node(&self) -> Result<&MemoryNode> {
        let node = self.node()?;
        match &node.enumerate_failure {
            Some(err) => Err(err.clone()),
            None => Ok(node),
        }
    }
}

impl Drop for MemoryKey {
    fn drop(&mut self) {
        self.open_handles
            .set(self.open_handles.get().saturating_sub(1));
    }
}

impl RegistryKey for MemoryKey {
    fn name(&self) -> &str {
        &self.path
    }

    fn open_subkey(&self, path: &str) -> Result<Option<MemoryKey>> {
        let path = path.trim_matches('\\');
        if path.is_empty() {
            return Ok(None);
        }

        let target = format!("{}\\{}", self.path, path).to_lowercase();
        match self.data.nodes.get(&target) {
            None => Ok(None),
            Some(node) => {
                if let Some(err) = &node.open_failure {
                    return Err(err.clone());
                }
                Ok(Some(MemoryKey::new(
                    &self.data,
                    &self.open_handles,
                    node.path.clone(),
                )))
            }
        }
    }

    fn value_names(&self) -> Result<Vec<String>> {
        Ok(self
            .enumerable_node()?
            .values
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn subkey_names(&self) -> Result<Vec<String>> {
        Ok(self.enumerable_node()?.subkeys.clone())
    }

    fn get_value(&self, name: &str) -> Result<Option<RegistryValue>> {
        let node = self.node()?;
        if let Some(err) = node.value_failures.get(&name.to_lowercase()) {
            return Err(err.clone());
        }
        Ok(node
            .values
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone()))
    }
}
