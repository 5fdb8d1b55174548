//! Registry store access
//!
//! The traversal engine consumes the store only through these two traits.
//! A handle (`RegistryKey`) is released when it is dropped, so every exit
//! path out of a traversal frame, including `?` propagation, closes it.

pub mod memory;

pub use memory::{MemoryKey, MemoryStore};

use crate::errors::Result;
use crate::model::{RegistryValue, RootKeyType};

/// Entry point into a registry store
pub trait RegistryStore {
    type Key: RegistryKey;

    /// Open the handle of one of the six roots
    ///
    /// # Errors
    ///
    /// Store-specific; access failures use the recoverable variants.
    fn open_root(&self, root: RootKeyType) -> Result<Self::Key>;
}

/// An opened key
pub trait RegistryKey: Sized {
    /// Full path, starting with the canonical root name
    fn name(&self) -> &str;

    /// Open a descendant by relative path (`\`-separated segments allowed).
    /// `Ok(None)` means it does not exist.
    ///
    /// # Errors
    ///
    /// Store-specific; access failures use the recoverable variants.
    fn open_subkey(&self, path: &str) -> Result<Option<Self>>;

    /// Value names in store order; `""` is the default value
    ///
    /// # Errors
    ///
    /// Store-specific; access failures use the recoverable variants.
    fn value_names(&self) -> Result<Vec<String>>;

    /// Direct child key names in store order
    ///
    /// # Errors
    ///
    /// Store-specific; access failures use the recoverable variants.
    fn subkey_names(&self) -> Result<Vec<String>>;

    /// Read a value. `Ok(None)` means the key has no value by that name.
    ///
    /// # Errors
    ///
    /// Store-specific; access failures use the recoverable variants.
    fn get_value(&self, name: &str) -> Result<Option<RegistryValue>>;
}
