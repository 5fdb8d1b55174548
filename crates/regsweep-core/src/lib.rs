//! RegSweep Core - registry inventory kernel
//!
//! This crate walks a hierarchical registry store and turns what it finds
//! into `.reg` interchange text, including:
//! - Root key table and resolver (canonical names and aliases)
//! - Store-access traits and an in-memory store with fault injection
//! - Depth-first traversal with exclusion rules and a value filter engine
//! - Per-kind value formatting (hex lists, UTF-16LE strings, escapes)
//! - Export of accumulated results and enrichment with extra value names
//!
//! Failures met while walking are split in two: recoverable ones (access
//! denied, I/O, released handles) are accumulated as `ErrorItem`s, all
//! others abort the query.

pub mod enrich;
pub mod errors;
pub mod filter;
pub mod format;
pub mod logging_facility;
pub mod model;
pub mod render;
pub mod resolver;
pub mod store;
pub mod traversal;

#[doc(hidden)]
pub use regsweep_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, RegistryError, Result};
pub use filter::{FilterPolicy, FilterSet};
pub use format::format_value;
pub use model::{ErrorItem, FilterItem, QueryItem, RegistryValue, ResultItem, RootKeyType};
pub use store::{MemoryStore, RegistryKey, RegistryStore};
pub use traversal::QueryEngine;
