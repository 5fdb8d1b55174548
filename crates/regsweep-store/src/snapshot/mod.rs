//! Offline registry snapshots
//!
//! A snapshot is a YAML description of keys and typed values that is
//! loaded into a [`regsweep_core::MemoryStore`] and queried like a live
//! store.

pub mod digest;
pub mod format_v1;
pub mod loader;
pub mod parser;

pub use digest::compute_snapshot_digest;
pub use format_v1::{SnapshotKey, SnapshotKind, SnapshotV1, SnapshotValue};
pub use loader::{load_snapshot, load_snapshot_file, LoadedSnapshot};
pub use parser::{normalise_key_path, parse_snapshot_file, parse_snapshot_str};
