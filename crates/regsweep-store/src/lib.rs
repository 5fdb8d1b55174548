//! RegSweep Store - offline inputs for registry queries
//!
//! Provides:
//! - Snapshot Format v1 parser, digest and loader into a `MemoryStore`
//! - Query Plan Format v1 parser (targets, exclusions, filters, enrichment)

pub mod errors;
pub mod plan;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use plan::{parse_plan_file, parse_plan_str, QueryPlan};
pub use snapshot::{load_snapshot, load_snapshot_file, LoadedSnapshot};
