//! Query Plan Format v1 schema
//!
//! Defines the YAML structure of a query plan

use serde::{Deserialize, Serialize};

use regsweep_core::FilterPolicy;

/// Top-level plan file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanV1 {
    /// Schema version (must be 1 for this format)
    pub schema_version: u32,

    /// Keys to walk, in order
    #[serde(default)]
    pub targets: Vec<PlanKey>,

    /// Exclusion rules
    #[serde(default)]
    pub exclude: Vec<PlanKey>,

    /// Value filter rules
    #[serde(default)]
    pub filters: Vec<PlanFilter>,

    #[serde(default)]
    pub filter_policy: FilterPolicy,

    /// Values probed for after the walk
    #[serde(default)]
    pub add_value_names: Vec<String>,
}

/// A root plus key path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanKey {
    /// Canonical root name or alias
    pub root: String,

    #[serde(default)]
    pub path: String,
}

/// A filter rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFilter {
    pub name: String,

    #[serde(default)]
    pub data: String,
}
