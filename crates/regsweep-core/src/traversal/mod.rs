//! Recursive registry walk

pub mod engine;

pub use engine::{QueryEngine, OP_QUERY, OP_SUBKEYS, OP_VALUES};
