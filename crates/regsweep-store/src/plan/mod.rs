//! Query plans
//!
//! A plan is the configuration of one query session: what to walk, what to
//! skip, which values to keep and which extra values to probe for.

pub mod format_v1;
pub mod parser;

pub use format_v1::{PlanFilter, PlanKey, PlanV1};
pub use parser::{parse_plan_file, parse_plan_str, QueryPlan};
