//! Validate command
//!
//! Usage: regsweep validate [--snapshot <FILE>] [--plan <FILE>]

use clap::Args;
use std::path::PathBuf;

use regsweep_store::parse_plan_file;
use regsweep_store::snapshot::{compute_snapshot_digest, parse_snapshot_file};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Snapshot file to validate
    #[arg(long, required_unless_present = "plan")]
    pub snapshot: Option<PathBuf>,

    /// Query plan file to validate
    #[arg(long)]
    pub plan: Option<PathBuf>,
}

/// Execute validate command
pub fn execute(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &args.snapshot {
        let snapshot = parse_snapshot_file(path)?;
        let digest = compute_snapshot_digest(&snapshot)?;
        let values: usize = snapshot.keys.iter().map(|k| k.values.len()).sum();
        println!(
            "✓ Snapshot {} is valid: {} keys, {} values",
            path.display(),
            snapshot.keys.len(),
            values
        );
        println!("  digest: {}", digest);
    }

    if let Some(path) = &args.plan {
        let plan = parse_plan_file(path)?;
        println!(
            "✓ Plan {} is valid: {} targets, {} exclusions, {} filters ({})",
            path.display(),
            plan.targets.len(),
            plan.excludes.len(),
            plan.filters.len(),
            plan.filter_policy
        );
    }

    Ok(())
}
