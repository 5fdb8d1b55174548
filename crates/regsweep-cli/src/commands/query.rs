//! Query command
//!
//! Usage: regsweep query --snapshot <FILE> [--plan <FILE>] [--target ROOT\path]...
//!        [--exclude ROOT\path]... [--filter NAME[=DATA]]... [--filter-policy P]
//!        [--add-value NAME]... [--output <FILE>] [--errors <FILE>] [--log-format F]

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;

use regsweep_core::logging_facility::{self, Profile};
use regsweep_core::{ErrorItem, FilterItem, FilterPolicy, QueryEngine, QueryItem};
use regsweep_store::{load_snapshot_file, parse_plan_file, QueryPlan};

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Snapshot file to query
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Query plan file; command-line rules are added to it
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Key to walk, e.g. HKLM\SOFTWARE\Vendor (repeatable)
    #[arg(long = "target")]
    pub targets: Vec<String>,

    /// Key path substring to skip, e.g. HKLM\Cache (repeatable)
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,

    /// Value filter rule NAME or NAME=DATA (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// How a filter rule's data is matched (overrides the plan)
    #[arg(long, value_enum)]
    pub filter_policy: Option<PolicyArg>,

    /// Extra value to probe for on every key in the results (repeatable)
    #[arg(long = "add-value")]
    pub add_values: Vec<String>,

    /// Output .reg file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the error collection as a JSON report
    #[arg(long)]
    pub errors: Option<PathBuf>,

    /// Log output format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    EmptyPattern,
    ExactData,
    NameOnly,
}

impl From<PolicyArg> for FilterPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::EmptyPattern => FilterPolicy::EmptyPattern,
            PolicyArg::ExactData => FilterPolicy::ExactData,
            PolicyArg::NameOnly => FilterPolicy::NameOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// JSON error report written by `--errors`
#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    session_id: &'a str,
    generated_at: String,
    snapshot_digest: &'a str,
    result_count: usize,
    error_count: usize,
    errors: &'a [ErrorItem],
}

/// Execute query command
pub fn execute(args: QueryArgs) -> Result<(), Box<dyn std::error::Error>> {
    logging_facility::init(match args.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let loaded = load_snapshot_file(&args.snapshot)?;
    let plan = build_plan(&args)?;
    if plan.targets.is_empty() {
        return Err("no query targets: pass --target or a plan with targets".into());
    }

    let mut engine = QueryEngine::new(&loaded.store).with_filter_policy(plan.filter_policy);
    engine.query(&plan.targets, plan.excludes.clone(), plan.filters.clone())?;
    for name in &plan.add_value_names {
        engine.add_value_name(name)?;
    }

    let text = engine.export_text();
    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &text)?;
        println!(
            "✓ Exported {} values to {}",
            engine.results().len(),
            output_path.display()
        );
    } else {
        print!("{}", text);
    }

    if let Some(errors_path) = &args.errors {
        let report = ErrorReport {
            session_id: engine.session_id().as_str(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            snapshot_digest: &loaded.digest,
            result_count: engine.results().len(),
            error_count: engine.errors().len(),
            errors: engine.errors(),
        };
        std::fs::write(errors_path, serde_json::to_string_pretty(&report)?)?;
    } else if !engine.errors().is_empty() {
        eprintln!("{} errors recorded", engine.errors().len());
    }

    Ok(())
}

/// The plan file (if any) with the command-line rules appended
fn build_plan(args: &QueryArgs) -> Result<QueryPlan, Box<dyn std::error::Error>> {
    let mut plan = match &args.plan {
        Some(path) => parse_plan_file(path)?,
        None => QueryPlan::default(),
    };

    for target in &args.targets {
        plan.targets.push(target.parse::<QueryItem>()?);
    }
    for exclude in &args.excludes {
        plan.excludes.push(exclude.parse::<QueryItem>()?);
    }
    for filter in &args.filters {
        plan.filters.push(parse_filter(filter));
    }
    if let Some(policy) = args.filter_policy {
        plan.filter_policy = policy.into();
    }
    plan.add_value_names.extend(args.add_values.iter().cloned());

    plan.validate()?;
    Ok(plan)
}

/// `NAME` or `NAME=DATA`; only the first `=` separates
fn parse_filter(raw: &str) -> FilterItem {
    match raw.split_once('=') {
        Some((name, data)) => FilterItem::new(name, data),
        None => FilterItem::new(raw, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_forms() {
        assert_eq!(parse_filter("Version"), FilterItem::new("Version", ""));
        assert_eq!(
            parse_filter("Path=\"a=b\""),
            FilterItem::new("Path", "\"a=b\"")
        );
    }
}
