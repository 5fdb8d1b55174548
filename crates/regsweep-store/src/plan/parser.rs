//! Query plan parser with validation
//!
//! Parses YAML, resolves root names and rejects rules that could never
//! match anything

use std::fs;
use std::path::Path;

use regsweep_core::{FilterItem, FilterPolicy, QueryItem, RootKeyType};

use crate::errors::{plan_validation, Result};
use crate::plan::format_v1::{PlanKey, PlanV1};

/// A validated query plan, ready to drive a `QueryEngine`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    pub targets: Vec<QueryItem>,
    pub excludes: Vec<QueryItem>,
    pub filters: Vec<FilterItem>,
    pub filter_policy: FilterPolicy,
    pub add_value_names: Vec<String>,
}

impl QueryPlan {
    /// Check the invariants a plan built in code must also satisfy
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error for blank exclusion paths, blank
    /// filter names or blank enrichment value names.
    pub fn validate(&self) -> Result<()> {
        if let Some(rule) = self
            .excludes
            .iter()
            .find(|rule| rule.key_path().trim().is_empty())
        {
            return Err(plan_validation(&format!(
                "Exclusion under {} has a blank path",
                rule.root()
            )));
        }

        if self
            .filters
            .iter()
            .any(|rule| rule.value_name().trim().is_empty())
        {
            return Err(plan_validation("Filter rule has a blank value name"));
        }

        if self
            .add_value_names
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(plan_validation("add_value_names contains a blank name"));
        }

        Ok(())
    }
}

/// Parse a plan file from a path
///
/// # Errors
///
/// Returns an `InvalidInput` error if the file cannot be read or is not a
/// valid plan.
pub fn parse_plan_file(path: &Path) -> Result<QueryPlan> {
    let content = fs::read_to_string(path)
        .map_err(|e| plan_validation(&format!("Failed to read plan file: {}", e)))?;

    parse_plan_str(&content)
}

/// Parse a plan from a string
///
/// # Errors
///
/// Returns an `InvalidInput` error describing the first problem found.
pub fn parse_plan_str(content: &str) -> Result<QueryPlan> {
    let plan: PlanV1 = serde_yaml::from_str(content)
        .map_err(|e| plan_validation(&format!("YAML parse error: {}", e)))?;

    if plan.schema_version != 1 {
        return Err(plan_validation(&format!(
            "Unsupported schema_version: {}. Expected 1",
            plan.schema_version
        )));
    }

    let query_plan = QueryPlan {
        targets: resolve_keys(&plan.targets)?,
        excludes: resolve_keys(&plan.exclude)?,
        filters: plan
            .filters
            .iter()
            .map(|f| FilterItem::new(f.name.clone(), f.data.clone()))
            .collect(),
        filter_policy: plan.filter_policy,
        add_value_names: plan.add_value_names,
    };

    query_plan.validate()?;

    Ok(query_plan)
}

fn resolve_keys(keys: &[PlanKey]) -> Result<Vec<QueryItem>> {
    keys.iter()
        .map(|key| {
            let root = RootKeyType::from_name(&key.root)
                .map_err(|e| plan_validation(&e.to_string()))?;
            Ok(QueryItem::new(root, key.path.trim_matches('\\')))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_plan() {
        let plan = parse_plan_str(
            r#"
schema_version: 1
targets:
  - { root: HKLM, path: 'SOFTWARE\Vendor' }
  - { root: HKEY_CURRENT_USER }
exclude:
  - { root: HKLM, path: Cache }
filters:
  - { name: Version }
filter_policy: exact_data
add_value_names: [InstallDate]
"#,
        )
        .unwrap();

        assert_eq!(
            plan.targets,
            vec![
                QueryItem::new(RootKeyType::Hklm, "SOFTWARE\\Vendor"),
                QueryItem::new(RootKeyType::Hkcu, ""),
            ]
        );
        assert_eq!(plan.excludes.len(), 1);
        assert_eq!(plan.filters, vec![FilterItem::new("Version", "")]);
        assert_eq!(plan.filter_policy, FilterPolicy::ExactData);
        assert_eq!(plan.add_value_names, vec!["InstallDate"]);
    }

    #[test]
    fn test_defaults() {
        let plan = parse_plan_str("schema_version: 1\n").unwrap();
        assert_eq!(plan, QueryPlan::default());
        assert_eq!(plan.filter_policy, FilterPolicy::EmptyPattern);
    }

    #[test]
    fn test_blank_exclusion_rejected() {
        let err = parse_plan_str(
            r#"
schema_version: 1
exclude:
  - { root: HKLM, path: '' }
"#,
        )
        .unwrap_err();
        assert!(err.message().contains("blank path"));
    }

    #[test]
    fn test_unknown_root_rejected() {
        let err = parse_plan_str(
            r#"
schema_version: 1
targets:
  - { root: hklm }
"#,
        )
        .unwrap_err();
        assert!(err.message().contains("Unknown root key: hklm"));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(parse_plan_str("schema_version: 1\nfilter_policy: fuzzy\n").is_err());
    }

    #[test]
    fn test_blank_add_value_name_rejected() {
        assert!(parse_plan_str("schema_version: 1\nadd_value_names: ['  ']\n").is_err());
    }
}
