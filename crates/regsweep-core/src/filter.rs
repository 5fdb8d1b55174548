//! Value filter engine
//!
//! An empty filter set accepts every value. A non-empty set is an allow-list
//! by value name: a value with no rule of the same name is never recorded.
//! When a rule matches, [`FilterPolicy`] decides how its data pattern is
//! compared with the formatted value.

use serde::{Deserialize, Serialize};

use crate::model::FilterItem;

/// How a matching rule's data pattern is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Accept only when the rule's pattern is empty
    #[default]
    EmptyPattern,
    /// Accept when the pattern is empty or equals the formatted data
    ExactData,
    /// Accept whenever a rule with the value's name exists
    NameOnly,
}

impl FilterPolicy {
    pub fn accepts(&self, pattern: &str, formatted: &str) -> bool {
        match self {
            FilterPolicy::EmptyPattern => pattern.is_empty(),
            FilterPolicy::ExactData => pattern.is_empty() || pattern == formatted,
            FilterPolicy::NameOnly => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPolicy::EmptyPattern => "empty_pattern",
            FilterPolicy::ExactData => "exact_data",
            FilterPolicy::NameOnly => "name_only",
        }
    }
}

impl std::fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterPolicy {
    type Err = crate::errors::RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty_pattern" => Ok(FilterPolicy::EmptyPattern),
            "exact_data" => Ok(FilterPolicy::ExactData),
            "name_only" => Ok(FilterPolicy::NameOnly),
            other => Err(crate::errors::RegistryError::InvalidInput {
                reason: format!("unknown filter policy '{}'", other),
            }),
        }
    }
}

/// What the engine should do with one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision<'a> {
    /// No rules: format and record
    AcceptAll,
    /// Not on the allow-list: skip without reading the value
    Reject,
    /// Format, then ask the rule
    Check(&'a FilterItem),
}

/// The active filter rules plus the policy they are applied with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    rules: Vec<FilterItem>,
    policy: FilterPolicy,
}

impl FilterSet {
    pub fn new(rules: Vec<FilterItem>, policy: FilterPolicy) -> Self {
        Self { rules, policy }
    }

    pub fn rules(&self) -> &[FilterItem] {
        &self.rules
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replace the rules, keeping the policy
    pub fn replace_rules(&mut self, rules: Vec<FilterItem>) {
        self.rules = rules;
    }

    pub fn set_policy(&mut self, policy: FilterPolicy) {
        self.policy = policy;
    }

    /// First rule whose name equals `value_name` exactly
    pub fn rule_for(&self, value_name: &str) -> Option<&FilterItem> {
        self.rules
            .iter()
            .find(|rule| rule.value_name() == value_name)
    }

    /// Decide before the value is read
    pub fn decide(&self, value_name: &str) -> FilterDecision<'_> {
        if self.rules.is_empty() {
            return FilterDecision::AcceptAll;
        }
        match self.rule_for(value_name) {
            Some(rule) => FilterDecision::Check(rule),
            None => FilterDecision::Reject,
        }
    }

    /// Full decision for a value whose formatted data is known
    pub fn accepts(&self, value_name: &str, formatted: &str) -> bool {
        match self.decide(value_name) {
            FilterDecision::AcceptAll => true,
            FilterDecision::Reject => false,
            FilterDecision::Check(rule) => self.policy.accepts(rule.value_data(), formatted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<FilterItem> {
        vec![
            FilterItem::new("Version", ""),
            FilterItem::new("Path", "\"C:\\\\Tools\""),
        ]
    }

    #[test]
    fn test_empty_set_accepts_everything() {
        let set = FilterSet::default();
        assert!(set.accepts("anything", "dword:00000001"));
        assert_eq!(set.decide("anything"), FilterDecision::AcceptAll);
    }

    #[test]
    fn test_unlisted_name_is_rejected_under_every_policy() {
        for policy in [
            FilterPolicy::EmptyPattern,
            FilterPolicy::ExactData,
            FilterPolicy::NameOnly,
        ] {
            let set = FilterSet::new(rules(), policy);
            assert!(!set.accepts("X", ""), "policy {}", policy);
        }
    }

    #[test]
    fn test_name_match_is_case_sensitive() {
        let set = FilterSet::new(rules(), FilterPolicy::NameOnly);
        assert!(!set.accepts("version", "\"1\""));
    }

    #[test]
    fn test_empty_pattern_policy() {
        let set = FilterSet::new(rules(), FilterPolicy::EmptyPattern);
        assert!(set.accepts("Version", "\"1.0\""));
        assert!(!set.accepts("Path", "\"C:\\\\Tools\""));
    }

    #[test]
    fn test_exact_data_policy() {
        let set = FilterSet::new(rules(), FilterPolicy::ExactData);
        assert!(set.accepts("Version", "\"1.0\""));
        assert!(set.accepts("Path", "\"C:\\\\Tools\""));
        assert!(!set.accepts("Path", "\"D:\\\\Other\""));
    }

    #[test]
    fn test_name_only_policy() {
        let set = FilterSet::new(rules(), FilterPolicy::NameOnly);
        assert!(set.accepts("Path", "\"D:\\\\Other\""));
    }

    #[test]
    fn test_first_rule_wins() {
        let set = FilterSet::new(
            vec![FilterItem::new("A", "x"), FilterItem::new("A", "")],
            FilterPolicy::EmptyPattern,
        );
        assert!(!set.accepts("A", "y"));
    }

    #[test]
    fn test_policy_parse_and_serde_names() {
        assert_eq!(
            "exact_data".parse::<FilterPolicy>().unwrap(),
            FilterPolicy::ExactData
        );
        assert!("fuzzy".parse::<FilterPolicy>().is_err());
        assert_eq!(
            serde_json::to_string(&FilterPolicy::NameOnly).unwrap(),
            "\"name_only\""
        );
    }
}
