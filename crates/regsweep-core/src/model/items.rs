use std::str::FromStr;

use serde::Serialize;

use crate::errors::{RegistryError, Result};
use crate::model::RootKeyType;

/// A traversal target or, identically shaped, an exclusion pattern
///
/// As a target, `key_path` is opened under `root` (empty means the root
/// itself). As an exclusion, `key_path` is a substring searched for in the
/// full path of keys classified under `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryItem {
    root: RootKeyType,
    key_path: String,
}

impl QueryItem {
    pub fn new(root: RootKeyType, key_path: impl Into<String>) -> Self {
        Self {
            root,
            key_path: key_path.into(),
        }
    }

    pub fn root(&self) -> RootKeyType {
        self.root
    }

    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    /// Full display path, `<canonical root>\<key path>`
    pub fn full_path(&self) -> String {
        if self.key_path.is_empty() {
            self.root.canonical_name().to_string()
        } else {
            format!("{}\\{}", self.root.canonical_name(), self.key_path)
        }
    }
}

/// Parses `ROOT` or `ROOT\key\path`, where ROOT is a canonical name or alias
impl FromStr for QueryItem {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let (root, key_path) = s.split_once('\\').unwrap_or((s, ""));
        Ok(Self::new(RootKeyType::from_name(root)?, key_path))
    }
}

/// A value filter rule, keyed by value name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterItem {
    value_name: String,
    value_data: String,
}

impl FilterItem {
    pub fn new(value_name: impl Into<String>, value_data: impl Into<String>) -> Self {
        Self {
            value_name: value_name.into(),
            value_data: value_data.into(),
        }
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Match pattern; empty acts as a wildcard under every filter policy
    pub fn value_data(&self) -> &str {
        &self.value_data
    }
}

/// One captured value: key, value name and pre-formatted interchange data
///
/// An empty `value_name` is the key's default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    key_path: String,
    value_name: String,
    value_data: String,
}

impl ResultItem {
    /// # Errors
    ///
    /// Returns `InvalidInput` if `key_path` is blank.
    pub fn new(
        key_path: impl Into<String>,
        value_name: impl Into<String>,
        value_data: impl Into<String>,
    ) -> Result<Self> {
        let key_path = key_path.into();
        require_not_blank(&key_path, "ResultItem key_path")?;
        Ok(Self {
            key_path,
            value_name: value_name.into(),
            value_data: value_data.into(),
        })
    }

    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    pub fn value_data(&self) -> &str {
        &self.value_data
    }
}

/// One captured non-fatal failure
///
/// `name` is the value name, subkey name or operation label the failure
/// happened at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorItem {
    key_path: String,
    name: String,
    error: String,
}

impl ErrorItem {
    /// # Errors
    ///
    /// Returns `InvalidInput` if `key_path` or `name` is blank.
    pub fn new(
        key_path: impl Into<String>,
        name: impl Into<String>,
        error: impl Into<String>,
    ) -> Result<Self> {
        let key_path = key_path.into();
        let name = name.into();
        require_not_blank(&key_path, "ErrorItem key_path")?;
        require_not_blank(&name, "ErrorItem name")?;
        Ok(Self {
            key_path,
            name,
            error: error.into(),
        })
    }

    /// Build from a registry error: its message, then its detail text on a
    /// new line if it carries one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `key_path` or `name` is blank.
    pub fn from_error(
        key_path: impl Into<String>,
        name: impl Into<String>,
        err: &RegistryError,
    ) -> Result<Self> {
        let error = match err.inner_message() {
            Some(inner) => format!("{}\n{}", err, inner),
            None => err.to_string(),
        };
        Self::new(key_path, name, error)
    }

    pub fn key_path(&self) -> &str {
        &self.key_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error(&self) -> &str {
        &self.error
    }
}

fn require_not_blank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::InvalidInput {
            reason: format!("{} cannot be empty or contain only white space", field),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_item_parse_alias_and_path() {
        let item: QueryItem = "HKLM\\SOFTWARE\\Vendor".parse().unwrap();
        assert_eq!(item.root(), RootKeyType::Hklm);
        assert_eq!(item.key_path(), "SOFTWARE\\Vendor");
        assert_eq!(item.full_path(), "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor");
    }

    #[test]
    fn test_query_item_parse_bare_root() {
        let item: QueryItem = "HKEY_CURRENT_USER".parse().unwrap();
        assert_eq!(item.root(), RootKeyType::Hkcu);
        assert_eq!(item.key_path(), "");
        assert_eq!(item.full_path(), "HKEY_CURRENT_USER");
    }

    #[test]
    fn test_result_item_rejects_blank_key() {
        assert!(matches!(
            ResultItem::new("  ", "v", "\"x\""),
            Err(RegistryError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_error_item_appends_inner_message() {
        let err = RegistryError::AccessDenied {
            key_path: "HKEY_LOCAL_MACHINE\\SAM".to_string(),
            message: "Requested registry access is not allowed.".to_string(),
        };
        let item = ErrorItem::from_error("HKEY_LOCAL_MACHINE\\SAM", "values", &err).unwrap();
        assert_eq!(
            item.error(),
            "Access denied: HKEY_LOCAL_MACHINE\\SAM\nRequested registry access is not allowed."
        );
    }

    #[test]
    fn test_error_item_requires_name() {
        assert!(ErrorItem::new("HKEY_USERS", "", "boom").is_err());
    }
}
