use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::errors::{RegistryError, Result};

/// The six top-level partitions (hives) of the registry
///
/// Serialized by short alias (`HKLM`, ...); deserialization accepts either
/// the alias or the canonical `HKEY_*` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RootKeyType {
    /// HKEY_LOCAL_MACHINE
    Hklm,
    /// HKEY_CURRENT_CONFIG
    Hkcc,
    /// HKEY_CLASSES_ROOT
    Hkcr,
    /// HKEY_USERS
    Hku,
    /// HKEY_CURRENT_USER
    Hkcu,
    /// HKEY_PERFORMANCE_DATA
    Hkpd,
}

impl RootKeyType {
    /// Every root, in the fixed order classification tries them
    pub const ALL: [RootKeyType; 6] = [
        RootKeyType::Hklm,
        RootKeyType::Hkcc,
        RootKeyType::Hkcr,
        RootKeyType::Hku,
        RootKeyType::Hkcu,
        RootKeyType::Hkpd,
    ];

    /// Canonical long name, the prefix of every full key path under this root
    pub fn canonical_name(&self) -> &'static str {
        match self {
            RootKeyType::Hklm => "HKEY_LOCAL_MACHINE",
            RootKeyType::Hkcc => "HKEY_CURRENT_CONFIG",
            RootKeyType::Hkcr => "HKEY_CLASSES_ROOT",
            RootKeyType::Hku => "HKEY_USERS",
            RootKeyType::Hkcu => "HKEY_CURRENT_USER",
            RootKeyType::Hkpd => "HKEY_PERFORMANCE_DATA",
        }
    }

    /// Short alias
    pub fn alias(&self) -> &'static str {
        match self {
            RootKeyType::Hklm => "HKLM",
            RootKeyType::Hkcc => "HKCC",
            RootKeyType::Hkcr => "HKCR",
            RootKeyType::Hku => "HKU",
            RootKeyType::Hkcu => "HKCU",
            RootKeyType::Hkpd => "HKPD",
        }
    }

    /// Resolve a canonical name or alias (case-sensitive)
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if `name` is not in the lookup table.
    pub fn from_name(name: &str) -> Result<Self> {
        root_keys()
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownRoot {
                name: name.to_string(),
            })
    }

    /// Determine which root a full key path descends from
    ///
    /// The path must equal a canonical root name or continue with `\` right
    /// after it.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if the path is not under any of the six roots.
    pub fn classify(full_path: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|root| {
                full_path
                    .strip_prefix(root.canonical_name())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('\\'))
            })
            .ok_or_else(|| RegistryError::UnknownRoot {
                name: full_path.to_string(),
            })
    }
}

/// Process-wide read-only name table: canonical names plus aliases
pub fn root_keys() -> &'static HashMap<&'static str, RootKeyType> {
    static TABLE: OnceLock<HashMap<&'static str, RootKeyType>> = OnceLock::new();
    TABLE.get_or_init(|| {
        RootKeyType::ALL
            .iter()
            .flat_map(|root| [(root.canonical_name(), *root), (root.alias(), *root)])
            .collect()
    })
}

impl fmt::Display for RootKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for RootKeyType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl TryFrom<String> for RootKeyType {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_name(&value)
    }
}

impl From<RootKeyType> for String {
    fn from(root: RootKeyType) -> Self {
        root.alias().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_twelve_names() {
        assert_eq!(root_keys().len(), 12);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(RootKeyType::from_name("HKCU").unwrap(), RootKeyType::Hkcu);
        assert!(matches!(
            RootKeyType::from_name("hkcu"),
            Err(RegistryError::UnknownRoot { .. })
        ));
    }

    #[test]
    fn test_classify_requires_separator_boundary() {
        assert_eq!(
            RootKeyType::classify("HKEY_USERS\\S-1-5-18").unwrap(),
            RootKeyType::Hku
        );
        assert_eq!(RootKeyType::classify("HKEY_USERS").unwrap(), RootKeyType::Hku);
        assert!(RootKeyType::classify("HKEY_USERSX\\a").is_err());
    }
}
