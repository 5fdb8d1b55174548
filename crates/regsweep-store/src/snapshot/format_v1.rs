//! Snapshot Format v1 schema
//!
//! Defines the YAML structure of an offline registry snapshot

use serde::{Deserialize, Serialize};

use regsweep_core::model::value::{
    REG_BINARY, REG_DWORD, REG_EXPAND_SZ, REG_MULTI_SZ, REG_NONE, REG_QWORD, REG_SZ,
};
use regsweep_core::RegistryValue;

/// Top-level snapshot file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotV1 {
    /// Schema version (must be 1 for this format)
    pub schema_version: u32,

    /// Keys in walk order; parents may be omitted
    #[serde(default)]
    pub keys: Vec<SnapshotKey>,
}

/// One key of the snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotKey {
    /// Full path, starting with a root name or alias
    pub path: String,

    /// Values in enumeration order
    #[serde(default)]
    pub values: Vec<SnapshotValue>,

    /// Enumeration of this key was refused when the snapshot was taken
    #[serde(default)]
    pub inaccessible: bool,
}

/// One typed value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotValue {
    /// Value name; empty for the default value
    #[serde(default)]
    pub name: String,

    pub kind: SnapshotKind,

    /// Numeric type code, required for `raw`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<u32>,

    /// Shape depends on `kind`: text, hex string, number or list of text
    #[serde(default)]
    pub data: serde_yaml::Value,
}

/// Value kinds a snapshot can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    None,
    String,
    ExpandString,
    Binary,
    Dword,
    MultiString,
    Qword,
    /// Any type code, stored as raw bytes
    Raw,
}

impl SnapshotValue {
    /// Decode `data` according to `kind`
    ///
    /// Returns a human-readable reason when the data does not fit the kind.
    pub fn to_registry_value(&self) -> Result<RegistryValue, String> {
        match self.kind {
            SnapshotKind::None => Ok(RegistryValue::None(self.hex_data()?)),
            SnapshotKind::String => Ok(RegistryValue::String(self.text_data()?)),
            SnapshotKind::ExpandString => Ok(RegistryValue::ExpandString(self.text_data()?)),
            SnapshotKind::Binary => Ok(RegistryValue::Binary(self.hex_data()?)),
            SnapshotKind::Dword => {
                let n = self.number_data()?;
                u32::try_from(n)
                    .map(RegistryValue::DWord)
                    .map_err(|_| format!("dword value {} does not fit in 32 bits", n))
            }
            SnapshotKind::MultiString => Ok(RegistryValue::MultiString(self.list_data()?)),
            SnapshotKind::Qword => Ok(RegistryValue::QWord(self.number_data()?)),
            SnapshotKind::Raw => {
                let type_code = self
                    .type_code
                    .ok_or_else(|| "raw value requires type_code".to_string())?;
                if matches!(
                    type_code,
                    REG_NONE | REG_SZ | REG_EXPAND_SZ | REG_BINARY | REG_DWORD | REG_MULTI_SZ | REG_QWORD
                ) {
                    return Err(format!(
                        "type_code {} has a named kind; use it instead of raw",
                        type_code
                    ));
                }
                Ok(RegistryValue::Other {
                    type_code,
                    data: self.hex_data()?,
                })
            }
        }
    }

    fn text_data(&self) -> Result<String, String> {
        match &self.data {
            serde_yaml::Value::Null => Ok(String::new()),
            serde_yaml::Value::String(s) => Ok(s.clone()),
            other => Err(format!("expected text data, found {}", describe(other))),
        }
    }

    /// Hex digits; commas and whitespace between bytes are ignored
    fn hex_data(&self) -> Result<Vec<u8>, String> {
        let text = match &self.data {
            serde_yaml::Value::Null => return Ok(Vec::new()),
            serde_yaml::Value::String(s) => s,
            other => return Err(format!("expected hex string, found {}", describe(other))),
        };
        let digits: String = text
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        hex::decode(&digits).map_err(|e| format!("invalid hex data: {}", e))
    }

    fn number_data(&self) -> Result<u64, String> {
        match &self.data {
            serde_yaml::Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| format!("expected unsigned integer, found {}", n)),
            other => Err(format!("expected number, found {}", describe(other))),
        }
    }

    fn list_data(&self) -> Result<Vec<String>, String> {
        match &self.data {
            serde_yaml::Value::Null => Ok(Vec::new()),
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    serde_yaml::Value::String(s) => Ok(s.clone()),
                    other => Err(format!("expected text list item, found {}", describe(other))),
                })
                .collect(),
            other => Err(format!("expected list of text, found {}", describe(other))),
        }
    }
}

fn describe(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "list",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}
