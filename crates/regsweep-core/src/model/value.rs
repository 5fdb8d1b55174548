use serde::{Deserialize, Serialize};

/// Numeric registry value type codes (`REG_*` in `winnt.h`)
pub const REG_NONE: u32 = 0;
pub const REG_SZ: u32 = 1;
pub const REG_EXPAND_SZ: u32 = 2;
pub const REG_BINARY: u32 = 3;
pub const REG_DWORD: u32 = 4;
pub const REG_DWORD_BIG_ENDIAN: u32 = 5;
pub const REG_LINK: u32 = 6;
pub const REG_MULTI_SZ: u32 = 7;
pub const REG_QWORD: u32 = 11;

/// Kind of a registry value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    None,
    String,
    ExpandString,
    Binary,
    DWord,
    MultiString,
    QWord,
    /// Any type code outside the seven kinds above
    Other(u32),
}

impl ValueKind {
    /// Numeric `REG_*` type code
    pub fn type_code(&self) -> u32 {
        match self {
            ValueKind::None => REG_NONE,
            ValueKind::String => REG_SZ,
            ValueKind::ExpandString => REG_EXPAND_SZ,
            ValueKind::Binary => REG_BINARY,
            ValueKind::DWord => REG_DWORD,
            ValueKind::MultiString => REG_MULTI_SZ,
            ValueKind::QWord => REG_QWORD,
            ValueKind::Other(code) => *code,
        }
    }
}

/// A typed value as read from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryValue {
    None(Vec<u8>),
    String(String),
    ExpandString(String),
    Binary(Vec<u8>),
    DWord(u32),
    MultiString(Vec<String>),
    QWord(u64),
    /// Raw bytes of a kind the interchange format has no encoding for
    Other { type_code: u32, data: Vec<u8> },
}

impl RegistryValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            RegistryValue::None(_) => ValueKind::None,
            RegistryValue::String(_) => ValueKind::String,
            RegistryValue::ExpandString(_) => ValueKind::ExpandString,
            RegistryValue::Binary(_) => ValueKind::Binary,
            RegistryValue::DWord(_) => ValueKind::DWord,
            RegistryValue::MultiString(_) => ValueKind::MultiString,
            RegistryValue::QWord(_) => ValueKind::QWord,
            RegistryValue::Other { type_code, .. } => ValueKind::Other(*type_code),
        }
    }
}
