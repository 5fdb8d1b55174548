//! Value formatting for the `.reg` interchange format
//!
//! | kind         | rendering                                         |
//! |--------------|---------------------------------------------------|
//! | None         | `hex(0):` + raw bytes                             |
//! | String       | `"..."` with `\` and `"` escaped                  |
//! | ExpandString | `hex(2):` + UTF-16LE bytes + `00,00`              |
//! | Binary       | `hex:` + raw bytes                                |
//! | DWord        | `dword:` + 8 lowercase hex digits                 |
//! | MultiString  | `hex(7):` + each string as ExpandString + `00,00` |
//! | QWord        | `hex(b):` + little-endian bytes                   |
//!
//! Byte lists are two uppercase hex digits per byte, comma separated. Long
//! lists are never wrapped.

use crate::errors::{RegistryError, Result};
use crate::model::RegistryValue;

/// Format a value as interchange text
///
/// `key_path` and `value_name` only feed the error context.
///
/// # Errors
///
/// Returns `UnsupportedValueKind` for any kind outside the table above.
pub fn format_value(key_path: &str, value_name: &str, value: &RegistryValue) -> Result<String> {
    let text = match value {
        RegistryValue::None(bytes) => format!("hex(0):{}", bytes_to_hex_list(bytes)),
        RegistryValue::String(s) => format!("\"{}\"", escape_string(s)),
        RegistryValue::ExpandString(s) => format!("hex(2):{}", string_to_hex_list(s)),
        RegistryValue::Binary(bytes) => format!("hex:{}", bytes_to_hex_list(bytes)),
        RegistryValue::DWord(n) => format!("dword:{:08x}", n),
        RegistryValue::MultiString(lines) => format!("hex(7):{}", multi_string_to_hex_list(lines)),
        RegistryValue::QWord(n) => format!("hex(b):{}", bytes_to_hex_list(&n.to_le_bytes())),
        RegistryValue::Other { type_code, .. } => {
            return Err(RegistryError::UnsupportedValueKind {
                key_path: key_path.to_string(),
                value_name: value_name.to_string(),
                kind: *type_code,
            })
        }
    };
    Ok(text)
}

/// Escape backslashes, then double quotes
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `[0x0A, 0xFF]` -> `0A,FF`
pub fn bytes_to_hex_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(",")
}

/// UTF-16LE code units, low byte first, followed by a `00,00` terminator
pub fn string_to_hex_list(s: &str) -> String {
    bytes_to_hex_list(&utf16_terminated(s))
}

/// Each string UTF-16LE with its terminator, then one more `00,00`
pub fn multi_string_to_hex_list(lines: &[String]) -> String {
    let mut bytes: Vec<u8> = lines.iter().flat_map(|line| utf16_terminated(line)).collect();
    bytes.extend_from_slice(&[0, 0]);
    bytes_to_hex_list(&bytes)
}

fn utf16_terminated(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}
