//! Error handling for regsweep-store
//!
//! Wraps regsweep-core ExError with store-specific helpers

use regsweep_core::errors::{ExError, ExErrorKind, RegistryError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a snapshot validation error
pub fn snapshot_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("snapshot_parse")
        .with_message(reason.to_string())
}

/// Create a snapshot validation error tied to one key
pub fn snapshot_key_invalid(key_path: &str, reason: &str) -> ExError {
    snapshot_validation(reason).with_key_path(key_path)
}

/// Create a snapshot validation error tied to one value
pub fn snapshot_value_invalid(key_path: &str, value_name: &str, reason: &str) -> ExError {
    snapshot_key_invalid(key_path, reason).with_value_name(value_name)
}

/// Create a query plan validation error
pub fn plan_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("plan_parse")
        .with_message(reason.to_string())
}

/// Convert a kernel error raised while applying an input file
pub fn from_registry(operation: &str, err: RegistryError) -> ExError {
    let ex: ExError = err.into();
    ex.with_op(operation.to_string())
}

/// Create a serialization error
pub fn serialization(operation: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
