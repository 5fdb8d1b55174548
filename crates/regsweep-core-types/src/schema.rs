//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_SESSION_ID: &str = "session_id";

// Registry identifiers
pub const FIELD_ROOT: &str = "root";
pub const FIELD_KEY_PATH: &str = "key_path";
pub const FIELD_VALUE_NAME: &str = "value_name";

// Collection sizes
pub const FIELD_TARGET_COUNT: &str = "target_count";
pub const FIELD_RESULT_COUNT: &str = "result_count";
pub const FIELD_ERROR_COUNT: &str = "error_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
