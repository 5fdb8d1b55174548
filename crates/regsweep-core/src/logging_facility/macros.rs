//! Operation event macros
//!
//! Every query, enrichment and snapshot load is bracketed by a `start` event
//! and either an `end` or an `end_error` event. All three carry `component`
//! (the calling module) and `op`; extra fields follow the `tracing` syntax.

/// Emit the `start` event of `op` at info level
///
/// ```
/// # use regsweep_core::log_op_start;
/// log_op_start!("add_value_name");
/// log_op_start!("query", session_id = "0192", target_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Emit the `end` event of `op`; `duration_ms` is mandatory
///
/// ```
/// # use regsweep_core::log_op_end;
/// log_op_end!("snapshot_load", duration_ms = 3);
/// log_op_end!("query", duration_ms = 12, result_count = 40, error_count = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Emit the `end_error` event of `op` at error level
///
/// The error is anything convertible into [`ExError`](crate::errors::ExError);
/// its kind and stable `ERR_*` code become the `err_kind` and `err_code`
/// fields.
///
/// ```
/// # use regsweep_core::{log_op_error, errors::RegistryError};
/// let err = RegistryError::UnsupportedValueKind {
///     key_path: "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor".to_string(),
///     value_name: "Link".to_string(),
///     kind: 6,
/// };
/// log_op_error!("query", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
