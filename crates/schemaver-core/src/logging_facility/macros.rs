//! Canonical logging macros
//!
//! Every operation boundary logs through these so that `component`, `op` and
//! `event` are always present.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use schemaver_core::log_op_start;
/// log_op_start!("migrate");
/// log_op_start!("migrate", registered = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = schemaver_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = schemaver_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use schemaver_core::log_op_end;
/// log_op_end!("migrate", duration_ms = 42);
/// log_op_end!("migrate", duration_ms = 42, applied = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = schemaver_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = schemaver_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into [`ExError`](crate::errors::ExError) so the
/// event carries the stable kind and code, plus `run_id` when the error has
/// one attached.
///
/// # Example
///
/// ```
/// # use schemaver_core::{log_op_error, errors::MigrateError};
/// let err = MigrateError::DuplicateVersion { version: 1 };
/// log_op_error!("add", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = schemaver_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            run_id = ex_err.run_id().map(|id| id.as_str()),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = schemaver_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.message = ex_err.message(),
            run_id = ex_err.run_id().map(|id| id.as_str()),
            $($field)*
        );
    }};
}
