//! Error helpers for schemaver-store
//!
//! Maps rusqlite and filesystem failures onto the core `MigrateError`.

use schemaver_core::MigrateError;
use std::path::Path;

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Create a store error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> MigrateError {
    MigrateError::store(op, err.to_string())
}

/// Create a configuration error for an unreadable migration source
pub fn io_error(path: &Path, err: std::io::Error) -> MigrateError {
    MigrateError::config(format!("cannot read {}: {}", path.display(), err))
}

/// Create a configuration error for a bad version-table name
pub fn invalid_table_name(name: &str) -> MigrateError {
    MigrateError::config(format!("invalid version table name: {:?}", name))
}
