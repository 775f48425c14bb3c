//! schemaver store - SQLite backend for the migrator
//!
//! Provides:
//! - `SqliteVersionStore`: exclusive transactions and the version counter
//!   (`PRAGMA user_version` or a single-row table)
//! - Connection helpers
//! - Loading migrations from a directory of versioned `.sql` files

pub mod db;
pub mod errors;
pub mod sql_dir;
pub mod sqlite_store;

// Re-export key types
pub use errors::Result;
pub use sqlite_store::{SqliteVersionStore, StoreConfig, VersionField};
