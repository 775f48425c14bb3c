//! schemaver core - versioned migrations applied exactly once
//!
//! This crate provides:
//! - The [`Migration`] entity: a version paired with an action
//! - The [`Migrator`]: registry with duplicate detection and the apply algorithm
//! - The [`VersionStore`] / [`Transaction`] traits a storage backend implements
//! - The error facility ([`MigrateError`], [`ExError`]) and logging facility
//!
//! Each pending migration runs in its own exclusive transaction together with
//! the version counter update, so the counter never reflects a migration
//! whose effects were rolled back.

pub mod errors;
pub mod logging_facility;
pub mod migration;
pub mod migrator;
pub mod store;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, MigrateError, Result};
pub use migration::{Action, Migration, MigrationBuilder};
pub use migrator::Migrator;
pub use store::{Transaction, TxWork, VersionStore};
