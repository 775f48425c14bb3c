//! Migration entity

use std::fmt;

use crate::errors::{MigrateError, Result};
use crate::store::Transaction;

/// Function a migration runs against the transactional handle
pub type Action = Box<dyn Fn(&mut dyn Transaction) -> Result<()> + Send + Sync>;

/// An immutable, versioned unit of schema change.
pub struct Migration {
    version: i64,
    name: Option<String>,
    action: Action,
}

impl Migration {
    /// Create a migration from a version and the action that applies it.
    ///
    /// # Example
    ///
    /// ```
    /// use schemaver_core::Migration;
    ///
    /// let m = Migration::new(1, |tx| tx.execute_batch("CREATE TABLE users (id INTEGER)"));
    /// assert_eq!(m.version(), 1);
    /// ```
    pub fn new<F>(version: i64, action: F) -> Self
    where
        F: Fn(&mut dyn Transaction) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            version,
            name: None,
            action: Box::new(action),
        }
    }

    /// Migration that runs a fixed SQL batch
    pub fn sql(version: i64, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self::new(version, move |tx| tx.execute_batch(&sql))
    }

    /// Start building a migration field by field
    pub fn builder() -> MigrationBuilder {
        MigrationBuilder::default()
    }

    /// Attach a human-readable name (used in logs only)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Run the action against an open transaction
    ///
    /// # Errors
    ///
    /// Whatever the action returns, unchanged.
    pub fn run(&self, tx: &mut dyn Transaction) -> Result<()> {
        (self.action)(tx)
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Incremental constructor for [`Migration`].
///
/// `build()` fails with [`MigrateError::Config`] unless both a version and
/// an action were supplied.
#[derive(Default)]
pub struct MigrationBuilder {
    version: Option<i64>,
    name: Option<String>,
    action: Option<Action>,
}

impl MigrationBuilder {
    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut dyn Transaction) -> Result<()> + Send + Sync + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn sql(self, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        self.action(move |tx| tx.execute_batch(&sql))
    }

    /// # Errors
    ///
    /// `Config` when the version or the action was never set.
    pub fn build(self) -> Result<Migration> {
        let version = self
            .version
            .ok_or_else(|| MigrateError::config("migration version is required"))?;
        let action = self.action.ok_or_else(|| {
            MigrateError::config(format!("migration {} has no action", version))
        })?;

        Ok(Migration {
            version,
            name: self.name,
            action,
        })
    }
}
