//! SQLite implementation of the version store
//!
//! The version counter lives either in `PRAGMA user_version` (the default)
//! or in a single-row table. Both are written inside the same exclusive
//! transaction as the migration, so a rollback discards the counter update
//! together with the migration's statements.

#![allow(clippy::result_large_err)]

use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use schemaver_core::{MigrateError, Transaction, TxWork, VersionStore};

use crate::errors::{from_rusqlite, invalid_table_name, Result};

/// Where the persisted version counter is kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionField {
    /// `PRAGMA user_version` (32-bit signed)
    #[default]
    UserVersion,
    /// Single-row table `<name>(id = 0, version)`, created on first write
    Table(String),
}

impl VersionField {
    /// Table-backed counter, validating the table name
    ///
    /// # Errors
    ///
    /// `Config` unless `name` is a plain identifier outside the `sqlite_`
    /// namespace.
    pub fn table(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_valid_table_name(&name) {
            return Err(invalid_table_name(&name));
        }
        Ok(VersionField::Table(name))
    }
}

/// Options for [`SqliteVersionStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub version_field: VersionField,
}

/// Version store over a rusqlite connection.
pub struct SqliteVersionStore {
    conn: Connection,
    config: StoreConfig,
}

impl SqliteVersionStore {
    /// Store keeping its counter in `PRAGMA user_version`
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            config: StoreConfig::default(),
        }
    }

    /// Store with explicit options
    ///
    /// # Errors
    ///
    /// `Config` when a table-backed counter names an invalid table.
    pub fn with_config(conn: Connection, config: StoreConfig) -> Result<Self> {
        if let VersionField::Table(name) = &config.version_field {
            if !is_valid_table_name(name) {
                return Err(invalid_table_name(name));
            }
        }
        Ok(Self { conn, config })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Give the connection back to the caller
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl VersionStore for SqliteVersionStore {
    fn current_version(&mut self) -> Result<i64> {
        match &self.config.version_field {
            VersionField::UserVersion => self
                .conn
                .pragma_query_value(None, "user_version", |row| row.get(0))
                .map_err(|e| from_rusqlite("read_version", e)),
            VersionField::Table(name) => read_table_version(&self.conn, name),
        }
    }

    fn exclusive(&mut self, work: &mut TxWork<'_>) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Exclusive)
            .map_err(|e| from_rusqlite("begin_exclusive", e))?;

        let mut handle = SqliteTx {
            tx: &tx,
            field: &self.config.version_field,
        };

        if let Err(err) = work(&mut handle as &mut dyn Transaction) {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            return Err(err);
        }

        tx.commit().map_err(|e| from_rusqlite("commit", e))
    }
}

/// Transactional handle handed to migration actions
struct SqliteTx<'a> {
    tx: &'a rusqlite::Transaction<'a>,
    field: &'a VersionField,
}

impl Transaction for SqliteTx<'_> {
    fn execute(&mut self, sql: &str) -> Result<usize> {
        self.tx
            .execute(sql, [])
            .map_err(|e| from_rusqlite("execute", e))
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.tx
            .execute_batch(sql)
            .map_err(|e| from_rusqlite("execute_batch", e))
    }

    fn set_version(&mut self, version: i64) -> Result<()> {
        match self.field {
            VersionField::UserVersion => {
                let value = i32::try_from(version).map_err(|_| {
                    MigrateError::config(format!(
                        "version {} does not fit in PRAGMA user_version",
                        version
                    ))
                })?;
                self.tx
                    .pragma_update(None, "user_version", value)
                    .map_err(|e| from_rusqlite("set_version", e))
            }
            VersionField::Table(name) => {
                self.tx
                    .execute_batch(&format!(
                        "CREATE TABLE IF NOT EXISTS \"{}\" (
                            id INTEGER PRIMARY KEY CHECK (id = 0),
                            version INTEGER NOT NULL
                        )",
                        name
                    ))
                    .map_err(|e| from_rusqlite("set_version", e))?;
                self.tx
                    .execute(
                        &format!(
                            "INSERT INTO \"{}\" (id, version) VALUES (0, ?1)
                             ON CONFLICT(id) DO UPDATE SET version = excluded.version",
                            name
                        ),
                        [version],
                    )
                    .map_err(|e| from_rusqlite("set_version", e))?;
                Ok(())
            }
        }
    }
}

fn read_table_version(conn: &Connection, name: &str) -> Result<i64> {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [name],
            |row| row.get(0),
        )
        .map_err(|e| from_rusqlite("read_version", e))?;
    if !exists {
        return Ok(0);
    }

    let version: Option<i64> = conn
        .query_row(
            &format!("SELECT version FROM \"{}\" WHERE id = 0", name),
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| from_rusqlite("read_version", e))?;

    Ok(version.unwrap_or(0))
}

/// Plain SQL identifier, not in SQLite's reserved `sqlite_` namespace.
///
/// Keywords such as `order` pass; statements always quote the name.
fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.to_ascii_lowercase().starts_with("sqlite_")
}
