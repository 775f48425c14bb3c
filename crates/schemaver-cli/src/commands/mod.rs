//! Subcommands and the store options they share

pub mod migrate;
pub mod status;

use clap::Args;
use schemaver_core::Result;
use schemaver_store::{db, SqliteVersionStore, StoreConfig, VersionField};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Path to the SQLite database file (created if missing)
    #[arg(long)]
    pub db: PathBuf,

    /// Keep the version counter in this table instead of PRAGMA user_version
    #[arg(long)]
    pub version_table: Option<String>,

    /// Milliseconds to wait for a locked database
    #[arg(long, default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

impl StoreArgs {
    /// Open and configure the database, then wrap it in a version store
    pub fn open_store(&self) -> Result<SqliteVersionStore> {
        let conn = db::open(&self.db)?;
        db::configure(&conn, Duration::from_millis(self.busy_timeout_ms))?;

        let version_field = match &self.version_table {
            Some(table) => VersionField::table(table.as_str())?,
            None => VersionField::UserVersion,
        };
        SqliteVersionStore::with_config(conn, StoreConfig { version_field })
    }
}
