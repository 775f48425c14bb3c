//! Migrate command
//!
//! Usage: schemaver migrate --db <PATH> --dir <MIGRATIONS>

use clap::Args;
use schemaver_core::{Migrator, Result, VersionStore};
use schemaver_store::sql_dir;
use std::path::PathBuf;

use super::StoreArgs;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Directory of versioned .sql files (e.g. 001_init.sql)
    #[arg(long)]
    pub dir: PathBuf,
}

/// Execute migrate command
pub fn execute(args: MigrateArgs) -> Result<()> {
    let mut migrator = Migrator::new();
    let registered = sql_dir::register_dir(&mut migrator, &args.dir)?;
    tracing::debug!(registered, dir = %args.dir.display(), "loaded migrations");

    let mut store = args.store.open_store()?;
    let applied = migrator.migrate(&mut store)?;
    let current = store.current_version()?;

    println!("applied {} migration(s); now at version {}", applied, current);
    Ok(())
}
