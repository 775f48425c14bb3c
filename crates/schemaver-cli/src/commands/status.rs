//! Status command
//!
//! Usage: schemaver status --db <PATH> [--dir <MIGRATIONS>]

use clap::Args;
use schemaver_core::{Migrator, Result, VersionStore};
use schemaver_store::sql_dir;
use std::path::PathBuf;

use super::StoreArgs;

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Directory of versioned .sql files to compare against
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Execute status command
pub fn execute(args: StatusArgs) -> Result<()> {
    let mut store = args.store.open_store()?;
    let current = store.current_version()?;
    println!("current version: {}", current);

    let Some(dir) = args.dir else {
        return Ok(());
    };

    let mut migrator = Migrator::new();
    sql_dir::register_dir(&mut migrator, &dir)?;
    let pending = migrator.pending(&mut store)?;

    match migrator.latest_version() {
        Some(latest) => println!("latest migration: {}", latest),
        None => println!("latest migration: none"),
    }
    if pending.is_empty() {
        println!("up to date");
    } else {
        let listed: Vec<String> = pending.iter().map(|v| v.to_string()).collect();
        println!("pending: {}", listed.join(", "));
    }

    Ok(())
}
