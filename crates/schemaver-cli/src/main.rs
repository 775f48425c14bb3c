//! schemaver CLI
//!
//! Command-line interface for applying SQL migrations to a SQLite database

use clap::{Parser, Subcommand};
use schemaver_core::logging_facility::{self, Profile};
use schemaver_core::ExError;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "schemaver")]
#[command(about = "schemaver - apply versioned SQLite migrations exactly once", long_about = None)]
struct Cli {
    /// Logging profile: development (human-readable) or production (JSON)
    #[arg(long, global = true, default_value = "development")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the current version and any pending migrations
    Status(commands::status::StatusArgs),
    /// Apply pending migrations from a directory of .sql files
    Migrate(commands::migrate::MigrateArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let result = match cli.command {
        Commands::Status(args) => commands::status::execute(args),
        Commands::Migrate(args) => commands::migrate::execute(args),
    };

    if let Err(e) = result {
        let ex_err: ExError = e.into();
        eprintln!("Error: {}", ex_err);
        std::process::exit(1);
    }
}
