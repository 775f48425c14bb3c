//! SQL file migrations
//!
//! A migrations directory holds one `.sql` file per migration, named with a
//! decimal version prefix: `001_initial_schema.sql`, `2_add_index.sql`.
//! Files without a prefix are ignored.

#![allow(clippy::result_large_err)]

use schemaver_core::{MigrateError, Migration, Migrator};
use std::path::{Path, PathBuf};

use crate::errors::{io_error, Result};

/// Split `003_add_index.sql` into `(3, "add_index")`.
///
/// Returns `Ok(None)` when the file is not a versioned SQL file.
///
/// # Errors
///
/// `Config` when the numeric prefix does not fit in an `i64`.
pub fn parse_file_name(file_name: &str) -> Result<Option<(i64, String)>> {
    let Some(stem) = file_name.strip_suffix(".sql") else {
        return Ok(None);
    };
    let Some((prefix, name)) = stem.split_once('_') else {
        return Ok(None);
    };
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    let version = prefix.parse::<i64>().map_err(|_| {
        MigrateError::config(format!("migration version out of range in {}", file_name))
    })?;

    Ok(Some((version, name.to_string())))
}

/// Load every versioned `.sql` file in `dir`, ordered by file name.
///
/// Duplicate versions are not rejected here; they surface as
/// `DuplicateVersion` when registered.
///
/// # Errors
///
/// `Config` when the directory or a file cannot be read, or a prefix is out
/// of range.
pub fn load_dir(dir: &Path) -> Result<Vec<Migration>> {
    let mut files: Vec<(PathBuf, i64, String)> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match parse_file_name(file_name)? {
            Some((version, name)) => files.push((path.clone(), version, name)),
            None => tracing::debug!(file = %path.display(), "skipping non-migration file"),
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    files
        .into_iter()
        .map(|(path, version, name)| {
            let sql = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            Ok(Migration::sql(version, sql).with_name(name))
        })
        .collect()
}

/// Load `dir` and register each migration, returning how many were added.
///
/// # Errors
///
/// Any error of [`load_dir`], or `DuplicateVersion` from registration.
pub fn register_dir(migrator: &mut Migrator, dir: &Path) -> Result<usize> {
    let migrations = load_dir(dir)?;
    let count = migrations.len();
    for migration in migrations {
        migrator.add(migration)?;
    }
    Ok(count)
}
