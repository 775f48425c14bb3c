//! CLI integration tests
//!
//! These tests run the `schemaver` binary against a temporary database and a
//! temporary migrations directory.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn setup_migrations(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let db_path = temp_dir.path().join("store.db");
    let dir = temp_dir.path().join("migrations");
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("001_users.sql"),
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
    )
    .unwrap();
    fs::write(
        dir.join("002_posts.sql"),
        "CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER REFERENCES users(id));",
    )
    .unwrap();

    (db_path, dir)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemaver"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn path_arg(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn user_version(db_path: &Path) -> i64 {
    let conn = Connection::open(db_path).unwrap();
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap()
}

#[test]
fn test_cli_migrate_applies_pending() {
    let temp_dir = TempDir::new().unwrap();
    let (db_path, dir) = setup_migrations(&temp_dir);

    let output = run(&["migrate", "--db", path_arg(&db_path), "--dir", path_arg(&dir)]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("applied 2 migration(s); now at version 2"));
    assert_eq!(user_version(&db_path), 2);
}

#[test]
fn test_cli_migrate_twice_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let (db_path, dir) = setup_migrations(&temp_dir);

    run(&["migrate", "--db", path_arg(&db_path), "--dir", path_arg(&dir)]);
    let output = run(&["migrate", "--db", path_arg(&db_path), "--dir", path_arg(&dir)]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("applied 0 migration(s)"));
}

#[test]
fn test_cli_status_lists_pending() {
    let temp_dir = TempDir::new().unwrap();
    let (db_path, dir) = setup_migrations(&temp_dir);

    let output = run(&["status", "--db", path_arg(&db_path), "--dir", path_arg(&dir)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("current version: 0"));
    assert!(stdout.contains("pending: 1, 2"));
}

#[test]
fn test_cli_database_too_new_exits_with_code() {
    let temp_dir = TempDir::new().unwrap();
    let (db_path, dir) = setup_migrations(&temp_dir);
    Connection::open(&db_path)
        .unwrap()
        .pragma_update(None, "user_version", 7)
        .unwrap();

    let output = run(&["migrate", "--db", path_arg(&db_path), "--dir", path_arg(&dir)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_DATABASE_TOO_NEW"));
    assert_eq!(user_version(&db_path), 7);
}

#[test]
fn test_cli_version_table() {
    let temp_dir = TempDir::new().unwrap();
    let (db_path, dir) = setup_migrations(&temp_dir);

    let output = run(&[
        "migrate",
        "--db",
        path_arg(&db_path),
        "--dir",
        path_arg(&dir),
        "--version-table",
        "schema_version",
    ]);

    assert!(output.status.success());
    assert_eq!(user_version(&db_path), 0);
    let conn = Connection::open(&db_path).unwrap();
    let version: i64 = conn
        .query_row("SELECT version FROM schema_version WHERE id = 0", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, 2);
}

#[test]
fn test_cli_broken_migration_reports_persistence_error() {
    let temp_dir = TempDir::new().unwrap();
    let (db_path, dir) = setup_migrations(&temp_dir);
    fs::write(dir.join("003_broken.sql"), "CREATE TABLE (").unwrap();

    let output = run(&["migrate", "--db", path_arg(&db_path), "--dir", path_arg(&dir)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_PERSISTENCE"));
    assert_eq!(user_version(&db_path), 2);
}
