//! Migration registry and apply engine.
//!
//! ## Logging Ownership
//!
//! `migrate` owns lifecycle logging for a run:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Per-migration progress is logged with plain `tracing` calls inside the
//! run's span.

use std::collections::HashMap;
use std::fmt;

use schemaver_core_types::RunId;

use crate::errors::{MigrateError, Result};
use crate::migration::{Migration, MigrationBuilder};
use crate::store::{Transaction, VersionStore};
use crate::{log_op_end, log_op_error, log_op_start};

/// Registry of migrations keyed by version, plus the apply algorithm.
///
/// Registration order does not matter: `migrate` always sorts a snapshot by
/// version before touching the store.
#[derive(Default)]
pub struct Migrator {
    registry: HashMap<i64, Migration>,
}

impl Migrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a migration.
    ///
    /// Returns `self` for chaining. Fails with
    /// [`MigrateError::DuplicateVersion`] if the version is already taken, in
    /// which case the registry is left unchanged.
    ///
    /// # Errors
    ///
    /// - `DuplicateVersion`: a migration with this version is already registered
    ///
    /// # Example
    ///
    /// ```
    /// use schemaver_core::{Migration, Migrator};
    ///
    /// let mut migrator = Migrator::new();
    /// migrator
    ///     .add(Migration::sql(1, "CREATE TABLE a (id INTEGER)"))?
    ///     .add(Migration::sql(2, "CREATE TABLE b (id INTEGER)"))?;
    /// assert_eq!(migrator.len(), 2);
    /// # Ok::<(), schemaver_core::MigrateError>(())
    /// ```
    pub fn add(&mut self, migration: Migration) -> Result<&mut Self> {
        let version = migration.version();
        if self.registry.contains_key(&version) {
            tracing::warn!(version, "rejected duplicate migration version");
            return Err(MigrateError::DuplicateVersion { version });
        }

        tracing::debug!(version, name = migration.name(), "registered migration");
        self.registry.insert(version, migration);
        Ok(self)
    }

    /// Build and register a migration in one step.
    ///
    /// A builder missing its version or action fails with
    /// [`MigrateError::Config`] and nothing is registered.
    ///
    /// # Errors
    ///
    /// - `Config`: the builder is missing its version or action
    /// - `DuplicateVersion`: as for [`Migrator::add`]
    pub fn add_builder(&mut self, builder: MigrationBuilder) -> Result<&mut Self> {
        let migration = builder.build()?;
        self.add(migration)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered versions in ascending order
    pub fn versions(&self) -> Vec<i64> {
        self.sorted().iter().map(|m| m.version()).collect()
    }

    /// Highest registered version, if any
    pub fn latest_version(&self) -> Option<i64> {
        self.registry.keys().copied().max()
    }

    /// Versions `migrate` would apply against `store`, ascending.
    ///
    /// Reads the counter but opens no transaction. Fails with
    /// [`MigrateError::DatabaseTooNew`] exactly when `migrate` would.
    ///
    /// # Errors
    ///
    /// - `DatabaseTooNew`: the persisted version exceeds every registered version
    /// - `Store`: reading the counter failed
    pub fn pending<S>(&self, store: &mut S) -> Result<Vec<i64>>
    where
        S: VersionStore + ?Sized,
    {
        let Some(latest) = self.latest_version() else {
            return Ok(Vec::new());
        };

        let current = store.current_version()?;
        ensure_not_too_new(current, latest)?;

        Ok(self
            .sorted()
            .into_iter()
            .map(Migration::version)
            .filter(|v| *v > current)
            .collect())
    }

    /// Apply every pending migration, one exclusive transaction each.
    ///
    /// Returns the number of migrations applied by this call. On failure the
    /// store reflects exactly the migrations committed before the failing
    /// one, and a later call resumes from there.
    ///
    /// # Errors
    ///
    /// - `DatabaseTooNew`: the persisted version exceeds every registered version
    /// - `Store`: the store failed reading, writing or committing
    /// - any error returned by a migration's action, unchanged
    pub fn migrate<S>(&self, store: &mut S) -> Result<usize>
    where
        S: VersionStore + ?Sized,
    {
        if self.registry.is_empty() {
            tracing::debug!("no migrations registered");
            return Ok(0);
        }

        let run_id = RunId::new();
        let span = tracing::info_span!("migrate", run_id = %run_id);
        let _entered = span.enter();

        log_op_start!("migrate", registered = self.registry.len());
        let start = std::time::Instant::now();

        let (applied, current_version) = self.migrate_impl(store).map_err(|e| {
            log_op_error!(
                "migrate",
                ExError::from(e.clone()).with_run_id(run_id.clone()),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "migrate",
            duration_ms = start.elapsed().as_millis() as u64,
            applied = applied,
            current_version = current_version
        );

        Ok(applied)
    }

    /// Returns how many migrations were applied and the version the store is
    /// left at.
    fn migrate_impl<S>(&self, store: &mut S) -> Result<(usize, i64)>
    where
        S: VersionStore + ?Sized,
    {
        let snapshot = self.sorted();
        let current = store.current_version()?;
        let Some(latest) = snapshot.last().map(|m| m.version()) else {
            return Ok((0, current));
        };

        tracing::debug!(
            current_version = current,
            latest_version = latest,
            "read persisted version"
        );
        ensure_not_too_new(current, latest)?;

        let mut applied = 0;
        let mut now_at = current;
        for migration in snapshot {
            let version = migration.version();
            if version <= current {
                tracing::debug!(version, "already applied, skipping");
                continue;
            }

            tracing::info!(version, name = migration.name(), "applying migration");
            store.exclusive(&mut |tx: &mut dyn Transaction| {
                migration.run(tx)?;
                tx.set_version(version)
            })?;
            applied += 1;
            now_at = version;
            tracing::info!(version, "migration committed");
        }

        Ok((applied, now_at))
    }

    /// Snapshot of the registry sorted by version
    fn sorted(&self) -> Vec<&Migration> {
        let mut snapshot: Vec<&Migration> = self.registry.values().collect();
        snapshot.sort_by_key(|m| m.version());
        snapshot
    }
}

impl fmt::Debug for Migrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migrator")
            .field("versions", &self.versions())
            .finish()
    }
}

fn ensure_not_too_new(current: i64, latest: i64) -> Result<()> {
    if latest < current {
        return Err(MigrateError::DatabaseTooNew { current, latest });
    }
    Ok(())
}
