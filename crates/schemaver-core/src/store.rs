//! Version store collaborator
//!
//! The migrator never talks to a database directly. It needs exactly two
//! capabilities: reading the persisted version counter, and running a unit
//! of work inside an exclusive transaction. Everything a migration does to
//! the store goes through the [`Transaction`] handle it is given.

use crate::errors::Result;

/// Handle for issuing statements inside an open transaction.
///
/// Only valid for the duration of the enclosing [`VersionStore::exclusive`]
/// call. It deliberately offers no way to begin, commit or roll back.
pub trait Transaction {
    /// Execute a single statement, returning the number of rows changed
    ///
    /// # Errors
    ///
    /// `Store` when the backend rejects the statement.
    fn execute(&mut self, sql: &str) -> Result<usize>;

    /// Execute several `;`-separated statements
    ///
    /// # Errors
    ///
    /// `Store` at the first statement the backend rejects.
    fn execute_batch(&mut self, sql: &str) -> Result<()>;

    /// Write the persisted version counter (`SET <version-field> = <value>`)
    ///
    /// # Errors
    ///
    /// `Store` when the write fails; `Config` when the backend cannot
    /// represent `version`.
    fn set_version(&mut self, version: i64) -> Result<()>;
}

/// Unit of work run by [`VersionStore::exclusive`]
pub type TxWork<'w> = dyn FnMut(&mut dyn Transaction) -> Result<()> + 'w;

/// A store that owns the persisted version counter.
pub trait VersionStore {
    /// Read the persisted version counter
    ///
    /// # Errors
    ///
    /// `Store` when the counter cannot be read.
    fn current_version(&mut self) -> Result<i64>;

    /// Run `work` inside an exclusive transaction.
    ///
    /// Commits if and only if `work` returns `Ok`. When `work` fails the
    /// transaction is rolled back and its error is returned unchanged.
    ///
    /// # Errors
    ///
    /// `Store` when the transaction cannot begin or commit, otherwise the
    /// error `work` returned.
    fn exclusive(&mut self, work: &mut TxWork<'_>) -> Result<()>;
}
