use schemaver_core::{MigrateError, Migration, Result, Transaction, TxWork, VersionStore};

/// A store call observed by [`MemoryStore`]
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    CurrentVersion,
    Begin,
    Commit,
    Rollback,
}

/// In-memory version store that records every call.
///
/// Statements are staged per transaction and only become visible in
/// `statements` on commit. A statement containing `FAIL` errors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub version: i64,
    pub statements: Vec<String>,
    pub calls: Vec<StoreCall>,
    pub fail_set_version: bool,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at_version(version: i64) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn count(&self, call: StoreCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

struct MemoryTx {
    version: Option<i64>,
    statements: Vec<String>,
    fail_set_version: bool,
}

impl Transaction for MemoryTx {
    fn execute(&mut self, sql: &str) -> Result<usize> {
        if sql.contains("FAIL") {
            return Err(MigrateError::store("execute", format!("rejected: {}", sql)));
        }
        self.statements.push(sql.to_string());
        Ok(1)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        for stmt in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            self.execute(stmt)?;
        }
        Ok(())
    }

    fn set_version(&mut self, version: i64) -> Result<()> {
        if self.fail_set_version {
            return Err(MigrateError::store("set_version", "counter is read-only"));
        }
        self.version = Some(version);
        Ok(())
    }
}

impl VersionStore for MemoryStore {
    fn current_version(&mut self) -> Result<i64> {
        self.calls.push(StoreCall::CurrentVersion);
        Ok(self.version)
    }

    fn exclusive(&mut self, work: &mut TxWork<'_>) -> Result<()> {
        self.calls.push(StoreCall::Begin);
        let mut tx = MemoryTx {
            version: None,
            statements: Vec::new(),
            fail_set_version: self.fail_set_version,
        };

        let result = work(&mut tx as &mut dyn Transaction);
        match result {
            Ok(()) => {
                if let Some(v) = tx.version {
                    self.version = v;
                }
                self.statements.extend(tx.statements);
                self.calls.push(StoreCall::Commit);
                Ok(())
            }
            Err(e) => {
                self.calls.push(StoreCall::Rollback);
                Err(e)
            }
        }
    }
}

/// Migration that records `apply <version>` when it runs
#[allow(dead_code)]
pub fn recording(version: i64) -> Migration {
    Migration::new(version, move |tx| {
        tx.execute(&format!("apply {}", version))?;
        Ok(())
    })
}

/// Migration whose action fails after issuing a statement
#[allow(dead_code)]
pub fn failing(version: i64) -> Migration {
    Migration::new(version, move |tx| {
        tx.execute(&format!("apply {}", version))?;
        Err(MigrateError::action(format!("bug in migration {}", version)))
    })
}
