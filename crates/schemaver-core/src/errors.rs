use schemaver_core_types::RunId;
use thiserror::Error;

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on to pick a
/// recovery strategy: fix the registration, redeploy newer code, or inspect
/// the migration / store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Registration
    Config,
    DuplicateVersion,

    // Store ahead of code
    DatabaseTooNew,

    // Underlying failures
    Persistence,
    ActionFailed,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::DuplicateVersion => "ERR_DUPLICATE_VERSION",
            ExErrorKind::DatabaseTooNew => "ERR_DATABASE_TOO_NEW",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ActionFailed => "ERR_ACTION_FAILED",
        }
    }

    /// True for kinds caused by how migrations were declared or registered
    pub fn is_registration_error(&self) -> bool {
        matches!(self, ExErrorKind::Config | ExErrorKind::DuplicateVersion)
    }
}

/// Canonical structured error type
///
/// Carries the classification used by logs and the CLI plus optional
/// context about where the failure happened.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    version: Option<i64>,
    run_id: Option<RunId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            version: None,
            run_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration version context
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Add run correlation context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the migration version context, if any
    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(version) = self.version {
            write!(f, " (version: {})", version)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Failures surfaced by migration registration and the apply algorithm
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    /// A migration was declared without a version or an action, or a store
    /// option is unusable
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Two migrations share a version
    #[error("Duplicate migration version: {version}")]
    DuplicateVersion { version: i64 },

    /// The store has advanced past every registered migration
    #[error("Database version {current} is newer than the latest known migration {latest}")]
    DatabaseTooNew { current: i64, latest: i64 },

    /// The underlying store failed
    #[error("Store error in {op}: {message}")]
    Store { op: String, message: String },

    /// A migration's own logic reported failure
    #[error("Migration action failed: {reason}")]
    Action { reason: String },
}

impl MigrateError {
    /// Shorthand for a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        MigrateError::Config {
            reason: reason.into(),
        }
    }

    /// Shorthand for a store error
    pub fn store(op: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Store {
            op: op.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an action error, for use inside migration closures
    pub fn action(reason: impl Into<String>) -> Self {
        MigrateError::Action {
            reason: reason.into(),
        }
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            MigrateError::Config { .. } => ExErrorKind::Config,
            MigrateError::DuplicateVersion { .. } => ExErrorKind::DuplicateVersion,
            MigrateError::DatabaseTooNew { .. } => ExErrorKind::DatabaseTooNew,
            MigrateError::Store { .. } => ExErrorKind::Persistence,
            MigrateError::Action { .. } => ExErrorKind::ActionFailed,
        }
    }
}

impl From<MigrateError> for ExError {
    fn from(err: MigrateError) -> Self {
        let message = err.to_string();
        match err {
            MigrateError::Config { .. } => ExError::new(ExErrorKind::Config).with_message(message),

            MigrateError::DuplicateVersion { version } => {
                ExError::new(ExErrorKind::DuplicateVersion)
                    .with_op("add")
                    .with_version(version)
                    .with_message(message)
            }

            MigrateError::DatabaseTooNew { current, .. } => {
                ExError::new(ExErrorKind::DatabaseTooNew)
                    .with_op("migrate")
                    .with_version(current)
                    .with_message(message)
            }

            MigrateError::Store { op, message } => ExError::new(ExErrorKind::Persistence)
                .with_op(op)
                .with_message(message),

            MigrateError::Action { .. } => {
                ExError::new(ExErrorKind::ActionFailed).with_message(message)
            }
        }
    }
}
