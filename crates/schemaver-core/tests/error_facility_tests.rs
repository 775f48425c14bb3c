use schemaver_core::errors::{ExError, ExErrorKind, MigrateError};

#[test]
fn test_duplicate_version_verifiable_by_kind() {
    let ex_err: ExError = MigrateError::DuplicateVersion { version: 7 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateVersion);
    assert_eq!(ex_err.code(), "ERR_DUPLICATE_VERSION");
    assert_eq!(ex_err.version(), Some(7));
    assert_eq!(ex_err.op(), Some("add"));
}

#[test]
fn test_database_too_new_carries_current_version() {
    let ex_err: ExError = MigrateError::DatabaseTooNew {
        current: 5,
        latest: 3,
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::DatabaseTooNew);
    assert_eq!(ex_err.code(), "ERR_DATABASE_TOO_NEW");
    assert_eq!(ex_err.version(), Some(5));
    assert!(ex_err.message().contains("newer than the latest known migration 3"));
}

#[test]
fn test_store_error_keeps_operation() {
    let ex_err: ExError = MigrateError::store("begin_exclusive", "database is locked").into();

    assert_eq!(ex_err.kind(), ExErrorKind::Persistence);
    assert_eq!(ex_err.op(), Some("begin_exclusive"));
    assert_eq!(ex_err.message(), "database is locked");
}

#[test]
fn test_action_distinct_from_store() {
    let action: ExError = MigrateError::action("bad data").into();
    let store: ExError = MigrateError::store("execute", "bad data").into();

    assert_eq!(action.kind(), ExErrorKind::ActionFailed);
    assert_ne!(action.kind(), store.kind());
}

#[test]
fn test_config_error_is_registration_error() {
    let ex_err: ExError = MigrateError::config("migration version is required").into();

    assert!(ex_err.kind().is_registration_error());
    assert_eq!(
        ex_err.to_string(),
        "[ERR_CONFIG]: Configuration error: migration version is required"
    );
}

#[test]
fn test_kind_matches_conversion() {
    let errors = vec![
        MigrateError::config("x"),
        MigrateError::DuplicateVersion { version: 1 },
        MigrateError::DatabaseTooNew {
            current: 2,
            latest: 1,
        },
        MigrateError::store("op", "x"),
        MigrateError::action("x"),
    ];

    for err in errors {
        let kind = err.kind();
        let ex_err: ExError = err.into();
        assert_eq!(ex_err.kind(), kind);
    }
}
