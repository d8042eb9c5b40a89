//! Typed errors and classification of driver failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid setting {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("connection: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("constraint violation: {message}")]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },
    #[error("query: {0}")]
    Query(#[source] sqlx::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Coarse failure category, stable across driver versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Connection,
    ConstraintViolation,
    Query,
    NotFound,
    Validation,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Config,
            AppError::Connection(_) => ErrorKind::Connection,
            AppError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            AppError::Query(_) => ErrorKind::Query,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind as DbKind;
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row".into()),
            sqlx::Error::Database(ref db)
                if matches!(
                    db.kind(),
                    DbKind::UniqueViolation
                        | DbKind::ForeignKeyViolation
                        | DbKind::NotNullViolation
                        | DbKind::CheckViolation
                ) =>
            {
                AppError::ConstraintViolation {
                    constraint: db.constraint().map(str::to_owned),
                    message: db.message().to_owned(),
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::Connection(e),
            other => AppError::Query(other),
        }
    }
}

/// Turns an empty point lookup into [`AppError::NotFound`] for callers that require the record.
pub trait OptionExt<T> {
    fn or_not_found(self, what: impl Into<String>) -> AppResult<T>;
}

impl<T> OptionExt<T> for AppResult<Option<T>> {
    fn or_not_found(self, what: impl Into<String>) -> AppResult<T> {
        self?.ok_or_else(|| AppError::NotFound(what.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind as DbKind};
    use std::borrow::Cow;
    use std::fmt;

    #[derive(Debug)]
    struct FakeDbError {
        kind: DbKind,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message())
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> DbKind {
            match self.kind {
                DbKind::UniqueViolation => DbKind::UniqueViolation,
                DbKind::ForeignKeyViolation => DbKind::ForeignKeyViolation,
                _ => DbKind::Other,
            }
        }
    }

    fn db_error(kind: DbKind, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { kind, constraint }))
    }

    #[test]
    fn unique_violation_is_constraint_violation() {
        let err = AppError::from(db_error(DbKind::UniqueViolation, Some("users_email_key")));
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        match err {
            AppError::ConstraintViolation { constraint, .. } => {
                assert_eq!(constraint.as_deref(), Some("users_email_key"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn foreign_key_violation_is_constraint_violation() {
        let err = AppError::from(db_error(DbKind::ForeignKeyViolation, None));
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn other_database_error_is_query_error() {
        let err = AppError::from(db_error(DbKind::Other, None));
        assert_eq!(err.kind(), ErrorKind::Query);
    }

    #[test]
    fn pool_failures_are_connection_errors() {
        assert_eq!(AppError::from(sqlx::Error::PoolTimedOut).kind(), ErrorKind::Connection);
        assert_eq!(AppError::from(sqlx::Error::PoolClosed).kind(), ErrorKind::Connection);
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(AppError::from(sqlx::Error::Io(io)).kind(), ErrorKind::Connection);
    }

    #[test]
    fn decode_failures_are_query_errors() {
        let err = AppError::from(sqlx::Error::ColumnNotFound("average_rating".into()));
        assert_eq!(err.kind(), ErrorKind::Query);
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert_eq!(AppError::from(sqlx::Error::RowNotFound).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn or_not_found_keeps_present_values_and_errors() {
        let found: AppResult<Option<i32>> = Ok(Some(7));
        assert_eq!(found.or_not_found("user 7").ok(), Some(7));

        let missing: AppResult<Option<i32>> = Ok(None);
        let err = missing.or_not_found("user 8").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "not found: user 8");

        let failed: AppResult<Option<i32>> = Err(AppError::from(sqlx::Error::PoolClosed));
        assert_eq!(failed.or_not_found("user 9").unwrap_err().kind(), ErrorKind::Connection);
    }
}
