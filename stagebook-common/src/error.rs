//! Common error types for stagebook

use thiserror::Error;

/// Common result type for stagebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the stagebook crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error not attributable to a constraint
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before reaching the store
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Store rejected the write (foreign key, NOT NULL, CHECK or UNIQUE)
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Constraint,
    NotFound,
    Unexpected,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Constraint(_) => ErrorKind::Constraint,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => {
                ErrorKind::Unexpected
            }
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Error::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation
                | sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => {
                    Error::Constraint(db_err.message().to_string())
                }
                _ => Error::Database(err),
            },
            _ => Error::Database(err),
        }
    }
}
