//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Unique-constraint violation, e.g. a duplicate order number
    #[error("unique constraint violation")]
    Conflict,

    /// Stored value does not decode into a domain type
    #[error("corrupt row: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict
        } else {
            Self::Sqlx(err)
        }
    }
}

/// Postgres signals unique-index violations with SQLSTATE 23505
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

/// Result alias for database operations
pub type DbResult<T> = Result<T, DbError>;
