//! Database error types.

use thiserror::Error;

/// Database operation errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found.
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Foreign key violation.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Any other database error.
    #[error("Database error: {0}")]
    SqlxError(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            // 23505 unique_violation, 23503 foreign_key_violation
            match db_err.code().as_deref() {
                Some("23505") => return DbError::DuplicateKey(db_err.message().to_string()),
                Some("23503") => {
                    return DbError::ForeignKeyViolation(db_err.message().to_string())
                }
                _ => {}
            }
        }
        if matches!(err, sqlx::Error::RowNotFound) {
            return DbError::NotFound;
        }
        DbError::SqlxError(err)
    }
}

impl DbError {
    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Check if this is a duplicate key error.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
