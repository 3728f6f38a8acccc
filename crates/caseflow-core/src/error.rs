//! Error types for the advancement engine.

use caseflow_db::DbError;
use thiserror::Error;

/// Primary error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Illegal state transition (closing a non-busy step, no applicable
    /// rule).
    #[error("{0}")]
    Conflict(String),

    /// Required seed rows are absent (`busy`/`complete` status).
    #[error("{0}")]
    Configuration(String),

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Db(DbError::from(err))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
