//! Case repository - reads are ownership-aware.

use sqlx::PgPool;

use crate::entities::Case;
use crate::error::DbError;

const CASE_COLUMNS: &str = "caseno, client_id, client_type, date_created, tmstamp, usrid";

/// Repository for case rows.
#[derive(Clone)]
pub struct CaseRepository {
    pool: PgPool,
}

impl CaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, caseno: i32) -> Result<Option<Case>, DbError> {
        let case = sqlx::query_as::<_, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE caseno = $1"
        ))
        .bind(caseno)
        .fetch_optional(&self.pool)
        .await?;

        Ok(case)
    }

    /// List all cases (admin scope).
    pub async fn find_all(&self) -> Result<Vec<Case>, DbError> {
        let cases = sqlx::query_as::<_, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases ORDER BY caseno"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cases)
    }

    /// List cases owned by a user (non-admin scope).
    pub async fn find_by_owner(&self, usrid: &str) -> Result<Vec<Case>, DbError> {
        let cases = sqlx::query_as::<_, Case>(&format!(
            "SELECT {CASE_COLUMNS} FROM cases WHERE usrid = $1 ORDER BY caseno"
        ))
        .bind(usrid)
        .fetch_all(&self.pool)
        .await?;

        Ok(cases)
    }
}
