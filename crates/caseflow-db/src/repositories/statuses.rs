//! Status repository.

use sqlx::PgPool;

use crate::entities::{Status, UpdateStatus};
use crate::error::DbError;

/// Resolve a status number by case-insensitive description lookup.
///
/// Status numbering is not fixed, so `busy`/`complete` must never be
/// assumed to be particular numbers. Generic over the executor so the
/// engine can resolve statuses inside its own transaction.
pub async fn resolve_status<'e, E>(executor: E, description: &str) -> Result<Option<i32>, DbError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT statusno FROM status WHERE LOWER(description) = LOWER($1) ORDER BY statusno LIMIT 1",
    )
    .bind(description)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|r| r.0))
}

/// Repository for status rows.
#[derive(Clone)]
pub struct StatusRepository {
    pool: PgPool,
}

impl StatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, statusno: i32) -> Result<Option<Status>, DbError> {
        let status = sqlx::query_as::<_, Status>(
            "SELECT statusno, description, tmstamp, usrid FROM status WHERE statusno = $1",
        )
        .bind(statusno)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    pub async fn find_all(&self) -> Result<Vec<Status>, DbError> {
        let statuses = sqlx::query_as::<_, Status>(
            "SELECT statusno, description, tmstamp, usrid FROM status ORDER BY statusno",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(statuses)
    }

    /// Resolve a status by description (case-insensitive).
    pub async fn resolve(&self, description: &str) -> Result<Option<i32>, DbError> {
        resolve_status(&self.pool, description).await
    }

    pub async fn create(&self, description: &str, usrid: &str) -> Result<Status, DbError> {
        let status = sqlx::query_as::<_, Status>(
            r#"
            INSERT INTO status (description, usrid)
            VALUES ($1, $2)
            RETURNING statusno, description, tmstamp, usrid
            "#,
        )
        .bind(description)
        .bind(usrid)
        .fetch_one(&self.pool)
        .await?;

        Ok(status)
    }

    pub async fn update(
        &self,
        statusno: i32,
        update: &UpdateStatus,
        usrid: &str,
    ) -> Result<Status, DbError> {
        let status = sqlx::query_as::<_, Status>(
            r#"
            UPDATE status
            SET description = COALESCE($2, description), usrid = $3
            WHERE statusno = $1
            RETURNING statusno, description, tmstamp, usrid
            "#,
        )
        .bind(statusno)
        .bind(&update.description)
        .bind(usrid)
        .fetch_optional(&self.pool)
        .await?;

        status.ok_or(DbError::NotFound)
    }
}
