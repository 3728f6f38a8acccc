//! Process-type repository.

use sqlx::PgPool;

use crate::entities::{InsertProcessType, ProcessType, UpdateProcessType};
use crate::error::DbError;

const COLUMNS: &str = "process_type_no, description, tmstamp, usrid";

/// Repository for process-type rows.
#[derive(Clone)]
pub struct ProcessTypeRepository {
    pool: PgPool,
}

impl ProcessTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, process_type_no: i32) -> Result<Option<ProcessType>, DbError> {
        let pt = sqlx::query_as::<_, ProcessType>(&format!(
            "SELECT {COLUMNS} FROM process_types WHERE process_type_no = $1"
        ))
        .bind(process_type_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pt)
    }

    pub async fn find_all(&self) -> Result<Vec<ProcessType>, DbError> {
        let types = sqlx::query_as::<_, ProcessType>(&format!(
            "SELECT {COLUMNS} FROM process_types ORDER BY process_type_no"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    pub async fn create(
        &self,
        insert: &InsertProcessType,
        usrid: &str,
    ) -> Result<ProcessType, DbError> {
        let created = sqlx::query_as::<_, ProcessType>(&format!(
            r#"
            INSERT INTO process_types (description, usrid)
            VALUES ($1, $2)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&insert.description)
        .bind(usrid)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        process_type_no: i32,
        update: &UpdateProcessType,
        usrid: &str,
    ) -> Result<ProcessType, DbError> {
        let updated = sqlx::query_as::<_, ProcessType>(&format!(
            r#"
            UPDATE process_types
            SET description = COALESCE($2, description), usrid = $3
            WHERE process_type_no = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(process_type_no)
        .bind(&update.description)
        .bind(usrid)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(DbError::NotFound)
    }
}
