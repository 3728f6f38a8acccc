//! Process-data-type repository.

use sqlx::PgPool;

use crate::entities::{InsertProcessDataType, ProcessDataType, UpdateProcessDataType};
use crate::error::DbError;

const COLUMNS: &str = "process_data_type_no, description, tmstamp, usrid";

/// Repository for process-data-type rows.
#[derive(Clone)]
pub struct ProcessDataTypeRepository {
    pool: PgPool,
}

impl ProcessDataTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(
        &self,
        process_data_type_no: i32,
    ) -> Result<Option<ProcessDataType>, DbError> {
        let pdt = sqlx::query_as::<_, ProcessDataType>(&format!(
            "SELECT {COLUMNS} FROM process_data_types WHERE process_data_type_no = $1"
        ))
        .bind(process_data_type_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pdt)
    }

    pub async fn find_all(&self) -> Result<Vec<ProcessDataType>, DbError> {
        let types = sqlx::query_as::<_, ProcessDataType>(&format!(
            "SELECT {COLUMNS} FROM process_data_types ORDER BY process_data_type_no"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    pub async fn create(
        &self,
        insert: &InsertProcessDataType,
        usrid: &str,
    ) -> Result<ProcessDataType, DbError> {
        let created = sqlx::query_as::<_, ProcessDataType>(&format!(
            r#"
            INSERT INTO process_data_types (description, usrid)
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
        process_data_type_no: i32,
        update: &UpdateProcessDataType,
        usrid: &str,
    ) -> Result<ProcessDataType, DbError> {
        let updated = sqlx::query_as::<_, ProcessDataType>(&format!(
            r#"
            UPDATE process_data_types
            SET description = COALESCE($2, description), usrid = $3
            WHERE process_data_type_no = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(process_data_type_no)
        .bind(&update.description)
        .bind(usrid)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(DbError::NotFound)
    }
}
