//! Process-data repository.
//!
//! Listing queries join through processes to cases so non-admin callers
//! only ever see data belonging to their own cases.

use sqlx::PgPool;

use crate::entities::{InsertProcessData, ProcessData, UpdateProcessData};
use crate::error::DbError;

const PD_COLUMNS: &str =
    "process_data_no, processno, process_data_type_no, fieldname, value, tmstamp, usrid";

/// Repository for process-data rows.
#[derive(Clone)]
pub struct ProcessDataRepository {
    pool: PgPool,
}

impl ProcessDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All process data (admin scope).
    pub async fn find_all(&self) -> Result<Vec<ProcessData>, DbError> {
        let data = sqlx::query_as::<_, ProcessData>(&format!(
            "SELECT {PD_COLUMNS} FROM process_data ORDER BY process_data_no"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }

    /// Process data across all cases owned by a user (non-admin scope).
    pub async fn find_for_owner(&self, usrid: &str) -> Result<Vec<ProcessData>, DbError> {
        let data = sqlx::query_as::<_, ProcessData>(
            r#"
            SELECT pd.process_data_no, pd.processno, pd.process_data_type_no,
                   pd.fieldname, pd.value, pd.tmstamp, pd.usrid
            FROM process_data pd
            JOIN processes p ON pd.processno = p.processno
            JOIN cases c ON p.case_no = c.caseno
            WHERE c.usrid = $1
            ORDER BY pd.process_data_no
            "#,
        )
        .bind(usrid)
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }

    /// All process data for one case (admin scope).
    pub async fn find_for_case(&self, case_no: i32) -> Result<Vec<ProcessData>, DbError> {
        let data = sqlx::query_as::<_, ProcessData>(
            r#"
            SELECT pd.process_data_no, pd.processno, pd.process_data_type_no,
                   pd.fieldname, pd.value, pd.tmstamp, pd.usrid
            FROM process_data pd
            JOIN processes p ON pd.processno = p.processno
            WHERE p.case_no = $1
            ORDER BY pd.process_data_no
            "#,
        )
        .bind(case_no)
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }

    /// Process data for one case, limited to the requesting owner.
    pub async fn find_for_case_and_owner(
        &self,
        case_no: i32,
        usrid: &str,
    ) -> Result<Vec<ProcessData>, DbError> {
        let data = sqlx::query_as::<_, ProcessData>(
            r#"
            SELECT pd.process_data_no, pd.processno, pd.process_data_type_no,
                   pd.fieldname, pd.value, pd.tmstamp, pd.usrid
            FROM process_data pd
            JOIN processes p ON pd.processno = p.processno
            JOIN cases c ON p.case_no = c.caseno
            WHERE p.case_no = $1 AND c.usrid = $2
            ORDER BY pd.process_data_no
            "#,
        )
        .bind(case_no)
        .bind(usrid)
        .fetch_all(&self.pool)
        .await?;

        Ok(data)
    }

    /// Find one datum, optionally restricted to an owning user.
    pub async fn find_by_id_scoped(
        &self,
        process_data_no: i32,
        owner: Option<&str>,
    ) -> Result<Option<ProcessData>, DbError> {
        let data = match owner {
            None => {
                sqlx::query_as::<_, ProcessData>(&format!(
                    "SELECT {PD_COLUMNS} FROM process_data WHERE process_data_no = $1"
                ))
                .bind(process_data_no)
                .fetch_optional(&self.pool)
                .await?
            }
            Some(usrid) => {
                sqlx::query_as::<_, ProcessData>(
                    r#"
                    SELECT pd.process_data_no, pd.processno, pd.process_data_type_no,
                           pd.fieldname, pd.value, pd.tmstamp, pd.usrid
                    FROM process_data pd
                    JOIN processes p ON pd.processno = p.processno
                    JOIN cases c ON p.case_no = c.caseno
                    WHERE pd.process_data_no = $1 AND c.usrid = $2
                    "#,
                )
                .bind(process_data_no)
                .bind(usrid)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(data)
    }

    /// Attach a datum to a process.
    pub async fn create(
        &self,
        processno: i32,
        data: &InsertProcessData,
        usrid: &str,
    ) -> Result<ProcessData, DbError> {
        let created = sqlx::query_as::<_, ProcessData>(&format!(
            r#"
            INSERT INTO process_data (processno, process_data_type_no, fieldname, value, usrid)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PD_COLUMNS}
            "#
        ))
        .bind(processno)
        .bind(data.process_data_type_no)
        .bind(&data.fieldname)
        .bind(&data.value)
        .bind(usrid)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        process_data_no: i32,
        update: &UpdateProcessData,
        usrid: &str,
    ) -> Result<ProcessData, DbError> {
        let updated = sqlx::query_as::<_, ProcessData>(&format!(
            r#"
            UPDATE process_data
            SET fieldname = COALESCE($2, fieldname),
                value = COALESCE($3, value),
                usrid = $4
            WHERE process_data_no = $1
            RETURNING {PD_COLUMNS}
            "#
        ))
        .bind(process_data_no)
        .bind(&update.fieldname)
        .bind(&update.value)
        .bind(usrid)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(DbError::NotFound)
    }
}
