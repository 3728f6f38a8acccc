//! Process repository.

use sqlx::PgPool;

use crate::entities::Process;
use crate::error::DbError;

const PROCESS_COLUMNS: &str =
    "processno, case_no, process_type_no, status_no, date_started, date_ended, tmstamp, usrid";

/// Repository for process rows.
#[derive(Clone)]
pub struct ProcessRepository {
    pool: PgPool,
}

impl ProcessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, processno: i32) -> Result<Option<Process>, DbError> {
        let process = sqlx::query_as::<_, Process>(&format!(
            "SELECT {PROCESS_COLUMNS} FROM processes WHERE processno = $1"
        ))
        .bind(processno)
        .fetch_optional(&self.pool)
        .await?;

        Ok(process)
    }

    /// List all processes (admin inspection).
    pub async fn find_all(&self) -> Result<Vec<Process>, DbError> {
        let processes = sqlx::query_as::<_, Process>(&format!(
            "SELECT {PROCESS_COLUMNS} FROM processes ORDER BY processno"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(processes)
    }

    pub async fn find_by_case(&self, case_no: i32) -> Result<Vec<Process>, DbError> {
        let processes = sqlx::query_as::<_, Process>(&format!(
            "SELECT {PROCESS_COLUMNS} FROM processes WHERE case_no = $1 ORDER BY processno"
        ))
        .bind(case_no)
        .fetch_all(&self.pool)
        .await?;

        Ok(processes)
    }
}
