//! Step repository - the step ledger.
//!
//! Steps are created and closed exclusively by the advancer in
//! `caseflow-core`; this repository only reads the ledger. Listings sort by
//! `date_started` ascending.

use sqlx::PgPool;

use crate::entities::{Step, STATUS_BUSY};
use crate::error::DbError;

const STEP_COLUMNS: &str =
    "stepno, processno, taskno, status_no, date_started, date_ended, tmstamp, usrid";

/// Repository for step rows.
#[derive(Clone)]
pub struct StepRepository {
    pool: PgPool,
}

impl StepRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, stepno: i32) -> Result<Option<Step>, DbError> {
        let step = sqlx::query_as::<_, Step>(&format!(
            "SELECT {STEP_COLUMNS} FROM steps WHERE stepno = $1"
        ))
        .bind(stepno)
        .fetch_optional(&self.pool)
        .await?;

        Ok(step)
    }

    /// List all steps (admin scope).
    pub async fn find_all(&self) -> Result<Vec<Step>, DbError> {
        let steps = sqlx::query_as::<_, Step>(&format!(
            "SELECT {STEP_COLUMNS} FROM steps ORDER BY date_started"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(steps)
    }

    /// Step history for a case, oldest first.
    pub async fn find_by_case(&self, case_no: i32) -> Result<Vec<Step>, DbError> {
        let steps = sqlx::query_as::<_, Step>(
            r#"
            SELECT s.stepno, s.processno, s.taskno, s.status_no,
                   s.date_started, s.date_ended, s.tmstamp, s.usrid
            FROM steps s
            JOIN processes p ON s.processno = p.processno
            WHERE p.case_no = $1
            ORDER BY s.date_started
            "#,
        )
        .bind(case_no)
        .fetch_all(&self.pool)
        .await?;

        Ok(steps)
    }

    /// The current step of a case: its latest `busy` step, if any.
    pub async fn current_for_case(&self, case_no: i32) -> Result<Option<Step>, DbError> {
        let step = sqlx::query_as::<_, Step>(
            r#"
            SELECT s.stepno, s.processno, s.taskno, s.status_no,
                   s.date_started, s.date_ended, s.tmstamp, s.usrid
            FROM steps s
            JOIN processes p ON s.processno = p.processno
            JOIN status st ON s.status_no = st.statusno
            WHERE p.case_no = $1 AND LOWER(st.description) = LOWER($2)
            ORDER BY s.stepno DESC
            LIMIT 1
            "#,
        )
        .bind(case_no)
        .bind(STATUS_BUSY)
        .fetch_optional(&self.pool)
        .await?;

        Ok(step)
    }
}
