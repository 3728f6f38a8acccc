//! Process-definition repository.
//!
//! Creating a definition also materializes its start task and a
//! self-looping `default` rule for that task, in one transaction.

use sqlx::PgPool;

use crate::entities::{
    InsertProcessDefinition, ProcessDefinition, Task, UpdateProcessDefinition,
};
use crate::error::DbError;

const COLUMNS: &str =
    "process_definition_no, process_type_no, start_task_no, version, is_active, tmstamp, usrid";

const TASK_COLUMNS: &str = "taskno, process_definition_no, description, reference, tmstamp, usrid";

/// Repository for process-definition rows.
#[derive(Clone)]
pub struct ProcessDefinitionRepository {
    pool: PgPool,
}

impl ProcessDefinitionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(
        &self,
        process_definition_no: i32,
    ) -> Result<Option<ProcessDefinition>, DbError> {
        let pd = sqlx::query_as::<_, ProcessDefinition>(&format!(
            "SELECT {COLUMNS} FROM process_definitions WHERE process_definition_no = $1"
        ))
        .bind(process_definition_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pd)
    }

    pub async fn find_all(&self) -> Result<Vec<ProcessDefinition>, DbError> {
        let defs = sqlx::query_as::<_, ProcessDefinition>(&format!(
            "SELECT {COLUMNS} FROM process_definitions ORDER BY process_definition_no"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(defs)
    }

    /// The active definition for a process type, if any.
    pub async fn find_active_for_type(
        &self,
        process_type_no: i32,
    ) -> Result<Option<ProcessDefinition>, DbError> {
        let pd = sqlx::query_as::<_, ProcessDefinition>(&format!(
            r#"
            SELECT {COLUMNS} FROM process_definitions
            WHERE process_type_no = $1 AND is_active
            ORDER BY process_definition_no
            LIMIT 1
            "#
        ))
        .bind(process_type_no)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pd)
    }

    /// Create a definition together with its start task.
    ///
    /// The start task gets a `default` rule pointing back at itself - a
    /// placeholder administrators overwrite when they wire up the real
    /// workflow graph. Until then, closing a step on the start task loops.
    pub async fn create(
        &self,
        insert: &InsertProcessDefinition,
        usrid: &str,
    ) -> Result<ProcessDefinition, DbError> {
        let mut tx = self.pool.begin().await?;

        let pd = sqlx::query_as::<_, ProcessDefinition>(&format!(
            r#"
            INSERT INTO process_definitions (process_type_no, start_task_no, version, is_active, usrid)
            VALUES ($1, NULL, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(insert.process_type_no)
        .bind(&insert.version)
        .bind(insert.is_active)
        .bind(usrid)
        .fetch_one(&mut *tx)
        .await?;

        let start_task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (process_definition_no, description, reference, usrid)
            VALUES ($1, $2, '', $3)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(pd.process_definition_no)
        .bind(&insert.start_task_description)
        .bind(usrid)
        .fetch_one(&mut *tx)
        .await?;

        let pd = sqlx::query_as::<_, ProcessDefinition>(&format!(
            r#"
            UPDATE process_definitions
            SET start_task_no = $2
            WHERE process_definition_no = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(pd.process_definition_no)
        .bind(start_task.taskno)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO task_rules (taskno, rule, next_task_no, usrid)
            VALUES ($1, 'default', $1, $2)
            "#,
        )
        .bind(start_task.taskno)
        .bind(usrid)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(pd)
    }

    pub async fn update(
        &self,
        process_definition_no: i32,
        update: &UpdateProcessDefinition,
        usrid: &str,
    ) -> Result<ProcessDefinition, DbError> {
        let updated = sqlx::query_as::<_, ProcessDefinition>(&format!(
            r#"
            UPDATE process_definitions
            SET process_type_no = COALESCE($2, process_type_no),
                start_task_no = COALESCE($3, start_task_no),
                version = COALESCE($4, version),
                is_active = COALESCE($5, is_active),
                usrid = $6
            WHERE process_definition_no = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(process_definition_no)
        .bind(update.process_type_no)
        .bind(update.start_task_no)
        .bind(&update.version)
        .bind(update.is_active)
        .bind(usrid)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(DbError::NotFound)
    }
}
