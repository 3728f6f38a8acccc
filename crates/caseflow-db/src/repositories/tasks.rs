//! Task repository.

use sqlx::PgPool;

use crate::entities::{InsertTask, Task, UpdateTask};
use crate::error::DbError;

const COLUMNS: &str = "taskno, process_definition_no, description, reference, tmstamp, usrid";

/// Repository for task rows.
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, taskno: i32) -> Result<Option<Task>, DbError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {COLUMNS} FROM tasks WHERE taskno = $1"
        ))
        .bind(taskno)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn find_all(&self) -> Result<Vec<Task>, DbError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {COLUMNS} FROM tasks ORDER BY taskno"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn create(&self, insert: &InsertTask, usrid: &str) -> Result<Task, DbError> {
        let created = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (process_definition_no, description, reference, usrid)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(insert.process_definition_no)
        .bind(&insert.description)
        .bind(&insert.reference)
        .bind(usrid)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        taskno: i32,
        update: &UpdateTask,
        usrid: &str,
    ) -> Result<Task, DbError> {
        let updated = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET process_definition_no = COALESCE($2, process_definition_no),
                description = COALESCE($3, description),
                reference = COALESCE($4, reference),
                usrid = $5
            WHERE taskno = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(taskno)
        .bind(update.process_definition_no)
        .bind(&update.description)
        .bind(&update.reference)
        .bind(usrid)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(DbError::NotFound)
    }
}
