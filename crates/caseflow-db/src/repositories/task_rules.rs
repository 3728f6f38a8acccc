//! Task-rule repository.
//!
//! Rule order matters: the advancer scans a task's rules in storage order
//! and the first match wins, so listings for a task sort by `taskruleno`.

use sqlx::PgPool;

use crate::entities::{InsertTaskRule, TaskRule, UpdateTaskRule};
use crate::error::DbError;

const COLUMNS: &str = "taskruleno, taskno, rule, next_task_no, tmstamp, usrid";

/// Repository for task-rule rows.
#[derive(Clone)]
pub struct TaskRuleRepository {
    pool: PgPool,
}

impl TaskRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, taskruleno: i32) -> Result<Option<TaskRule>, DbError> {
        let rule = sqlx::query_as::<_, TaskRule>(&format!(
            "SELECT {COLUMNS} FROM task_rules WHERE taskruleno = $1"
        ))
        .bind(taskruleno)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }

    pub async fn find_all(&self) -> Result<Vec<TaskRule>, DbError> {
        let rules = sqlx::query_as::<_, TaskRule>(&format!(
            "SELECT {COLUMNS} FROM task_rules ORDER BY taskruleno"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    /// All rules out of one task, in evaluation order.
    pub async fn find_by_task(&self, taskno: i32) -> Result<Vec<TaskRule>, DbError> {
        let rules = sqlx::query_as::<_, TaskRule>(&format!(
            "SELECT {COLUMNS} FROM task_rules WHERE taskno = $1 ORDER BY taskruleno"
        ))
        .bind(taskno)
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    pub async fn create(&self, insert: &InsertTaskRule, usrid: &str) -> Result<TaskRule, DbError> {
        let created = sqlx::query_as::<_, TaskRule>(&format!(
            r#"
            INSERT INTO task_rules (taskno, rule, next_task_no, usrid)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(insert.taskno)
        .bind(&insert.rule)
        .bind(insert.next_task_no)
        .bind(usrid)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a rule's target. An explicit null turns the rule into a
    /// terminating one; an absent field leaves the target unchanged.
    pub async fn update(
        &self,
        taskruleno: i32,
        update: &UpdateTaskRule,
        usrid: &str,
    ) -> Result<TaskRule, DbError> {
        let updated = match update.next_task_no {
            None => sqlx::query_as::<_, TaskRule>(&format!(
                "UPDATE task_rules SET usrid = $2 WHERE taskruleno = $1 RETURNING {COLUMNS}"
            ))
            .bind(taskruleno)
            .bind(usrid)
            .fetch_optional(&self.pool)
            .await?,
            Some(next_task_no) => sqlx::query_as::<_, TaskRule>(&format!(
                r#"
                UPDATE task_rules
                SET next_task_no = $2, usrid = $3
                WHERE taskruleno = $1
                RETURNING {COLUMNS}
                "#
            ))
            .bind(taskruleno)
            .bind(next_task_no)
            .bind(usrid)
            .fetch_optional(&self.pool)
            .await?,
        };

        updated.ok_or(DbError::NotFound)
    }
}
