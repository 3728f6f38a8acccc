//! User repository.

use sqlx::PgPool;

use crate::entities::{Role, User};
use crate::error::DbError;

const COLUMNS: &str = "id, username, hashed_password, role, tmstamp, usrid";

/// Repository for user accounts.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.0)
    }

    /// Register a new user.
    ///
    /// The role is decided inside the transaction: the very first account
    /// becomes `admin`, every later one `user`, so two racing first
    /// registrations cannot both bootstrap as admin. Returns
    /// `DbError::DuplicateKey` when the username is taken.
    pub async fn register(
        &self,
        username: &str,
        hashed_password: &str,
        creator: &str,
    ) -> Result<User, DbError> {
        let mut tx = self.pool.begin().await?;

        // Serialize concurrent registrations so the COUNT is stable.
        sqlx::query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        let role = if total == 0 { Role::Admin } else { Role::User };

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, hashed_password, role, usrid)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(username)
        .bind(hashed_password)
        .bind(role.as_str())
        .bind(creator)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }
}
