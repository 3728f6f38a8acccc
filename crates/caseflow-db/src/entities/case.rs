//! Case entity - a business file initiated by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A case owns one or more processes. `usrid` is the owning user; all
/// ownership checks compare against it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Case {
    /// Primary key.
    pub caseno: i32,

    /// External client identifier.
    pub client_id: String,

    /// Kind of client (free text, e.g. "person", "company").
    pub client_type: String,

    pub date_created: DateTime<Utc>,

    pub tmstamp: DateTime<Utc>,

    /// Owning user.
    pub usrid: String,
}

/// Insert parameters for creating a case.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertCase {
    pub client_id: String,
    pub client_type: String,
}
