//! Step entity - the audit trail of task executions within a process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A historical record that a task of a process was entered (`busy`) and
/// later closed (`complete`).
///
/// Steps transition `busy -> complete` exactly once, via the step advancer.
/// Closed steps are immutable. While a process is not complete, exactly one
/// of its steps is busy - the *current* step.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Step {
    /// Primary key.
    pub stepno: i32,

    /// Owning process.
    pub processno: i32,

    /// The task this step executes.
    pub taskno: i32,

    pub status_no: i32,

    pub date_started: DateTime<Utc>,

    /// Set exactly once, when the step is closed.
    #[sqlx(default)]
    pub date_ended: Option<DateTime<Utc>>,

    pub tmstamp: DateTime<Utc>,

    /// User that opened the step (the caller that closed the previous one).
    pub usrid: String,
}

impl Step {
    /// Whether the step has been closed.
    pub fn is_ended(&self) -> bool {
        self.date_ended.is_some()
    }
}
