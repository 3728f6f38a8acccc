//! Process and process-data entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single execution of a process definition against a case.
///
/// Created `busy`; becomes `complete` when the step advancer selects a
/// terminating rule, at which point `date_ended` is set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Process {
    /// Primary key.
    pub processno: i32,

    /// Owning case.
    pub case_no: i32,

    pub process_type_no: i32,

    pub status_no: i32,

    pub date_started: DateTime<Utc>,

    #[sqlx(default)]
    pub date_ended: Option<DateTime<Utc>>,

    pub tmstamp: DateTime<Utc>,

    pub usrid: String,
}

impl Process {
    /// Whether the process has reached its terminal state.
    pub fn is_ended(&self) -> bool {
        self.date_ended.is_some()
    }
}

/// A typed, named string attached to a process, consulted by task rules.
///
/// Values are untyped strings; the process-data-type description and the
/// fieldname together identify a datum for rule references. When the same
/// (type, fieldname) pair is written more than once, the row with the
/// highest `process_data_no` wins during rule evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessData {
    /// Primary key.
    pub process_data_no: i32,

    pub processno: i32,

    pub process_data_type_no: i32,

    pub fieldname: String,

    pub value: String,

    pub tmstamp: DateTime<Utc>,

    pub usrid: String,
}

/// Insert parameters for attaching data to a process.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertProcessData {
    pub process_data_type_no: i32,
    pub fieldname: String,
    pub value: String,
}

/// Update parameters for process data. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProcessData {
    pub fieldname: Option<String>,
    pub value: Option<String>,
}
