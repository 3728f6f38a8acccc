//! Definition-catalog entities: statuses, process types, process
//! definitions, tasks, task rules and process-data types.
//!
//! These are read-mostly: mutated only by administrators, read by the
//! engine on every advancement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named state used by processes and steps.
///
/// `busy` and `complete` must exist; the engine resolves them by
/// case-insensitive description lookup at run time, never by number.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Status {
    pub statusno: i32,
    pub description: String,
    pub tmstamp: DateTime<Utc>,
    pub usrid: String,
}

/// Insert parameters for a status.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertStatus {
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatus {
    pub description: Option<String>,
}

/// A category of business process (e.g. "onboarding").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessType {
    pub process_type_no: i32,
    pub description: String,
    pub tmstamp: DateTime<Utc>,
    pub usrid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertProcessType {
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProcessType {
    pub description: Option<String>,
}

/// A versioned template describing which task starts a process of a given
/// type. Only active definitions are eligible when a case is opened.
///
/// `start_task_no` is null for the instant between inserting the definition
/// and materializing its start task; both happen in one transaction, so a
/// committed definition always has a start task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessDefinition {
    pub process_definition_no: i32,
    pub process_type_no: i32,
    #[sqlx(default)]
    pub start_task_no: Option<i32>,
    pub version: String,
    pub is_active: bool,
    pub tmstamp: DateTime<Utc>,
    pub usrid: String,
}

/// Insert parameters for a process definition.
///
/// Clients do not supply `start_task_no`; the start task is created
/// server-side from `start_task_description` and wired up along with a
/// self-looping `default` rule that administrators overwrite later.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertProcessDefinition {
    pub process_type_no: i32,
    pub version: String,
    pub is_active: bool,
    pub start_task_description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProcessDefinition {
    pub process_type_no: Option<i32>,
    pub start_task_no: Option<i32>,
    pub version: Option<String>,
    pub is_active: Option<bool>,
}

/// A node in the workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub taskno: i32,
    pub process_definition_no: i32,
    pub description: String,
    #[sqlx(default)]
    pub reference: Option<String>,
    pub tmstamp: DateTime<Utc>,
    pub usrid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertTask {
    pub process_definition_no: i32,
    pub description: String,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub process_definition_no: Option<i32>,
    pub description: Option<String>,
    pub reference: Option<String>,
}

/// A directed edge out of a task.
///
/// `rule` is either a boolean expression over process data or the literal
/// `default`, which the advancer uses as fallback. A null `next_task_no`
/// terminates the process when the rule is selected.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskRule {
    pub taskruleno: i32,
    pub taskno: i32,
    pub rule: String,
    #[sqlx(default)]
    pub next_task_no: Option<i32>,
    pub tmstamp: DateTime<Utc>,
    pub usrid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertTaskRule {
    pub taskno: i32,
    pub rule: String,
    #[serde(default)]
    pub next_task_no: Option<i32>,
}

/// Update parameters for a task rule.
///
/// `next_task_no` distinguishes "leave unchanged" (absent) from "set to
/// null" (explicit null), so a rule can be turned into a terminating one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRule {
    #[serde(default, deserialize_with = "double_option")]
    pub next_task_no: Option<Option<i32>>,
}

/// Deserialize a present-but-possibly-null field as `Some(inner)`, so an
/// absent field (the serde default, `None`) stays distinguishable from an
/// explicit null (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// A category of process data (e.g. "amount", "flag").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessDataType {
    pub process_data_type_no: i32,
    pub description: String,
    pub tmstamp: DateTime<Utc>,
    pub usrid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertProcessDataType {
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProcessDataType {
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_task_rule_null_vs_absent() {
        let absent: UpdateTaskRule = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.next_task_no, None);

        let null: UpdateTaskRule = serde_json::from_str(r#"{"next_task_no": null}"#).unwrap();
        assert_eq!(null.next_task_no, Some(None));

        let set: UpdateTaskRule = serde_json::from_str(r#"{"next_task_no": 7}"#).unwrap();
        assert_eq!(set.next_task_no, Some(Some(7)));
    }
}
