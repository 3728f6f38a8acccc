//! Definition-catalog endpoints.
//!
//! Writes are admin-only everywhere. Reads are admin-only too, except
//! process types and statuses, which any authenticated caller may read
//! (users need them to open cases and interpret step states).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use caseflow_db::{
    InsertProcessDataType, InsertProcessDefinition, InsertProcessType, InsertStatus, InsertTask,
    InsertTaskRule, ProcessDataType, ProcessDefinition, ProcessType, Status, Task, TaskRule,
    UpdateProcessDataType, UpdateProcessDefinition, UpdateProcessType, UpdateStatus, UpdateTask,
    UpdateTaskRule,
};

use crate::auth::AuthUser;
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/process-types", get(list_process_types))
        .route("/process-types/:process_type_no", get(get_process_type).put(update_process_type))
        .route("/process-types/", post(create_process_type))
        .route("/process-definitions", get(list_process_definitions))
        .route(
            "/process-definitions/:process_definition_no",
            get(get_process_definition).put(update_process_definition),
        )
        .route("/process-definitions/", post(create_process_definition))
        .route("/tasks", get(list_tasks))
        .route("/tasks/:taskno", get(get_task).put(update_task))
        .route("/tasks/", post(create_task))
        .route("/task-rules", get(list_task_rules))
        .route("/task-rules/:taskruleno", get(get_task_rule).put(update_task_rule))
        .route("/task-rules/", post(create_task_rule))
        .route("/process-data-types", get(list_process_data_types))
        .route(
            "/process-data-types/:process_data_type_no",
            get(get_process_data_type).put(update_process_data_type),
        )
        .route("/process-data-types/", post(create_process_data_type))
        .route("/statuses", get(list_statuses))
        .route("/statuses/:statusno", get(get_status).put(update_status))
        .route("/statuses/", post(create_status))
}

// ── Process types ──

/// GET /process-types (any authenticated user)
async fn list_process_types(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<ProcessType>>> {
    Ok(Json(state.db.process_types.find_all().await?))
}

/// GET /process-types/{process_type_no} (any authenticated user)
async fn get_process_type(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(process_type_no): Path<i32>,
) -> ApiResult<Json<ProcessType>> {
    let pt = state
        .db
        .process_types
        .find_by_id(process_type_no)
        .await?
        .ok_or_else(|| ApiError::NotFound("Process type not found".to_string()))?;
    Ok(Json(pt))
}

/// POST /process-types/
async fn create_process_type(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<InsertProcessType>,
) -> ApiResult<Json<ProcessType>> {
    user.require_admin()?;
    Ok(Json(
        state.db.process_types.create(&req, &user.username).await?,
    ))
}

/// PUT /process-types/{process_type_no}
async fn update_process_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(process_type_no): Path<i32>,
    Json(req): Json<UpdateProcessType>,
) -> ApiResult<Json<ProcessType>> {
    user.require_admin()?;
    let updated = state
        .db
        .process_types
        .update(process_type_no, &req, &user.username)
        .await
        .map_err(|err| not_found_or(err, "Process type not found"))?;
    Ok(Json(updated))
}

// ── Process definitions ──

/// GET /process-definitions
async fn list_process_definitions(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ProcessDefinition>>> {
    user.require_admin()?;
    Ok(Json(state.db.process_definitions.find_all().await?))
}

/// GET /process-definitions/{process_definition_no}
async fn get_process_definition(
    State(state): State<AppState>,
    user: AuthUser,
    Path(process_definition_no): Path<i32>,
) -> ApiResult<Json<ProcessDefinition>> {
    user.require_admin()?;
    let pd = state
        .db
        .process_definitions
        .find_by_id(process_definition_no)
        .await?
        .ok_or_else(|| ApiError::NotFound("Process definition not found".to_string()))?;
    Ok(Json(pd))
}

/// POST /process-definitions/
///
/// Also materializes the start task (from `start_task_description`) and a
/// self-looping `default` rule for it, in one transaction.
async fn create_process_definition(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<InsertProcessDefinition>,
) -> ApiResult<Json<ProcessDefinition>> {
    user.require_admin()?;
    Ok(Json(
        state
            .db
            .process_definitions
            .create(&req, &user.username)
            .await?,
    ))
}

/// PUT /process-definitions/{process_definition_no}
async fn update_process_definition(
    State(state): State<AppState>,
    user: AuthUser,
    Path(process_definition_no): Path<i32>,
    Json(req): Json<UpdateProcessDefinition>,
) -> ApiResult<Json<ProcessDefinition>> {
    user.require_admin()?;
    let updated = state
        .db
        .process_definitions
        .update(process_definition_no, &req, &user.username)
        .await
        .map_err(|err| not_found_or(err, "Process definition not found"))?;
    Ok(Json(updated))
}

// ── Tasks ──

/// GET /tasks
async fn list_tasks(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Task>>> {
    user.require_admin()?;
    Ok(Json(state.db.tasks.find_all().await?))
}

/// GET /tasks/{taskno}
async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(taskno): Path<i32>,
) -> ApiResult<Json<Task>> {
    user.require_admin()?;
    let task = state
        .db
        .tasks
        .find_by_id(taskno)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    Ok(Json(task))
}

/// POST /tasks/
async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<InsertTask>,
) -> ApiResult<Json<Task>> {
    user.require_admin()?;
    Ok(Json(state.db.tasks.create(&req, &user.username).await?))
}

/// PUT /tasks/{taskno}
async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(taskno): Path<i32>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    user.require_admin()?;
    let updated = state
        .db
        .tasks
        .update(taskno, &req, &user.username)
        .await
        .map_err(|err| not_found_or(err, "Task not found"))?;
    Ok(Json(updated))
}

// ── Task rules ──

/// GET /task-rules
async fn list_task_rules(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<TaskRule>>> {
    user.require_admin()?;
    Ok(Json(state.db.task_rules.find_all().await?))
}

/// GET /task-rules/{taskruleno}
async fn get_task_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(taskruleno): Path<i32>,
) -> ApiResult<Json<TaskRule>> {
    user.require_admin()?;
    let rule = state
        .db
        .task_rules
        .find_by_id(taskruleno)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task rule not found".to_string()))?;
    Ok(Json(rule))
}

/// POST /task-rules/
async fn create_task_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<InsertTaskRule>,
) -> ApiResult<Json<TaskRule>> {
    user.require_admin()?;
    Ok(Json(state.db.task_rules.create(&req, &user.username).await?))
}

/// PUT /task-rules/{taskruleno}
async fn update_task_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(taskruleno): Path<i32>,
    Json(req): Json<UpdateTaskRule>,
) -> ApiResult<Json<TaskRule>> {
    user.require_admin()?;
    let updated = state
        .db
        .task_rules
        .update(taskruleno, &req, &user.username)
        .await
        .map_err(|err| not_found_or(err, "Task rule not found"))?;
    Ok(Json(updated))
}

// ── Process data types ──

/// GET /process-data-types
async fn list_process_data_types(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ProcessDataType>>> {
    user.require_admin()?;
    Ok(Json(state.db.process_data_types.find_all().await?))
}

/// GET /process-data-types/{process_data_type_no}
async fn get_process_data_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(process_data_type_no): Path<i32>,
) -> ApiResult<Json<ProcessDataType>> {
    user.require_admin()?;
    let pdt = state
        .db
        .process_data_types
        .find_by_id(process_data_type_no)
        .await?
        .ok_or_else(|| ApiError::NotFound("Process data type not found".to_string()))?;
    Ok(Json(pdt))
}

/// POST /process-data-types/
async fn create_process_data_type(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<InsertProcessDataType>,
) -> ApiResult<Json<ProcessDataType>> {
    user.require_admin()?;
    Ok(Json(
        state
            .db
            .process_data_types
            .create(&req, &user.username)
            .await?,
    ))
}

/// PUT /process-data-types/{process_data_type_no}
async fn update_process_data_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(process_data_type_no): Path<i32>,
    Json(req): Json<UpdateProcessDataType>,
) -> ApiResult<Json<ProcessDataType>> {
    user.require_admin()?;
    let updated = state
        .db
        .process_data_types
        .update(process_data_type_no, &req, &user.username)
        .await
        .map_err(|err| not_found_or(err, "Process data type not found"))?;
    Ok(Json(updated))
}

// ── Statuses ──

/// GET /statuses (any authenticated user)
async fn list_statuses(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<Status>>> {
    Ok(Json(state.db.statuses.find_all().await?))
}

/// GET /statuses/{statusno} (any authenticated user)
async fn get_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(statusno): Path<i32>,
) -> ApiResult<Json<Status>> {
    let status = state
        .db
        .statuses
        .find_by_id(statusno)
        .await?
        .ok_or_else(|| ApiError::NotFound("Status not found".to_string()))?;
    Ok(Json(status))
}

/// POST /statuses/
async fn create_status(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<InsertStatus>,
) -> ApiResult<(StatusCode, Json<Status>)> {
    user.require_admin()?;
    let created = state
        .db
        .statuses
        .create(&req.description, &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /statuses/{statusno}
async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(statusno): Path<i32>,
    Json(req): Json<UpdateStatus>,
) -> ApiResult<Json<Status>> {
    user.require_admin()?;
    let updated = state
        .db
        .statuses
        .update(statusno, &req, &user.username)
        .await
        .map_err(|err| not_found_or(err, "Status not found"))?;
    Ok(Json(updated))
}

/// Turn a repository `NotFound` into a resource-specific 404 message.
fn not_found_or(err: caseflow_db::DbError, detail: &str) -> ApiError {
    if err.is_not_found() {
        ApiError::NotFound(detail.to_string())
    } else {
        err.into()
    }
}
