//! Process-data listings and updates, ownership-filtered.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};

use caseflow_db::{ProcessData, UpdateProcessData};

use crate::auth::AuthUser;
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/process-data", get(list_process_data))
        .route("/process-data/:process_data_no", put(update_process_data))
        .route("/cases/:caseno/process-data", get(list_process_data_for_case))
}

/// GET /process-data
async fn list_process_data(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ProcessData>>> {
    let data = if user.is_admin() {
        state.db.process_data.find_all().await?
    } else {
        state.db.process_data.find_for_owner(&user.username).await?
    };

    Ok(Json(data))
}

/// GET /cases/{caseno}/process-data
///
/// Non-admins only see rows of cases they own; a foreign case yields an
/// empty list rather than revealing anything.
async fn list_process_data_for_case(
    State(state): State<AppState>,
    user: AuthUser,
    Path(caseno): Path<i32>,
) -> ApiResult<Json<Vec<ProcessData>>> {
    let data = if user.is_admin() {
        state.db.process_data.find_for_case(caseno).await?
    } else {
        state
            .db
            .process_data
            .find_for_case_and_owner(caseno, &user.username)
            .await?
    };

    Ok(Json(data))
}

/// PUT /process-data/{process_data_no}
async fn update_process_data(
    State(state): State<AppState>,
    user: AuthUser,
    Path(process_data_no): Path<i32>,
    Json(req): Json<UpdateProcessData>,
) -> ApiResult<Json<ProcessData>> {
    let owner = if user.is_admin() {
        None
    } else {
        Some(user.username.as_str())
    };

    state
        .db
        .process_data
        .find_by_id_scoped(process_data_no, owner)
        .await?
        .ok_or_else(|| ApiError::NotFound("Process data not found".to_string()))?;

    let updated = state
        .db
        .process_data
        .update(process_data_no, &req, &user.username)
        .await?;

    Ok(Json(updated))
}
