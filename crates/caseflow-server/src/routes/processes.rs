//! Process endpoints: admin inspection and attaching process data.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use caseflow_db::{InsertProcessData, Process, ProcessData};

use crate::auth::AuthUser;
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/processes", get(list_processes))
        .route("/processes/:processno/data/", post(create_process_data))
}

/// GET /processes
async fn list_processes(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Process>>> {
    user.require_admin()?;
    let processes = state.db.processes.find_all().await?;
    Ok(Json(processes))
}

/// POST /processes/{processno}/data/
///
/// Attach a datum to a process. Owners and admins only; the new value is
/// what subsequent rule evaluations will see for its (type, fieldname).
async fn create_process_data(
    State(state): State<AppState>,
    user: AuthUser,
    Path(processno): Path<i32>,
    Json(req): Json<InsertProcessData>,
) -> ApiResult<(StatusCode, Json<ProcessData>)> {
    let process = state
        .db
        .processes
        .find_by_id(processno)
        .await?
        .ok_or_else(|| ApiError::NotFound("Process not found".to_string()))?;

    if !user.is_admin() {
        let case = state
            .db
            .cases
            .find_by_id(process.case_no)
            .await?
            .ok_or_else(|| ApiError::NotFound("Case not found".to_string()))?;
        if case.usrid != user.username {
            return Err(ApiError::Forbidden);
        }
    }

    let created = state
        .db
        .process_data
        .create(process.processno, &req, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
