//! Case endpoints: intake, listings, and the per-case step views.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use caseflow_core::intake;
use caseflow_db::{Case, InsertCase, Step};

use crate::auth::AuthUser;
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};
use crate::routes::visible_case;

/// Body of `POST /cases/`.
#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    pub client_id: String,
    pub client_type: String,
    pub process_type_no: i32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cases/", post(create_case))
        .route("/cases", get(list_cases))
        .route("/cases/:caseno", get(read_case))
        .route("/cases/:caseno/current-step", get(current_step))
        .route("/cases/:caseno/steps", get(case_steps))
}

/// POST /cases/
///
/// Opens the case and, in the same transaction, its initial process and
/// busy step on the active definition's start task.
async fn create_case(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateCaseRequest>,
) -> ApiResult<(StatusCode, Json<Case>)> {
    let insert = InsertCase {
        client_id: req.client_id,
        client_type: req.client_type,
    };

    let intake = intake::open_case(
        &state.db.pool,
        &insert,
        req.process_type_no,
        &user.username,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(intake.case)))
}

/// GET /cases
async fn list_cases(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Case>>> {
    let cases = if user.is_admin() {
        state.db.cases.find_all().await?
    } else {
        state.db.cases.find_by_owner(&user.username).await?
    };

    Ok(Json(cases))
}

/// GET /cases/{caseno}
async fn read_case(
    State(state): State<AppState>,
    user: AuthUser,
    Path(caseno): Path<i32>,
) -> ApiResult<Json<Case>> {
    let case = visible_case(&state, &user, caseno).await?;
    Ok(Json(case))
}

/// GET /cases/{caseno}/current-step
///
/// The latest busy step of the case; 404 when nothing is busy (the case's
/// processes have all completed).
async fn current_step(
    State(state): State<AppState>,
    user: AuthUser,
    Path(caseno): Path<i32>,
) -> ApiResult<Json<Step>> {
    let case = visible_case(&state, &user, caseno).await?;

    let step = state
        .db
        .steps
        .current_for_case(case.caseno)
        .await?
        .ok_or_else(|| ApiError::NotFound("No busy step found for case".to_string()))?;

    Ok(Json(step))
}

/// GET /cases/{caseno}/steps
async fn case_steps(
    State(state): State<AppState>,
    user: AuthUser,
    Path(caseno): Path<i32>,
) -> ApiResult<Json<Vec<Step>>> {
    let case = visible_case(&state, &user, caseno).await?;
    let steps = state.db.steps.find_by_case(case.caseno).await?;
    Ok(Json(steps))
}
