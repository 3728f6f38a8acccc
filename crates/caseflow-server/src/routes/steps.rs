//! Step endpoints: the ledger listing and the close operation that
//! advances a workflow.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};

use caseflow_db::Step;

use crate::auth::AuthUser;
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};

/// Body of `POST /steps/{step_id}/close`.
///
/// `rule_data` is part of the wire contract but currently unused: the rule
/// evaluator reads the process's stored data. Kept as an extension point.
#[derive(Debug, Deserialize)]
pub struct CloseStepRequest {
    pub rule_data: Map<String, Value>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/steps", get(list_steps))
        .route("/steps/:step_id/close", post(close_step))
}

/// GET /steps
async fn list_steps(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Step>>> {
    user.require_admin()?;
    let steps = state.db.steps.find_all().await?;
    Ok(Json(steps))
}

/// POST /steps/{step_id}/close
///
/// Advance the workflow: close this busy step and open the next one (or
/// complete the process). Non-admins may only close steps of their own
/// cases.
async fn close_step(
    State(state): State<AppState>,
    user: AuthUser,
    Path(step_id): Path<i32>,
    Json(req): Json<CloseStepRequest>,
) -> ApiResult<Json<Step>> {
    if !user.is_admin() {
        let step = state
            .db
            .steps
            .find_by_id(step_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Step not found".to_string()))?;
        let process = state
            .db
            .processes
            .find_by_id(step.processno)
            .await?
            .ok_or_else(|| ApiError::NotFound("Process not found".to_string()))?;
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

    let step = state
        .advancer
        .close_step(step_id, &req.rule_data, &user.username)
        .await?;

    Ok(Json(step))
}
