//! HTTP route handlers.
//!
//! One module per resource, mirroring the API surface: auth, cases, steps,
//! processes, process data, and the definition catalog.

pub mod auth;
pub mod cases;
pub mod catalog;
pub mod process_data;
pub mod processes;
pub mod steps;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use caseflow_db::Case;

use crate::auth::AuthUser;
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(cases::router())
        .merge(steps::router())
        .merge(processes::router())
        .merge(process_data::router())
        .merge(catalog::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load a case the caller is allowed to see.
///
/// Non-admins get 404 for other users' cases, so reads do not reveal that
/// a case exists at all.
pub(crate) async fn visible_case(
    state: &AppState,
    user: &AuthUser,
    caseno: i32,
) -> ApiResult<Case> {
    let case = state
        .db
        .cases
        .find_by_id(caseno)
        .await?
        .ok_or_else(|| ApiError::NotFound("Case not found".to_string()))?;

    if !user.is_admin() && case.usrid != user.username {
        return Err(ApiError::NotFound("Case not found".to_string()));
    }

    Ok(case)
}
