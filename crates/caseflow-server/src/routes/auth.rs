//! Auth endpoints: token issuance, registration, current user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{self, AuthUser, OptionalAuthUser};
use crate::config::AppState;
use crate::error::{ApiError, ApiResult};

/// Form body of `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Body of `POST /auth/register`. A caller-supplied role is ignored: the
/// first registered user becomes admin, everyone after that a plain user.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(login_for_access_token))
        .route("/auth/register", post(register_user))
        .route("/auth/me", get(read_current_user))
}

/// POST /auth/token
async fn login_for_access_token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state.db.users.find_by_username(&form.username).await?;

    let user = match user {
        Some(user) if auth::verify_password(&form.password, &user.hashed_password) => user,
        _ => {
            return Err(ApiError::Unauthorized(
                "Incorrect username or password".to_string(),
            ))
        }
    };

    let access_token = state.jwt.create_access_token(&user.username)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// POST /auth/register
async fn register_user(
    State(state): State<AppState>,
    OptionalAuthUser(current): OptionalAuthUser,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    if state
        .db
        .users
        .find_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let hashed = auth::hash_password(&req.password)?;

    // usrid is the logged-in username if present, otherwise "system".
    let creator = current
        .map(|user| user.username)
        .unwrap_or_else(|| "system".to_string());

    let created = state
        .db
        .users
        .register(&req.username, &hashed, &creator)
        .await
        .map_err(|err| {
            if err.is_duplicate() {
                ApiError::Conflict("Username already exists".to_string())
            } else {
                err.into()
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: created.id,
            username: created.username,
            role: created.role,
        }),
    ))
}

/// GET /auth/me
async fn read_current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let db_user = state
        .db
        .users
        .find_by_username(&user.username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        id: db_user.id,
        username: db_user.username,
        role: db_user.role,
    }))
}
