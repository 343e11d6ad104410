//! Authentication Handlers
//!
//! Thin delegation to the external identity provider; no credentials are
//! stored or verified locally.

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppError;
use crate::utils::validation::{MAX_EMAIL_LEN, MIN_PASSWORD_LEN, validate_required_text};
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, User};

/// POST /api/auth/register - 注册
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<User>, AppError> {
    validate_required_text(&req.email, "email", MAX_EMAIL_LEN)?;
    if !req.email.contains('@') {
        return Err(AppError::validation("email is not valid"));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let user = state.auth_provider().sign_up(&req).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(user))
}

/// POST /api/auth/login - 登录
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = state
        .auth_provider()
        .sign_in(&req.email, &req.password)
        .await
        .map_err(|e| {
            tracing::warn!(email = %req.email, "Login failed");
            AppError::from(e)
        })?;

    Ok(Json(session))
}

/// GET /api/auth/me - 当前用户
pub async fn me(current_user: CurrentUser) -> Json<CurrentUser> {
    Json(current_user)
}
