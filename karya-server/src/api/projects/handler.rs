//! Project API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_required_text,
};
use shared::models::{Project, ProjectCreate};

/// GET /api/projects - 获取全部项目
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(state.catalog().list()))
}

/// GET /api/projects/:id - 获取单个项目
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    let project = state
        .catalog()
        .find_by_id(&id)
        .ok_or_else(|| crate::utils::AppError::not_found(format!("Project {id}")))?;
    Ok(Json(project))
}

/// POST /api/projects - 发布项目 (需登录)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ProjectCreate>,
) -> AppResult<Json<Project>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    if payload.budget == 0 {
        return Err(crate::utils::AppError::validation(
            "budget must be positive",
        ));
    }

    let project = state
        .catalog()
        .insert(payload, current_user.display_name.clone());

    tracing::info!(
        project_id = %project.id,
        client = %current_user.display_name,
        "Project posted"
    );

    Ok(Json(project))
}
