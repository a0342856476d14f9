use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::models::{Project, ProjectPayload, Written};
use crate::error::{ApiError, ApiResult};

/// POST /projects - Create a project
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Written<Project>>)> {
    let Json(payload) = payload?;
    let created = state.service.create_project(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /projects - List all projects
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.service.get_projects().await?;
    Ok(Json(projects))
}

/// GET /projects/:project_id - Get a single project
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Project>> {
    let project = state
        .service
        .get_project_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Project {} not found", id)))?;
    Ok(Json(project))
}

/// PUT /projects/:project_id - Replace a project's name and description
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> ApiResult<Json<Written<Project>>> {
    let Json(payload) = payload?;
    let updated = state.service.update_project(&id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /projects/:project_id - Delete a project (its reports are kept)
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.service.delete_project(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
