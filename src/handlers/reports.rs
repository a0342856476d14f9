use axum::extract::{rejection::JsonRejection, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app::AppState;
use crate::database::models::{Report, ReportPayload, Written};
use crate::error::{ApiError, ApiResult};

// The project id in the path always wins over any `project_id` in a body.

/// POST /projects/:project_id/reports - File a report under a project
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Written<Report>>)> {
    let Json(payload) = payload?;
    let created = state.service.create_report(&project_id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /projects/:project_id/reports - List a project's reports
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<Report>>> {
    let reports = state.service.get_reports(&project_id).await?;
    Ok(Json(reports))
}

/// GET /projects/:project_id/reports/:id
pub async fn get(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(String, String)>,
) -> ApiResult<Json<Report>> {
    let report = state
        .service
        .get_report_by_id(&project_id, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Report {} not found in project {}", id, project_id)))?;
    Ok(Json(report))
}

/// PUT /projects/:project_id/reports/:id
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(String, String)>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> ApiResult<Json<Written<Report>>> {
    let Json(payload) = payload?;
    let updated = state.service.update_report(&id, &project_id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /projects/:project_id/reports/:id
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state.service.delete_report(&id, &project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /reports/keywords/:keyword - Reports repeating a keyword three or more times
pub async fn by_keyword(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> ApiResult<Json<Vec<Report>>> {
    let reports = state.service.find_by_repeated_keyword(&keyword).await?;
    Ok(Json(reports))
}

/// GET /reports/keywords/ - The empty keyword, answered with a validation error
pub async fn by_empty_keyword(State(state): State<AppState>) -> ApiResult<Json<Vec<Report>>> {
    let reports = state.service.find_by_repeated_keyword("").await?;
    Ok(Json(reports))
}
