//! Application CRUD routes.

#[cfg(test)]
#[path = "applications_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::routes::auth::Identity;
use crate::services::application::{self, ApplicationError, ApplicationPatch, ApplicationRow, NewApplication};
use crate::state::AppState;

pub(crate) fn application_error_to_status(err: ApplicationError) -> StatusCode {
    match err {
        ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
        ApplicationError::Conflict(_) => StatusCode::CONFLICT,
        ApplicationError::Invalid(_) => StatusCode::BAD_REQUEST,
        ApplicationError::Database(e) => {
            tracing::error!(error = %e, "application query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/applications` — the caller's organization's applications.
pub async fn list_applications(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<ApplicationRow>>, StatusCode> {
    let rows = application::list_applications(&state.pool, identity.organization_id)
        .await
        .map_err(application_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/applications` — create an application in `draft` status.
pub async fn create_application(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<NewApplication>,
) -> Result<(StatusCode, Json<ApplicationRow>), StatusCode> {
    let row = application::create_application(&state.pool, identity.organization_id, identity.user_id, &body)
        .await
        .map_err(application_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/applications/:id` — fetch one application.
pub async fn get_application(
    State(state): State<AppState>,
    identity: Identity,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, StatusCode> {
    let row = application::get_application(&state.pool, identity.organization_id, application_id)
        .await
        .map_err(application_error_to_status)?;
    Ok(Json(row))
}

/// `PATCH /api/applications/:id` — partial update.
pub async fn update_application(
    State(state): State<AppState>,
    identity: Identity,
    Path(application_id): Path<Uuid>,
    Json(body): Json<ApplicationPatch>,
) -> Result<Json<ApplicationRow>, StatusCode> {
    let row = application::update_application(&state.pool, identity.organization_id, application_id, &body)
        .await
        .map_err(application_error_to_status)?;
    Ok(Json(row))
}

/// `DELETE /api/applications/:id` — delete with its pages.
pub async fn delete_application(
    State(state): State<AppState>,
    identity: Identity,
    Path(application_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    application::delete_application(&state.pool, identity.organization_id, application_id)
        .await
        .map_err(application_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
