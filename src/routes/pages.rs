//! Page routes: page list, layout documents, and HTML preview.

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use builder::document::Document;
use builder::render;
use uuid::Uuid;

use crate::routes::auth::Identity;
use crate::services::page::{self, NewPage, PageError, PageRow};
use crate::state::AppState;

pub(crate) fn page_error_to_status(err: PageError) -> StatusCode {
    match err {
        PageError::ApplicationNotFound(_) | PageError::NotFound(_) => StatusCode::NOT_FOUND,
        PageError::Conflict(_) => StatusCode::CONFLICT,
        PageError::Invalid(_) | PageError::InvalidDocument(_) => StatusCode::BAD_REQUEST,
        PageError::Database(e) => {
            tracing::error!(error = %e, "page query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Standalone preview page for a document.
pub(crate) fn preview_html(doc: &Document) -> String {
    let title = if doc.application_name.is_empty() { "Preview" } else { doc.application_name.as_str() };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <script src=\"https://cdn.tailwindcss.com\"></script>\n</head>\n<body class=\"p-6\">\n{}\n</body>\n</html>\n",
        render::escape(title),
        render::render_page(&doc.components),
    )
}

/// `GET /api/applications/:id/pages` — pages in display order.
pub async fn list_pages(
    State(state): State<AppState>,
    identity: Identity,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Vec<PageRow>>, StatusCode> {
    let rows = page::list_pages(&state.pool, identity.organization_id, application_id)
        .await
        .map_err(page_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/applications/:id/pages` — append a page.
pub async fn create_page(
    State(state): State<AppState>,
    identity: Identity,
    Path(application_id): Path<Uuid>,
    Json(body): Json<NewPage>,
) -> Result<(StatusCode, Json<PageRow>), StatusCode> {
    let row = page::create_page(&state.pool, identity.organization_id, application_id, &body)
        .await
        .map_err(page_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `DELETE /api/applications/:id/pages/:page_id` — delete a page.
pub async fn delete_page(
    State(state): State<AppState>,
    identity: Identity,
    Path((application_id, page_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    page::delete_page(&state.pool, identity.organization_id, application_id, page_id)
        .await
        .map_err(page_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `GET /api/applications/:id/pages/:page_id/document` — the page layout.
pub async fn get_document(
    State(state): State<AppState>,
    identity: Identity,
    Path((application_id, page_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Document>, StatusCode> {
    let doc = page::load_document(&state.pool, identity.organization_id, application_id, page_id)
        .await
        .map_err(page_error_to_status)?;
    Ok(Json(doc))
}

/// `PUT /api/applications/:id/pages/:page_id/document` — save the page layout.
///
/// The body must be an object with a `components` array of instances; any
/// other document metadata in it is ignored.
pub async fn put_document(
    State(state): State<AppState>,
    identity: Identity,
    Path((application_id, page_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let saved = page::save_document(&state.pool, identity.organization_id, application_id, page_id, &body)
        .await
        .map_err(|e| {
            if let PageError::InvalidDocument(issue) = &e {
                tracing::warn!(%application_id, %page_id, %issue, "rejected page document");
            }
            page_error_to_status(e)
        })?;
    Ok(Json(serde_json::json!({ "ok": true, "components": saved })))
}

/// `GET /api/applications/:id/pages/:page_id/preview` — rendered HTML.
pub async fn preview(
    State(state): State<AppState>,
    identity: Identity,
    Path((application_id, page_id)): Path<(Uuid, Uuid)>,
) -> Result<Html<String>, StatusCode> {
    let doc = page::load_document(&state.pool, identity.organization_id, application_id, page_id)
        .await
        .map_err(page_error_to_status)?;
    Ok(Html(preview_html(&doc)))
}
