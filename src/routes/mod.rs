//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api` plus an unauthenticated
//! `/health` probe. CORS origins come from `ALLOWED_ORIGINS`; every request
//! gets a `tower-http` trace span.

pub mod applications;
pub mod auth;
pub mod components;
pub mod pages;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use axum::http::HeaderValue;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Parse a comma-separated origin list. Blank entries and values that are
/// not valid header values are skipped.
pub(crate) fn parse_allowed_origins(raw: Option<&str>) -> Vec<HeaderValue> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Origins from `ALLOWED_ORIGINS`; empty means any origin.
#[must_use]
pub fn allowed_origins_from_env() -> Vec<HeaderValue> {
    parse_allowed_origins(std::env::var("ALLOWED_ORIGINS").ok().as_deref())
}

fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    let allow_origin = if origins.is_empty() { AllowOrigin::from(Any) } else { AllowOrigin::list(origins) };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full application router.
pub fn app(state: AppState, origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/components", get(components::list_components))
        .route(
            "/api/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route(
            "/api/applications/{id}",
            get(applications::get_application)
                .patch(applications::update_application)
                .delete(applications::delete_application),
        )
        .route(
            "/api/applications/{id}/pages",
            get(pages::list_pages).post(pages::create_page),
        )
        .route("/api/applications/{id}/pages/{page_id}", axum::routing::delete(pages::delete_page))
        .route(
            "/api/applications/{id}/pages/{page_id}/document",
            get(pages::get_document).put(pages::put_document),
        )
        .route("/api/applications/{id}/pages/{page_id}/preview", get(pages::preview))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "buildeasy",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
