//! Component catalog route.

use axum::response::Json;
use builder::registry::{self, ComponentDefinition};
use serde::Serialize;

use crate::routes::auth::Identity;

#[derive(Serialize)]
pub struct CategoryResponse {
    pub category: &'static str,
    pub components: Vec<&'static ComponentDefinition>,
}

/// Registry grouped by category, in palette order.
#[must_use]
pub fn catalog() -> Vec<CategoryResponse> {
    registry::by_category()
        .into_iter()
        .map(|(category, components)| CategoryResponse { category, components })
        .collect()
}

/// `GET /api/components` — the component palette.
pub async fn list_components(_identity: Identity) -> Json<Vec<CategoryResponse>> {
    Json(catalog())
}
