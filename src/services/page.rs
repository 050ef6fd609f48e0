//! Page service: pages of an application and their layout documents.
//!
//! DESIGN
//! ======
//! A page row stores its component tree in the `components` JSONB column.
//! The column is only ever written from a validated `builder::Document`, so
//! loads decode it straight into component instances. Ownership is checked
//! through the parent application's `organization_id` on every query.

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;

use builder::document::{Document, ImportIssue};
use builder::ComponentInstance;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::info;
use uuid::Uuid;

use crate::services::application::is_unique_violation;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("application not found: {0}")]
    ApplicationNotFound(Uuid),
    #[error("page not found: {0}")]
    NotFound(Uuid),
    #[error("page slug already exists: {0}")]
    Conflict(String),
    #[error("invalid page: {0}")]
    Invalid(&'static str),
    #[error("invalid document: {0}")]
    InvalidDocument(#[from] ImportIssue),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Page metadata (no component tree).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub name: String,
    pub slug: String,
    pub route: String,
    pub config: serde_json::Value,
    pub order_index: i32,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

type PageTuple = (Uuid, Uuid, String, String, String, serde_json::Value, i32, i64, i64);

const COLUMNS: &str = "id, application_id, name, slug, route, config, order_index, \
     (extract(epoch from created_at) * 1000)::bigint, \
     (extract(epoch from updated_at) * 1000)::bigint";

impl From<PageTuple> for PageRow {
    fn from(row: PageTuple) -> Self {
        let (id, application_id, name, slug, route, config, order_index, created_at_ms, updated_at_ms) = row;
        Self { id, application_id, name, slug, route, config, order_index, created_at_ms, updated_at_ms }
    }
}

/// Input for [`create_page`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub route: Option<String>,
}

impl NewPage {
    /// Trimmed copy with the route filled in (`/{slug}` when absent or blank).
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Invalid`] when name or slug is blank.
    pub fn validated(&self) -> Result<Self, PageError> {
        let name = self.name.trim();
        let slug = self.slug.trim();
        if name.is_empty() || slug.is_empty() {
            return Err(PageError::Invalid("name and slug are required"));
        }
        let route = match self.route.as_deref().map(str::trim) {
            Some(route) if !route.is_empty() => route.to_owned(),
            _ => format!("/{slug}"),
        };
        Ok(Self { name: name.to_owned(), slug: slug.to_owned(), route: Some(route) })
    }
}

// =============================================================================
// PAGES
// =============================================================================

/// Name of the application, or `ApplicationNotFound` if it is not in the
/// organization.
async fn application_name(pool: &PgPool, organization_id: Uuid, application_id: Uuid) -> Result<String, PageError> {
    sqlx::query_scalar::<_, String>("SELECT name FROM applications WHERE id = $1 AND organization_id = $2")
        .bind(application_id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .ok_or(PageError::ApplicationNotFound(application_id))
}

/// List an application's pages in display order.
///
/// # Errors
///
/// Returns `ApplicationNotFound` or a database error.
pub async fn list_pages(pool: &PgPool, organization_id: Uuid, application_id: Uuid) -> Result<Vec<PageRow>, PageError> {
    application_name(pool, organization_id, application_id).await?;

    let sql = format!("SELECT {COLUMNS} FROM app_pages WHERE application_id = $1 ORDER BY order_index ASC, created_at ASC");
    let rows = sqlx::query_as::<_, PageTuple>(&sql)
        .bind(application_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(PageRow::from).collect())
}

/// Append a page after the application's existing pages.
///
/// # Errors
///
/// Returns `Invalid`, `ApplicationNotFound`, `Conflict` (duplicate slug), or
/// a database error.
pub async fn create_page(
    pool: &PgPool,
    organization_id: Uuid,
    application_id: Uuid,
    input: &NewPage,
) -> Result<PageRow, PageError> {
    let input = input.validated()?;
    application_name(pool, organization_id, application_id).await?;

    let id = Uuid::new_v4();
    let sql = format!(
        "INSERT INTO app_pages (id, application_id, name, slug, route, order_index)
         VALUES ($1, $2, $3, $4, $5,
                 (SELECT COALESCE(MAX(order_index) + 1, 0) FROM app_pages WHERE application_id = $2))
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, PageTuple>(&sql)
        .bind(id)
        .bind(application_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.route)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PageError::Conflict(input.slug.clone())
            } else {
                PageError::Database(e)
            }
        })?;

    info!(%application_id, page_id = %id, slug = %input.slug, "page created");
    Ok(row.into())
}

/// Delete a page.
///
/// # Errors
///
/// Returns `ApplicationNotFound`, `NotFound`, or a database error.
pub async fn delete_page(
    pool: &PgPool,
    organization_id: Uuid,
    application_id: Uuid,
    page_id: Uuid,
) -> Result<(), PageError> {
    application_name(pool, organization_id, application_id).await?;

    let result = sqlx::query("DELETE FROM app_pages WHERE id = $1 AND application_id = $2")
        .bind(page_id)
        .bind(application_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PageError::NotFound(page_id));
    }
    info!(%application_id, %page_id, "page deleted");
    Ok(())
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Load a page's layout as a [`Document`] stamped with the application's id
/// and name.
///
/// # Errors
///
/// Returns `ApplicationNotFound`, `NotFound`, or a database error (including
/// a stored tree that no longer decodes).
pub async fn load_document(
    pool: &PgPool,
    organization_id: Uuid,
    application_id: Uuid,
    page_id: Uuid,
) -> Result<Document, PageError> {
    let name = application_name(pool, organization_id, application_id).await?;

    let Json(components) = sqlx::query_scalar::<_, Json<Vec<ComponentInstance>>>(
        "SELECT components FROM app_pages WHERE id = $1 AND application_id = $2",
    )
    .bind(page_id)
    .bind(application_id)
    .fetch_optional(pool)
    .await?
    .ok_or(PageError::NotFound(page_id))?;

    Ok(Document::new(Some(application_id.to_string()), name, components))
}

/// Validate `payload` as a layout document and store its components.
/// Returns the number of top-level components saved.
///
/// # Errors
///
/// Returns `InvalidDocument` without touching the database if the payload has
/// no well-formed `components` array; otherwise `ApplicationNotFound`,
/// `NotFound`, or a database error.
pub async fn save_document(
    pool: &PgPool,
    organization_id: Uuid,
    application_id: Uuid,
    page_id: Uuid,
    payload: &serde_json::Value,
) -> Result<usize, PageError> {
    let doc = Document::from_value(payload)?;
    application_name(pool, organization_id, application_id).await?;

    let result = sqlx::query(
        "UPDATE app_pages SET components = $1, updated_at = now() WHERE id = $2 AND application_id = $3",
    )
    .bind(Json(&doc.components))
    .bind(page_id)
    .bind(application_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(PageError::NotFound(page_id));
    }
    info!(%application_id, %page_id, components = doc.components.len(), "page document saved");
    Ok(doc.components.len())
}
