//! Application service: CRUD scoped to an organization.
//!
//! DESIGN
//! ======
//! Every query carries the caller's `organization_id`, so an application from
//! another organization is indistinguishable from a missing one (`NotFound`).
//! Slugs are unique per organization; the database enforces it and a unique
//! violation surfaces as `Conflict`.

#[cfg(test)]
#[path = "application_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("application not found: {0}")]
    NotFound(Uuid),
    #[error("application slug already exists: {0}")]
    Conflict(String),
    #[error("invalid application: {0}")]
    Invalid(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Status given to newly created applications.
pub const INITIAL_STATUS: &str = "draft";

/// Row returned from application queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub status: String,
    pub config: serde_json::Value,
    pub metadata: serde_json::Value,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

type ApplicationTuple = (
    Uuid,
    Uuid,
    Uuid,
    String,
    Option<String>,
    String,
    String,
    serde_json::Value,
    serde_json::Value,
    i64,
    i64,
);

const COLUMNS: &str = "id, organization_id, user_id, name, description, slug, status, config, metadata, \
     (extract(epoch from created_at) * 1000)::bigint, \
     (extract(epoch from updated_at) * 1000)::bigint";

impl From<ApplicationTuple> for ApplicationRow {
    fn from(row: ApplicationTuple) -> Self {
        let (id, organization_id, user_id, name, description, slug, status, config, metadata, created_at_ms, updated_at_ms) =
            row;
        Self {
            id,
            organization_id,
            user_id,
            name,
            description,
            slug,
            status,
            config,
            metadata,
            created_at_ms,
            updated_at_ms,
        }
    }
}

/// Input for [`create_application`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
}

impl NewApplication {
    /// Trimmed copy, or `Invalid` if name or slug is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Invalid`] when a required field is blank.
    pub fn validated(&self) -> Result<Self, ApplicationError> {
        let name = self.name.trim();
        let slug = self.slug.trim();
        if name.is_empty() || slug.is_empty() {
            return Err(ApplicationError::Invalid("name and slug are required"));
        }
        Ok(Self { name: name.to_owned(), slug: slug.to_owned(), description: self.description.clone() })
    }
}

/// Partial update for [`update_application`]. Absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub config: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

impl ApplicationPatch {
    /// # Errors
    ///
    /// Returns [`ApplicationError::Invalid`] for a blank name or status.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApplicationError::Invalid("name cannot be blank"));
        }
        if self.status.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ApplicationError::Invalid("status cannot be blank"));
        }
        Ok(())
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

// =============================================================================
// CRUD
// =============================================================================

/// List an organization's applications, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_applications(pool: &PgPool, organization_id: Uuid) -> Result<Vec<ApplicationRow>, ApplicationError> {
    let sql = format!("SELECT {COLUMNS} FROM applications WHERE organization_id = $1 ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, ApplicationTuple>(&sql)
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(ApplicationRow::from).collect())
}

/// Fetch one application.
///
/// # Errors
///
/// Returns `NotFound` if the application does not exist in the organization.
pub async fn get_application(
    pool: &PgPool,
    organization_id: Uuid,
    application_id: Uuid,
) -> Result<ApplicationRow, ApplicationError> {
    let sql = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 AND organization_id = $2");
    sqlx::query_as::<_, ApplicationTuple>(&sql)
        .bind(application_id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .map(ApplicationRow::from)
        .ok_or(ApplicationError::NotFound(application_id))
}

/// Create an application in `draft` status.
///
/// # Errors
///
/// Returns `Invalid` for blank name/slug, `Conflict` if the slug is taken in
/// the organization, or a database error.
pub async fn create_application(
    pool: &PgPool,
    organization_id: Uuid,
    user_id: Uuid,
    input: &NewApplication,
) -> Result<ApplicationRow, ApplicationError> {
    let input = input.validated()?;
    let id = Uuid::new_v4();
    let sql = format!(
        "INSERT INTO applications (id, organization_id, user_id, name, description, slug, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, ApplicationTuple>(&sql)
        .bind(id)
        .bind(organization_id)
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.slug)
        .bind(INITIAL_STATUS)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApplicationError::Conflict(input.slug.clone())
            } else {
                ApplicationError::Database(e)
            }
        })?;

    info!(application_id = %id, %user_id, name = %input.name, "application created");
    Ok(row.into())
}

/// Apply a partial update and bump `updated_at`.
///
/// # Errors
///
/// Returns `Invalid` for a blank name/status, `NotFound` if the application
/// is not in the organization, or a database error.
pub async fn update_application(
    pool: &PgPool,
    organization_id: Uuid,
    application_id: Uuid,
    patch: &ApplicationPatch,
) -> Result<ApplicationRow, ApplicationError> {
    patch.validate()?;

    let mut builder = QueryBuilder::<Postgres>::new("UPDATE applications SET updated_at = now()");
    if let Some(name) = &patch.name {
        builder.push(", name = ").push_bind(name.trim().to_owned());
    }
    if let Some(description) = &patch.description {
        builder.push(", description = ").push_bind(description.clone());
    }
    if let Some(status) = &patch.status {
        builder.push(", status = ").push_bind(status.trim().to_owned());
    }
    if let Some(config) = &patch.config {
        builder.push(", config = ").push_bind(config.clone());
    }
    if let Some(metadata) = &patch.metadata {
        builder.push(", metadata = ").push_bind(metadata.clone());
    }
    builder.push(" WHERE id = ").push_bind(application_id);
    builder.push(" AND organization_id = ").push_bind(organization_id);
    builder.push(" RETURNING ").push(COLUMNS);

    let row = builder
        .build_query_as::<ApplicationTuple>()
        .fetch_optional(pool)
        .await?
        .ok_or(ApplicationError::NotFound(application_id))?;

    info!(%application_id, "application updated");
    Ok(row.into())
}

/// Delete an application (its pages cascade).
///
/// # Errors
///
/// Returns `NotFound` if nothing was deleted, or a database error.
pub async fn delete_application(
    pool: &PgPool,
    organization_id: Uuid,
    application_id: Uuid,
) -> Result<(), ApplicationError> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND organization_id = $2")
        .bind(application_id)
        .bind(organization_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApplicationError::NotFound(application_id));
    }
    info!(%application_id, "application deleted");
    Ok(())
}
