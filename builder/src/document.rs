//! Serializable page document exchanged with storage.
//!
//! [`Document`] is what `export_state` produces and what a persistence layer
//! hands back on load. Parsing is lenient about metadata (missing id, name,
//! version or timestamp fall back to defaults) and strict about the one thing
//! that matters: `components` must be an array of component instances.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::component::ComponentInstance;
use crate::consts::DOCUMENT_VERSION;

/// Exported canvas state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub application_name: String,
    pub components: Vec<ComponentInstance>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub exported_at: Option<String>,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_owned()
}

/// Why an import payload was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportIssue {
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("document has no components")]
    MissingComponents,
    #[error("document components is not an array")]
    ComponentsNotArray,
    #[error("component {index} is malformed: {reason}")]
    MalformedComponent { index: usize, reason: String },
}

/// Result of `CanvasStore::import_state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The document replaced the canvas.
    Loaded { components: usize },
    /// The payload was left alone; the store is unchanged.
    Ignored(ImportIssue),
}

impl ImportOutcome {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

impl Document {
    /// Document stamped with the current version and export time. The time is
    /// left unset if formatting fails.
    #[must_use]
    pub fn new(application_id: Option<String>, application_name: String, components: Vec<ComponentInstance>) -> Self {
        Self {
            application_id,
            application_name,
            components,
            version: default_version(),
            exported_at: exported_at_now(),
        }
    }

    /// Parse an arbitrary JSON payload.
    ///
    /// An empty or non-string `applicationId` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an [`ImportIssue`] if the payload is not an object, has no
    /// `components`, `components` is not an array, or an element is not a
    /// valid component instance.
    pub fn from_value(value: &Value) -> Result<Self, ImportIssue> {
        let map = value.as_object().ok_or(ImportIssue::NotAnObject)?;
        let raw = match map.get("components") {
            None | Some(Value::Null) => return Err(ImportIssue::MissingComponents),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ImportIssue::ComponentsNotArray),
        };

        let components = raw
            .iter()
            .enumerate()
            .map(|(index, item)| {
                ComponentInstance::deserialize(item)
                    .map_err(|e| ImportIssue::MalformedComponent { index, reason: e.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let application_id = map
            .get("applicationId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_owned);
        let application_name = map
            .get("applicationName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let version = map
            .get("version")
            .and_then(Value::as_str)
            .map_or_else(default_version, str::to_owned);
        let exported_at = map
            .get("exportedAt")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(Self { application_id, application_name, components, version, exported_at })
    }
}

/// Current UTC time as an RFC 3339 string, or `None` if it cannot be
/// formatted.
#[must_use]
pub fn exported_at_now() -> Option<String> {
    match OffsetDateTime::now_utc().format(&Rfc3339) {
        Ok(stamp) => Some(stamp),
        Err(e) => {
            tracing::warn!(error = %e, "could not format export timestamp");
            None
        }
    }
}
