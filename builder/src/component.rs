//! Component instances and the factory that creates them.
//!
//! A [`ComponentInstance`] is one placed element of a page layout. Its
//! `props` and `styles` are open JSON maps: the registry decides which keys a
//! fresh instance starts with and which ones the editor can change, but
//! unknown keys loaded from storage are kept verbatim.
//!
//! Decoding only insists on a string `id` and `type`. A `null` `props` reads
//! as empty, `styles` stays absent unless given, and `position` is whatever
//! JSON the canvas stored.
//!
//! `children` is structural: it is `Some` only for types that can contain
//! other components. Consumers that need to tell "cannot have children" from
//! "has no children yet" must match on the `Option`, not on emptiness.

#[cfg(test)]
#[path = "component_test.rs"]
mod component_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::consts::COMPONENT_ID_PREFIX;
use crate::history::now_ms;
use crate::registry;

/// Errors raised by the component model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("unknown component type: {0}")]
    UnknownComponentType(String),
}

/// A component placed on the canvas, as stored and sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// Opaque identifier, unique for the lifetime of the process.
    pub id: String,
    /// Registry type tag (`"button"`, `"card"`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
    /// Nested components. `None` for types that cannot contain children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ComponentInstance>>,
    /// `None` when the stored instance carried no styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Map<String, Value>>,
    /// Canvas position, usually `{x, y}`. Stored as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
    /// Top-level fields this model does not know about. Preserved on
    /// round-trips and writable through `update_component`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Styles every new instance starts with.
#[must_use]
pub fn default_styles() -> Map<String, Value> {
    let mut styles = Map::new();
    styles.insert("margin".to_owned(), Value::from("0"));
    styles.insert("padding".to_owned(), Value::from("0"));
    styles
}

/// Generate a fresh component id: creation time plus a random suffix.
#[must_use]
pub fn new_component_id() -> String {
    format!("{COMPONENT_ID_PREFIX}{}_{}", now_ms(), Uuid::new_v4().simple())
}

/// Create an instance of `kind`, merging `overrides` over the registry
/// defaults (overrides win on key collision).
///
/// # Errors
///
/// Returns [`BuilderError::UnknownComponentType`] if `kind` is not
/// registered. No instance is produced in that case.
pub fn create(kind: &str, overrides: Map<String, Value>) -> Result<ComponentInstance, BuilderError> {
    let def = registry::definition(kind).ok_or_else(|| BuilderError::UnknownComponentType(kind.to_owned()))?;

    let mut props = def.default_props.clone();
    props.extend(overrides);

    Ok(ComponentInstance {
        id: new_component_id(),
        kind: kind.to_owned(),
        props,
        children: def.can_contain_children.then(Vec::new),
        styles: Some(default_styles()),
        position: None,
        extra: Map::new(),
    })
}

impl ComponentInstance {
    /// Shallow-merge `updates` into the top-level fields.
    ///
    /// Known fields are replaced wholesale (`props` and `styles` included);
    /// anything else lands in `extra`. The `id` is never overwritten. Values
    /// of the wrong shape for a typed field are skipped.
    pub fn apply_fields(&mut self, updates: &Map<String, Value>) {
        for (key, value) in updates {
            match key.as_str() {
                "id" => {}
                "type" => match value.as_str() {
                    Some(kind) => self.kind = kind.to_owned(),
                    None => tracing::warn!(id = %self.id, "ignoring non-string component type update"),
                },
                "props" => match value.as_object() {
                    Some(props) => self.props = props.clone(),
                    None => tracing::warn!(id = %self.id, "ignoring non-object props update"),
                },
                "styles" => match value {
                    Value::Object(styles) => self.styles = Some(styles.clone()),
                    Value::Null => self.styles = None,
                    _ => tracing::warn!(id = %self.id, "ignoring non-object styles update"),
                },
                "children" => match serde_json::from_value::<Option<Vec<ComponentInstance>>>(value.clone()) {
                    Ok(children) => self.children = children,
                    Err(e) => tracing::warn!(id = %self.id, error = %e, "ignoring malformed children update"),
                },
                "position" => self.position = (!value.is_null()).then(|| value.clone()),
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Merge `updates` into `props` key by key.
    pub fn merge_props(&mut self, updates: &Map<String, Value>) {
        for (key, value) in updates {
            self.props.insert(key.clone(), value.clone());
        }
    }

    /// Merge `updates` into `styles` key by key, creating the map if the
    /// instance had none.
    pub fn merge_styles(&mut self, updates: &Map<String, Value>) {
        let styles = self.styles.get_or_insert_with(Map::new);
        for (key, value) in updates {
            styles.insert(key.clone(), value.clone());
        }
    }

    /// Whether this instance's type allows nested components.
    #[must_use]
    pub fn can_contain_children(&self) -> bool {
        self.children.is_some()
    }
}
