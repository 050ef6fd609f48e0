//! Property editing contract.
//!
//! The editor never draws anything. It turns a component's registry schema
//! into a list of [`PropField`]s (what to show and the value to show), turns
//! raw text input into typed JSON values per [`PropKind`], and writes the
//! result back through [`CanvasStore::update_component_props`] so every edit
//! lands in history.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::component::{BuilderError, ComponentInstance};
use crate::registry::{self, PropKind};
use crate::store::CanvasStore;

/// Fallback shown for an unset color.
pub const DEFAULT_COLOR: &str = "#000000";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error("component not found: {0}")]
    ComponentNotFound(String),
    #[error("{kind} has no editable property `{name}`")]
    UnknownProperty { kind: String, name: String },
    #[error("not a number: {0:?}")]
    InvalidNumber(String),
    #[error("not a boolean: {0:?}")]
    InvalidBoolean(String),
    #[error("`{name}` is a {kind} property and cannot be toggled")]
    NotToggleable { name: String, kind: &'static str },
    #[error("{value:?} is not one of {options:?}")]
    InvalidOption { value: String, options: Vec<&'static str> },
    #[error("{0} editing is not supported yet")]
    Unsupported(&'static str),
}

/// One row of the property panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: PropKind,
    /// Current value, or the kind's fallback when unset.
    pub value: Value,
}

/// Value shown for a property that has not been set.
#[must_use]
pub fn fallback(kind: &PropKind) -> Value {
    match kind {
        PropKind::String | PropKind::Textarea => Value::from(""),
        PropKind::Number => Value::from(0),
        PropKind::Boolean => Value::Bool(false),
        PropKind::Select { options } => options.first().map_or(Value::Null, |first| Value::from(*first)),
        PropKind::Color => Value::from(DEFAULT_COLOR),
        PropKind::Array => Value::Array(Vec::new()),
        PropKind::Action => Value::Null,
    }
}

fn is_unset(kind: &PropKind, value: &Value) -> bool {
    match (kind, value) {
        (_, Value::Null) => true,
        (PropKind::Select { .. } | PropKind::Color, Value::String(s)) => s.is_empty(),
        (PropKind::Array, v) => !v.is_array(),
        _ => false,
    }
}

/// Editable fields for `instance`, in schema order.
///
/// # Errors
///
/// Returns [`BuilderError::UnknownComponentType`] if the instance's type is
/// not registered.
pub fn fields(instance: &ComponentInstance) -> Result<Vec<PropField>, BuilderError> {
    let def = registry::definition(&instance.kind)
        .ok_or_else(|| BuilderError::UnknownComponentType(instance.kind.clone()))?;

    Ok(def
        .configurable_props
        .iter()
        .map(|schema| {
            let value = match instance.props.get(schema.name) {
                Some(current) if !is_unset(&schema.kind, current) => current.clone(),
                _ => fallback(&schema.kind),
            };
            PropField { name: schema.name, label: schema.label, kind: schema.kind, value }
        })
        .collect())
}

/// Convert raw editor input into a value for `kind`.
///
/// # Errors
///
/// Returns an [`EditError`] when the input does not fit the kind, or for
/// `action` properties, which have no editor yet.
pub fn coerce(kind: &PropKind, input: &str) -> Result<Value, EditError> {
    match kind {
        PropKind::String | PropKind::Textarea | PropKind::Color => Ok(Value::from(input)),
        PropKind::Number => match input.trim().parse::<f64>() {
            Ok(parsed) => Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| EditError::InvalidNumber(input.to_owned())),
            Err(_) => Err(EditError::InvalidNumber(input.to_owned())),
        },
        PropKind::Boolean => match input.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(EditError::InvalidBoolean(input.to_owned())),
        },
        PropKind::Select { options } => {
            if options.contains(&input) {
                Ok(Value::from(input))
            } else {
                Err(EditError::InvalidOption { value: input.to_owned(), options: options.to_vec() })
            }
        }
        PropKind::Array => Ok(Value::Array(
            input.split(',').map(|part| Value::from(part.trim())).collect(),
        )),
        PropKind::Action => Err(EditError::Unsupported("action")),
    }
}

/// Flip a two-state toggle. Anything not `true` counts as off.
#[must_use]
pub fn toggle(current: &Value) -> Value {
    Value::Bool(current != &Value::Bool(true))
}

/// Text shown in an input box for `value` (arrays as comma-separated text).
#[must_use]
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Coerce `input` for property `name` of component `id` and write it
/// through the store.
///
/// # Errors
///
/// Fails without touching the store if the component is missing, its type
/// is unknown, the property is not in the schema, or coercion fails.
pub fn apply_edit(store: &mut CanvasStore, id: &str, name: &str, input: &str) -> Result<(), EditError> {
    let kind = schema_kind(store, id, name)?;
    let value = coerce(&kind, input)?;
    write(store, id, name, value);
    Ok(())
}

/// Flip a boolean property of component `id`.
///
/// # Errors
///
/// Same lookup failures as [`apply_edit`]; also fails if the property is not
/// a boolean.
pub fn apply_toggle(store: &mut CanvasStore, id: &str, name: &str) -> Result<(), EditError> {
    let kind = schema_kind(store, id, name)?;
    if kind != PropKind::Boolean {
        return Err(EditError::NotToggleable { name: name.to_owned(), kind: kind.as_str() });
    }
    let current = store
        .component(id)
        .and_then(|c| c.props.get(name))
        .cloned()
        .unwrap_or(Value::Bool(false));
    write(store, id, name, toggle(&current));
    Ok(())
}

fn schema_kind(store: &CanvasStore, id: &str, name: &str) -> Result<PropKind, EditError> {
    let instance = store
        .component(id)
        .ok_or_else(|| EditError::ComponentNotFound(id.to_owned()))?;
    let def = registry::definition(&instance.kind)
        .ok_or_else(|| BuilderError::UnknownComponentType(instance.kind.clone()))?;
    def.prop_schema(name)
        .map(|schema| schema.kind)
        .ok_or_else(|| EditError::UnknownProperty { kind: instance.kind.clone(), name: name.to_owned() })
}

fn write(store: &mut CanvasStore, id: &str, name: &str, value: Value) {
    let mut update = Map::new();
    update.insert(name.to_owned(), value);
    store.update_component_props(id, &update);
}
