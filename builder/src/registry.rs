//! Component registry: the static catalog of component types.
//!
//! Each [`ComponentDefinition`] describes one placeable component: its
//! display metadata, the props a fresh instance starts with, and the schema
//! the property editor uses to offer edits. The table is built once on first
//! access and never mutated, so lookups are safe from any thread.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::sync::LazyLock;

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::{Map, Value, json};

/// Editor affordance for a configurable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropKind {
    /// Single-line text.
    String,
    /// Multi-line text.
    Textarea,
    /// Floating-point number.
    Number,
    /// Two-state toggle.
    Boolean,
    /// One value out of a fixed option set.
    Select {
        /// Allowed values, in display order.
        options: &'static [&'static str],
    },
    /// CSS color string.
    Color,
    /// Ordered list of strings, edited as comma-separated text.
    Array,
    /// Event handler binding. Declared but not editable yet.
    Action,
}

impl PropKind {
    /// Lowercase tag used on the wire and in editor output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select { .. } => "select",
            Self::Color => "color",
            Self::Array => "array",
            Self::Action => "action",
        }
    }
}

/// One editable property of a component type.
#[derive(Debug, Clone, Serialize)]
pub struct PropSchema {
    #[serde(skip)]
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: PropKind,
}

/// Static description of a component type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub default_props: Map<String, Value>,
    #[serde(serialize_with = "serialize_schema")]
    pub configurable_props: Vec<PropSchema>,
    pub can_contain_children: bool,
}

impl ComponentDefinition {
    /// Schema entry for `name`, if the property is editable.
    #[must_use]
    pub fn prop_schema(&self, name: &str) -> Option<&PropSchema> {
        self.configurable_props.iter().find(|p| p.name == name)
    }
}

/// Serialize the schema list as an ordered `name -> descriptor` object.
fn serialize_schema<S>(schema: &[PropSchema], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut map = serializer.serialize_map(Some(schema.len()))?;
    for prop in schema {
        map.serialize_entry(prop.name, prop)?;
    }
    map.end()
}

// =============================================================================
// CATALOG
// =============================================================================

const SIZE_STEPS: &[&str] = &["none", "small", "medium", "large"];

fn prop(name: &'static str, label: &'static str, kind: PropKind) -> PropSchema {
    PropSchema { name, label, kind }
}

fn defaults(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

static REGISTRY: LazyLock<Vec<ComponentDefinition>> = LazyLock::new(|| {
    vec![
        ComponentDefinition {
            kind: "button",
            label: "Button",
            icon: "🔘",
            category: "Basic",
            default_props: defaults(json!({
                "text": "Click me",
                "variant": "primary",
                "size": "medium",
            })),
            configurable_props: vec![
                prop("text", "Button Text", PropKind::String),
                prop("variant", "Style", PropKind::Select { options: &["primary", "secondary", "outline"] }),
                prop("size", "Size", PropKind::Select { options: &["small", "medium", "large"] }),
                prop("onClick", "Click Action", PropKind::Action),
            ],
            can_contain_children: false,
        },
        ComponentDefinition {
            kind: "text",
            label: "Text",
            icon: "📝",
            category: "Basic",
            default_props: defaults(json!({
                "content": "Enter your text here",
                "fontSize": "base",
                "fontWeight": "normal",
                "color": "gray-900",
            })),
            configurable_props: vec![
                prop("content", "Content", PropKind::Textarea),
                prop(
                    "fontSize",
                    "Font Size",
                    PropKind::Select { options: &["xs", "sm", "base", "lg", "xl", "2xl", "3xl"] },
                ),
                prop(
                    "fontWeight",
                    "Font Weight",
                    PropKind::Select { options: &["light", "normal", "medium", "semibold", "bold"] },
                ),
                prop("color", "Text Color", PropKind::Color),
            ],
            can_contain_children: false,
        },
        ComponentDefinition {
            kind: "input",
            label: "Input",
            icon: "📥",
            category: "Form",
            default_props: defaults(json!({
                "placeholder": "Enter text",
                "type": "text",
                "label": "Input Field",
                "required": false,
            })),
            configurable_props: vec![
                prop("label", "Label", PropKind::String),
                prop("placeholder", "Placeholder", PropKind::String),
                prop(
                    "type",
                    "Input Type",
                    PropKind::Select { options: &["text", "email", "password", "number", "tel", "url"] },
                ),
                prop("required", "Required", PropKind::Boolean),
                prop("validation", "Validation Rule", PropKind::String),
            ],
            can_contain_children: false,
        },
        ComponentDefinition {
            kind: "container",
            label: "Container",
            icon: "📦",
            category: "Layout",
            default_props: defaults(json!({
                "layout": "column",
                "gap": "medium",
                "padding": "medium",
                "backgroundColor": "transparent",
            })),
            configurable_props: vec![
                prop("layout", "Layout", PropKind::Select { options: &["column", "row", "grid"] }),
                prop("gap", "Gap", PropKind::Select { options: SIZE_STEPS }),
                prop("padding", "Padding", PropKind::Select { options: SIZE_STEPS }),
                prop("backgroundColor", "Background Color", PropKind::Color),
            ],
            can_contain_children: true,
        },
        ComponentDefinition {
            kind: "image",
            label: "Image",
            icon: "🖼️",
            category: "Media",
            default_props: defaults(json!({
                "src": "https://via.placeholder.com/300x200",
                "alt": "Image",
                "width": "full",
                "objectFit": "cover",
            })),
            configurable_props: vec![
                prop("src", "Image URL", PropKind::String),
                prop("alt", "Alt Text", PropKind::String),
                prop("width", "Width", PropKind::Select { options: &["auto", "full", "1/2", "1/3", "1/4"] }),
                prop(
                    "objectFit",
                    "Object Fit",
                    PropKind::Select { options: &["contain", "cover", "fill", "none"] },
                ),
            ],
            can_contain_children: false,
        },
        ComponentDefinition {
            kind: "table",
            label: "Table",
            icon: "📊",
            category: "Data",
            default_props: defaults(json!({
                "columns": ["Column 1", "Column 2", "Column 3"],
                "dataSource": "manual",
                "striped": true,
                "bordered": true,
            })),
            configurable_props: vec![
                prop("columns", "Columns", PropKind::Array),
                prop(
                    "dataSource",
                    "Data Source",
                    PropKind::Select { options: &["manual", "api", "database"] },
                ),
                prop("striped", "Striped Rows", PropKind::Boolean),
                prop("bordered", "Show Borders", PropKind::Boolean),
            ],
            can_contain_children: false,
        },
        ComponentDefinition {
            kind: "form",
            label: "Form",
            icon: "📋",
            category: "Form",
            default_props: defaults(json!({
                "submitLabel": "Submit",
                "resetLabel": "Reset",
                "layout": "vertical",
            })),
            configurable_props: vec![
                prop("submitLabel", "Submit Button Text", PropKind::String),
                prop("resetLabel", "Reset Button Text", PropKind::String),
                prop(
                    "layout",
                    "Form Layout",
                    PropKind::Select { options: &["vertical", "horizontal", "inline"] },
                ),
                prop("onSubmit", "Submit Action", PropKind::Action),
            ],
            can_contain_children: true,
        },
        ComponentDefinition {
            kind: "card",
            label: "Card",
            icon: "🎴",
            category: "Layout",
            default_props: defaults(json!({
                "title": "Card Title",
                "showHeader": true,
                "showFooter": false,
                "elevation": "medium",
            })),
            configurable_props: vec![
                prop("title", "Title", PropKind::String),
                prop("showHeader", "Show Header", PropKind::Boolean),
                prop("showFooter", "Show Footer", PropKind::Boolean),
                prop("elevation", "Shadow", PropKind::Select { options: SIZE_STEPS }),
            ],
            can_contain_children: true,
        },
    ]
});

// =============================================================================
// LOOKUPS
// =============================================================================

/// All definitions in declaration order.
#[must_use]
pub fn definitions() -> &'static [ComponentDefinition] {
    &REGISTRY
}

/// Look up a definition by its type tag.
#[must_use]
pub fn definition(kind: &str) -> Option<&'static ComponentDefinition> {
    REGISTRY.iter().find(|def| def.kind == kind)
}

/// Definitions grouped by category.
///
/// Categories appear in the order they are first declared; definitions keep
/// their declaration order inside each group.
#[must_use]
pub fn by_category() -> Vec<(&'static str, Vec<&'static ComponentDefinition>)> {
    let mut groups: Vec<(&'static str, Vec<&'static ComponentDefinition>)> = Vec::new();
    for def in definitions() {
        match groups.iter_mut().find(|(category, _)| *category == def.category) {
            Some((_, members)) => members.push(def),
            None => groups.push((def.category, vec![def])),
        }
    }
    groups
}
