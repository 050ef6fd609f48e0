//! Document-file commands that need no backend.

#[cfg(test)]
#[path = "offline_test.rs"]
mod tests;

use builder::document::Document;
use builder::{CanvasStore, ImportOutcome, editor, registry, render};
use serde_json::{Map, Value};

use crate::CliError;

/// `NAME=VALUE` for `--prop`. Only the first `=` splits, so values may
/// contain `=`.
pub fn parse_prop(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_owned(), value.to_owned())),
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

/// Load a document through the same import path the editor uses.
pub fn load_store(text: &str) -> Result<CanvasStore, CliError> {
    let payload: Value = serde_json::from_str(text)?;
    let mut store = CanvasStore::from_components(Vec::new());
    match store.import_state(&payload) {
        ImportOutcome::Loaded { .. } => Ok(store),
        ImportOutcome::Ignored(issue) => Err(issue.into()),
    }
}

/// Palette listing, one category heading per group.
#[must_use]
pub fn catalog_text() -> String {
    let mut out = String::new();
    for (category, definitions) in registry::by_category() {
        out.push_str(category);
        out.push('\n');
        for def in definitions {
            let props: Vec<&str> = def.configurable_props.iter().map(|p| p.name).collect();
            let container = if def.can_contain_children { " [container]" } else { "" };
            out.push_str(&format!("  {:<10} {}{container}  ({})\n", def.kind, def.label, props.join(", ")));
        }
    }
    out
}

/// One-line summary of a loadable document.
pub fn validate(text: &str) -> Result<String, CliError> {
    let store = load_store(text)?;
    let unknown: Vec<&str> = store
        .components()
        .iter()
        .filter(|c| registry::definition(&c.kind).is_none())
        .map(|c| c.kind.as_str())
        .collect();

    let mut summary = format!("ok, {} components", store.components().len());
    if !unknown.is_empty() {
        summary.push_str(&format!(" ({} of unknown type: {})", unknown.len(), unknown.join(", ")));
    }
    Ok(summary)
}

/// Preview HTML for a document.
pub fn render(text: &str) -> Result<String, CliError> {
    let store = load_store(text)?;
    Ok(render::render_page(store.components()))
}

/// Add a `kind` component with `props` applied through the property editor.
/// Returns the updated document and the new component's id.
pub fn add_component(text: &str, kind: &str, props: &[(String, String)]) -> Result<(Document, String), CliError> {
    let mut store = load_store(text)?;
    let id = store.add_component(kind, Map::new())?.id.clone();
    for (name, value) in props {
        editor::apply_edit(&mut store, &id, name, value)?;
    }
    Ok((store.export_state(), id))
}
