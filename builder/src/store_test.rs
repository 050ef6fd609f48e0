#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::consts::HISTORY_LIMIT;
use crate::document::ImportIssue;

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Canvas opened on an empty document, the way an editor session starts.
fn opened() -> CanvasStore {
    CanvasStore::from_components(Vec::new())
}

fn add(store: &mut CanvasStore, kind: &str) -> String {
    store.add_component(kind, Map::new()).unwrap().id.clone()
}

// =============================================================
// construction
// =============================================================

#[test]
fn new_store_is_empty() {
    let store = CanvasStore::new();
    assert!(store.components().is_empty());
    assert!(store.selected_component_id().is_none());
    assert!(store.history().is_empty());
    assert_eq!(store.history_index(), None);
    assert_eq!(store.view(), ViewSettings::default());
}

#[test]
fn from_components_starts_history_at_zero() {
    let store = opened();
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history_index(), Some(0));
}

// =============================================================
// add
// =============================================================

#[test]
fn add_appends_selects_and_records() {
    let mut store = opened();
    let id = add(&mut store, "button");
    assert_eq!(store.components().len(), 1);
    assert_eq!(store.selected_component_id(), Some(id.as_str()));
    assert_eq!(store.history().len(), 2);
    assert_eq!(store.history_index(), Some(1));
}

#[test]
fn add_on_fresh_store_records_first_snapshot() {
    let mut store = CanvasStore::new();
    add(&mut store, "text");
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history_index(), Some(0));
    assert!(!store.can_undo());
}

#[test]
fn add_unknown_type_leaves_store_unchanged() {
    let mut store = opened();
    let first = add(&mut store, "button");
    let err = store.add_component("slider", Map::new()).unwrap_err();
    assert_eq!(err, BuilderError::UnknownComponentType("slider".into()));
    assert_eq!(store.components().len(), 1);
    assert_eq!(store.selected_component_id(), Some(first.as_str()));
    assert_eq!(store.history().len(), 2);
}

#[test]
fn add_passes_props_through_factory() {
    let mut store = opened();
    let instance = store.add_component("button", obj(json!({"text": "Save"}))).unwrap();
    assert_eq!(instance.props["text"], "Save");
    assert_eq!(instance.props["size"], "medium");
}

// =============================================================
// remove
// =============================================================

#[test]
fn remove_selected_clears_selection() {
    let mut store = opened();
    let id = add(&mut store, "button");
    store.remove_component(&id);
    assert!(store.components().is_empty());
    assert!(store.selected_component_id().is_none());
}

#[test]
fn remove_unselected_keeps_selection() {
    let mut store = opened();
    let a = add(&mut store, "button");
    let b = add(&mut store, "text");
    store.remove_component(&a);
    assert_eq!(store.selected_component_id(), Some(b.as_str()));
    assert_eq!(store.components().len(), 1);
}

#[test]
fn remove_absent_only_records_history() {
    let mut store = opened();
    let a = add(&mut store, "button");
    let before: Vec<ComponentInstance> = store.components().to_vec();
    let len = store.history().len();

    store.remove_component("nope");

    assert_eq!(store.components(), before.as_slice());
    assert_eq!(store.selected_component_id(), Some(a.as_str()));
    assert_eq!(store.history().len(), len + 1);
}

#[test]
fn remove_hovered_clears_hover() {
    let mut store = opened();
    let id = add(&mut store, "button");
    store.set_hovered_component(&id);
    store.remove_component(&id);
    assert!(store.hovered_component_id().is_none());
}

// =============================================================
// updates
// =============================================================

#[test]
fn update_props_merges_and_records() {
    let mut store = opened();
    let id = add(&mut store, "button");
    store.update_component_props(&id, &obj(json!({"text": "Send"})));
    let c = store.component(&id).unwrap();
    assert_eq!(c.props["text"], "Send");
    assert_eq!(c.props["variant"], "primary");
    assert_eq!(store.history().len(), 3);
}

#[test]
fn update_styles_merges_and_records() {
    let mut store = opened();
    let id = add(&mut store, "button");
    store.update_component_styles(&id, &obj(json!({"padding": "12px"})));
    let c = store.component(&id).unwrap();
    let styles = c.styles.as_ref().unwrap();
    assert_eq!(styles["padding"], "12px");
    assert_eq!(styles["margin"], "0");
    assert_eq!(store.history().len(), 3);
}

#[test]
fn update_component_merges_top_level_fields() {
    let mut store = opened();
    let id = add(&mut store, "text");
    store.update_component(&id, &obj(json!({"styles": {"color": "red"}, "locked": true})));
    let c = store.component(&id).unwrap();
    assert_eq!(c.styles, Some(obj(json!({"color": "red"}))));
    assert_eq!(c.extra["locked"], true);
    assert_eq!(c.id, id);
}

#[test]
fn empty_and_missing_updates_still_grow_history() {
    let mut store = opened();
    let id = add(&mut store, "button");
    store.update_component_props(&id, &Map::new());
    store.update_component_styles("ghost", &obj(json!({"margin": "1px"})));
    store.update_component("ghost", &Map::new());
    assert_eq!(store.history().len(), 5);
    assert_eq!(store.history_index(), Some(4));
}

#[test]
fn move_does_not_record_history() {
    let mut store = opened();
    let id = add(&mut store, "image");
    store.move_component(&id, json!({"x": 4.0, "y": 8.0}));
    assert_eq!(store.component(&id).unwrap().position, Some(json!({"x": 4.0, "y": 8.0})));
    assert_eq!(store.history().len(), 2);
}

// =============================================================
// selection
// =============================================================

#[test]
fn select_and_deselect() {
    let mut store = opened();
    let a = add(&mut store, "button");
    let b = add(&mut store, "text");
    store.select_component(&a);
    assert_eq!(store.selected_component().unwrap().id, a);
    store.deselect_component();
    assert!(store.selected_component().is_none());
    store.select_component(&b);
    assert_eq!(store.selected_component_id(), Some(b.as_str()));
}

#[test]
fn select_unknown_is_ignored() {
    let mut store = opened();
    let a = add(&mut store, "button");
    store.select_component("ghost");
    assert_eq!(store.selected_component_id(), Some(a.as_str()));
}

#[test]
fn selection_does_not_record_history() {
    let mut store = opened();
    let a = add(&mut store, "button");
    store.deselect_component();
    store.select_component(&a);
    store.set_hovered_component(&a);
    store.clear_hovered_component();
    assert_eq!(store.history().len(), 2);
}

#[test]
fn lookups_miss_cleanly() {
    let store = opened();
    assert!(store.component("nope").is_none());
    assert!(store.selected_component().is_none());
}

// =============================================================
// history
// =============================================================

#[test]
fn history_length_tracks_mutations_up_to_cap() {
    for n in [1_usize, 10, 48, 49, 50, 51, 75] {
        let mut store = opened();
        let id = add(&mut store, "button");
        for i in 1..n {
            store.update_component_props(&id, &obj(json!({"text": i})));
        }
        assert_eq!(store.history().len(), (n + 1).min(HISTORY_LIMIT), "after {n} mutations");
        assert_eq!(store.history_index(), Some(store.history().len() - 1));
    }
}

#[test]
fn undo_then_redo_restores_identical_state() {
    let mut store = opened();
    let id = add(&mut store, "card");
    store.update_component_props(&id, &obj(json!({"title": "A"})));
    add(&mut store, "text");
    let before = store.components().to_vec();

    assert!(store.undo());
    assert_ne!(store.components(), before.as_slice());
    assert!(store.redo());
    assert_eq!(store.components(), before.as_slice());
}

#[test]
fn undo_at_oldest_and_redo_at_newest_are_noops() {
    let mut store = opened();
    assert!(!store.undo());
    assert_eq!(store.history_index(), Some(0));

    add(&mut store, "button");
    let snapshot = store.components().to_vec();
    assert!(!store.redo());
    assert_eq!(store.components(), snapshot.as_slice());
    assert_eq!(store.history_index(), Some(1));
}

#[test]
fn add_add_undo_undo_redo_redo_scenario() {
    let mut store = opened();
    let button = add(&mut store, "button");
    assert_eq!(store.components().len(), 1);
    assert_eq!(store.selected_component_id(), Some(button.as_str()));
    assert_eq!(store.history().len(), 2);

    let text = add(&mut store, "text");
    assert_eq!(store.components().len(), 2);

    assert!(store.undo());
    assert_eq!(store.components().len(), 1);
    assert_eq!(store.components()[0].id, button);

    assert!(store.undo());
    assert!(store.components().is_empty());

    assert!(store.redo());
    assert!(store.redo());
    let ids: Vec<&str> = store.components().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, [button.as_str(), text.as_str()]);
}

#[test]
fn edit_after_undo_discards_redo_branch() {
    let mut store = opened();
    add(&mut store, "button");
    add(&mut store, "text");
    store.undo();
    add(&mut store, "image");
    assert!(!store.can_redo());
    assert_eq!(store.history().len(), 3);
    let kinds: Vec<&str> = store.components().iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, ["button", "image"]);
}

#[test]
fn undo_drops_selection_of_vanished_component() {
    let mut store = opened();
    add(&mut store, "button");
    add(&mut store, "text");
    store.undo();
    assert!(store.selected_component_id().is_none());
}

#[test]
fn undo_keeps_selection_of_surviving_component() {
    let mut store = opened();
    let id = add(&mut store, "button");
    store.update_component_props(&id, &obj(json!({"text": "x"})));
    store.undo();
    assert_eq!(store.selected_component_id(), Some(id.as_str()));
    assert_eq!(store.component(&id).unwrap().props["text"], "Click me");
}

#[test]
fn restored_state_is_independent_of_history() {
    let mut store = opened();
    let id = add(&mut store, "button");
    store.update_component_props(&id, &obj(json!({"text": "one"})));
    store.undo();
    store.move_component(&id, json!({"x": 1.0, "y": 1.0}));
    store.redo();
    store.undo();
    assert!(store.component(&id).unwrap().position.is_none());
}

// =============================================================
// load / clear
// =============================================================

#[test]
fn load_replaces_and_resets() {
    let mut store = opened();
    add(&mut store, "button");
    add(&mut store, "text");
    let replacement = vec![component::create("card", Map::new()).unwrap()];

    store.load_components(replacement.clone());

    assert_eq!(store.components(), replacement.as_slice());
    assert!(store.selected_component_id().is_none());
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history_index(), Some(0));
    assert!(!store.can_undo());
}

#[test]
fn clear_canvas_forgets_everything() {
    let mut store = opened();
    add(&mut store, "button");
    store.clear_canvas();
    assert!(store.components().is_empty());
    assert!(store.selected_component_id().is_none());
    assert!(store.history().is_empty());
    assert_eq!(store.history_index(), None);
}

// =============================================================
// export / import
// =============================================================

#[test]
fn export_carries_application_and_version() {
    let mut store = opened();
    store.set_application("app-1", "Shop");
    add(&mut store, "button");
    let doc = store.export_state();
    assert_eq!(doc.application_id.as_deref(), Some("app-1"));
    assert_eq!(doc.application_name, "Shop");
    assert_eq!(doc.version, "1.0.0");
    assert_eq!(doc.components, store.components());
    assert!(doc.exported_at.is_some());
}

#[test]
fn import_components_array_loads() {
    let a = component::create("button", Map::new()).unwrap();
    let b = component::create("text", Map::new()).unwrap();
    let mut store = opened();
    add(&mut store, "card");

    let outcome = store.import_state(&json!({"components": [&a, &b]}));

    assert_eq!(outcome, ImportOutcome::Loaded { components: 2 });
    assert_eq!(store.components(), [a, b].as_slice());
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history_index(), Some(0));
}

#[test]
fn import_without_components_changes_nothing() {
    let mut store = opened();
    store.set_application("app-1", "Shop");
    let id = add(&mut store, "button");
    let components = store.components().to_vec();
    let history_len = store.history().len();

    let outcome = store.import_state(&json!({}));

    assert_eq!(outcome, ImportOutcome::Ignored(ImportIssue::MissingComponents));
    assert_eq!(store.components(), components.as_slice());
    assert_eq!(store.selected_component_id(), Some(id.as_str()));
    assert_eq!(store.history().len(), history_len);
    assert_eq!(store.application_id(), Some("app-1"));
}

#[test]
fn import_rejects_non_array_components() {
    let mut store = opened();
    let outcome = store.import_state(&json!({"components": {"0": {}}}));
    assert_eq!(outcome, ImportOutcome::Ignored(ImportIssue::ComponentsNotArray));
    assert!(!outcome.is_loaded());
}

#[test]
fn import_sets_application_only_when_present() {
    let mut store = opened();
    store.set_application("keep", "Keep");
    store.import_state(&json!({"components": []}));
    assert_eq!(store.application_id(), Some("keep"));

    store.import_state(&json!({"components": [], "applicationId": "new"}));
    assert_eq!(store.application_id(), Some("new"));
    assert_eq!(store.application_name(), "");
}

#[test]
fn export_then_import_round_trips_components() {
    let mut store = opened();
    let id = add(&mut store, "card");
    store.update_component_styles(&id, &obj(json!({"border": "1px"})));
    let payload = serde_json::to_value(store.export_state()).unwrap();

    let mut other = CanvasStore::new();
    assert!(other.import_state(&payload).is_loaded());
    assert_eq!(other.components(), store.components());
}

#[test]
fn import_then_export_keeps_hand_written_instances() {
    let components = json!([
        {"id": "a", "type": "button", "props": {"text": "x"}},
        {"id": "b", "type": "text"},
        {"id": "c", "type": "image", "position": {"x": 1}}
    ]);
    let mut store = CanvasStore::new();
    assert!(store.import_state(&json!({"components": components.clone()})).is_loaded());
    let exported = serde_json::to_value(store.export_state()).unwrap();
    assert_eq!(exported["components"], components);
}

// =============================================================
// view settings
// =============================================================

#[test]
fn zoom_is_clamped() {
    let mut store = CanvasStore::new();
    store.set_zoom(5.0);
    assert_eq!(store.view().zoom, 2.0);
    store.set_zoom(0.01);
    assert_eq!(store.view().zoom, 0.25);
    store.set_zoom(f64::NAN);
    assert_eq!(store.view().zoom, 0.25);
    store.reset_zoom();
    assert_eq!(store.view().zoom, 1.0);
}

#[test]
fn zoom_steps() {
    let mut store = CanvasStore::new();
    store.zoom_in();
    assert!((store.view().zoom - 1.1).abs() < 1e-9);
    store.zoom_out();
    store.zoom_out();
    assert!((store.view().zoom - 0.9).abs() < 1e-9);
    for _ in 0..30 {
        store.zoom_in();
    }
    assert_eq!(store.view().zoom, 2.0);
}

#[test]
fn grid_toggles() {
    let mut store = CanvasStore::new();
    store.toggle_grid();
    store.toggle_snap_to_grid();
    assert!(!store.view().show_grid);
    assert!(!store.view().snap_to_grid);
    store.toggle_grid();
    assert!(store.view().show_grid);
}
