use super::*;

#[test]
fn definitions_keep_declaration_order() {
    let kinds: Vec<&str> = definitions().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, ["button", "text", "input", "container", "image", "table", "form", "card"]);
}

#[test]
fn type_tags_are_unique() {
    let defs = definitions();
    for (i, a) in defs.iter().enumerate() {
        for b in &defs[i + 1..] {
            assert_ne!(a.kind, b.kind);
        }
    }
}

#[test]
fn definition_finds_known_type() {
    let def = definition("button").unwrap();
    assert_eq!(def.label, "Button");
    assert_eq!(def.category, "Basic");
    assert_eq!(def.default_props.get("text"), Some(&json!("Click me")));
    assert!(!def.can_contain_children);
}

#[test]
fn definition_misses_unknown_type() {
    assert!(definition("carousel").is_none());
    assert!(definition("").is_none());
    assert!(definition("Button").is_none());
}

#[test]
fn containers_are_marked() {
    let containers: Vec<&str> = definitions()
        .iter()
        .filter(|d| d.can_contain_children)
        .map(|d| d.kind)
        .collect();
    assert_eq!(containers, ["container", "form", "card"]);
}

#[test]
fn by_category_groups_in_first_seen_order() {
    let groups = by_category();
    let names: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
    assert_eq!(names, ["Basic", "Form", "Layout", "Media", "Data"]);

    let form: Vec<&str> = groups[1].1.iter().map(|d| d.kind).collect();
    assert_eq!(form, ["input", "form"]);

    let layout: Vec<&str> = groups[2].1.iter().map(|d| d.kind).collect();
    assert_eq!(layout, ["container", "card"]);
}

#[test]
fn by_category_covers_every_definition() {
    let total: usize = by_category().iter().map(|(_, defs)| defs.len()).sum();
    assert_eq!(total, definitions().len());
}

#[test]
fn prop_schema_lookup() {
    let def = definition("text").unwrap();
    let schema = def.prop_schema("fontWeight").unwrap();
    assert_eq!(schema.label, "Font Weight");
    assert!(matches!(schema.kind, PropKind::Select { options } if options.contains(&"bold")));
    assert!(def.prop_schema("missing").is_none());
}

#[test]
fn select_options_are_never_empty() {
    for def in definitions() {
        for prop in &def.configurable_props {
            if let PropKind::Select { options } = prop.kind {
                assert!(!options.is_empty(), "{}.{} has no options", def.kind, prop.name);
            }
        }
    }
}

#[test]
fn kind_tags() {
    assert_eq!(PropKind::Textarea.as_str(), "textarea");
    assert_eq!(PropKind::Select { options: &["a"] }.as_str(), "select");
    assert_eq!(PropKind::Action.as_str(), "action");
}

#[test]
fn definition_serializes_with_wire_names() {
    let value = serde_json::to_value(definition("button").unwrap()).unwrap();
    assert_eq!(value["type"], "button");
    assert_eq!(value["canContainChildren"], false);
    assert_eq!(value["defaultProps"]["variant"], "primary");
    assert_eq!(value["configurableProps"]["text"], json!({"label": "Button Text", "type": "string"}));
    assert_eq!(
        value["configurableProps"]["size"],
        json!({"label": "Size", "type": "select", "options": ["small", "medium", "large"]})
    );
}
