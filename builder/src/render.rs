//! Preview rendering: component instances to static HTML.
//!
//! Rendering is a pure projection. It reads `type` and `props`, never
//! mutates anything, and never fails: a component whose type is not in the
//! registry renders as a visible placeholder block instead.
//!
//! Class names follow the Tailwind utility set used by the editor canvas.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde_json::{Map, Value};

use crate::component::ComponentInstance;

/// Typed access to a component's `props` bag with per-key defaults.
pub struct Props<'a> {
    value: &'a Map<String, Value>,
}

impl<'a> Props<'a> {
    #[must_use]
    pub fn new(value: &'a Map<String, Value>) -> Self {
        Self { value }
    }

    /// String prop, or `default` when absent or not a string.
    #[must_use]
    pub fn str(&self, name: &str, default: &'a str) -> &'a str {
        self.value.get(name).and_then(Value::as_str).unwrap_or(default)
    }

    /// Boolean prop; anything but `true` is false.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.value.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// List prop as display strings. Non-arrays yield an empty list.
    #[must_use]
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.value.get(name) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Escape text for use in HTML bodies and double-quoted attributes.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a full page body: every component in canvas order.
#[must_use]
pub fn render_page(components: &[ComponentInstance]) -> String {
    let mut out = String::from("<div class=\"page\">");
    for component in components {
        render_into(&mut out, component);
    }
    out.push_str("</div>");
    out
}

/// Render one component (and its children) to HTML.
#[must_use]
pub fn render_component(component: &ComponentInstance) -> String {
    let mut out = String::new();
    render_into(&mut out, component);
    out
}

fn render_children(out: &mut String, component: &ComponentInstance, placeholder: &str) {
    match component.children.as_deref() {
        Some(children) if !children.is_empty() => {
            for child in children {
                render_into(out, child);
            }
        }
        _ => {
            out.push_str("<p class=\"text-sm text-gray-500 italic\">");
            out.push_str(placeholder);
            out.push_str("</p>");
        }
    }
}

fn lookup<'a>(table: &[(&str, &'a str)], key: &str, default: &'a str) -> &'a str {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(default, |&(_, v)| v)
}

fn render_into(out: &mut String, component: &ComponentInstance) {
    let props = Props::new(&component.props);
    out.push_str(&format!("<div data-component-id=\"{}\">", escape(&component.id)));

    match component.kind.as_str() {
        "button" => {
            let variant = match props.str("variant", "primary") {
                "primary" => "bg-primary-600 text-white",
                "secondary" => "bg-gray-600 text-white",
                _ => "border-2 border-primary-600 text-primary-600",
            };
            let size = lookup(&[("small", " text-sm"), ("large", " text-lg")], props.str("size", "medium"), "");
            out.push_str(&format!(
                "<button class=\"px-4 py-2 rounded font-medium {variant}{size}\">{}</button>",
                escape(props.str("text", ""))
            ));
        }
        "text" => {
            out.push_str(&format!(
                "<div class=\"text-{} font-{} text-{}\" style=\"white-space: pre-wrap\">{}</div>",
                escape(props.str("fontSize", "base")),
                escape(props.str("fontWeight", "normal")),
                escape(props.str("color", "gray-900")),
                escape(props.str("content", "")),
            ));
        }
        "input" => {
            out.push_str("<div class=\"space-y-1\">");
            let label = props.str("label", "");
            if !label.is_empty() {
                out.push_str(&format!("<label class=\"block text-sm font-medium text-gray-700\">{}", escape(label)));
                if props.flag("required") {
                    out.push_str("<span class=\"text-red-500 ml-1\">*</span>");
                }
                out.push_str("</label>");
            }
            out.push_str(&format!(
                "<input type=\"{}\" placeholder=\"{}\"{} class=\"input\">",
                escape(props.str("type", "text")),
                escape(props.str("placeholder", "")),
                if props.flag("required") { " required" } else { "" },
            ));
            out.push_str("</div>");
        }
        "container" => {
            let spacing = [("none", "0"), ("small", "2"), ("medium", "4"), ("large", "8")];
            let gap = lookup(&spacing, props.str("gap", "medium"), "4");
            let padding = lookup(&spacing, props.str("padding", "medium"), "4");
            let layout = lookup(
                &[("column", "flex-col"), ("row", "flex-row"), ("grid", "grid grid-cols-2")],
                props.str("layout", "column"),
                "flex-col",
            );
            out.push_str(&format!(
                "<div class=\"flex {layout} gap-{gap} p-{padding} border-2 border-dashed border-gray-300 rounded\" \
                 style=\"background-color: {}\">",
                escape(props.str("backgroundColor", "transparent")),
            ));
            render_children(out, component, "Container - Add components here");
            out.push_str("</div>");
        }
        "image" => {
            let width = if props.str("width", "full") == "full" { "w-full" } else { "w-auto" };
            out.push_str(&format!(
                "<div class=\"{width}\"><img src=\"{}\" alt=\"{}\" class=\"rounded object-{}\"></div>",
                escape(props.str("src", "")),
                escape(props.str("alt", "")),
                escape(props.str("objectFit", "cover")),
            ));
        }
        "table" => {
            let columns = props.list("columns");
            let border = if props.flag("bordered") { " border border-gray-300" } else { "" };
            out.push_str(&format!("<table class=\"min-w-full{border}\"><thead class=\"bg-gray-100\"><tr>"));
            for column in &columns {
                out.push_str(&format!("<th class=\"px-4 py-2 text-left\">{}</th>", escape(column)));
            }
            out.push_str("</tr></thead><tbody>");
            for row in 0..2 {
                let striped = props.flag("striped") && row == 0;
                out.push_str(if striped { "<tr class=\"bg-gray-50\">" } else { "<tr>" });
                for _ in &columns {
                    out.push_str("<td class=\"px-4 py-2\">Sample data</td>");
                }
                out.push_str("</tr>");
            }
            out.push_str("</tbody></table>");
        }
        "form" => {
            out.push_str(&format!(
                "<form class=\"form-{} space-y-4 border-2 border-dashed border-gray-300 rounded p-4\">",
                escape(props.str("layout", "vertical")),
            ));
            render_children(out, component, "Form - Add form fields here");
            out.push_str(&format!(
                "<div class=\"flex gap-2\"><button type=\"submit\" class=\"btn btn-primary\">{}</button>\
                 <button type=\"reset\" class=\"btn btn-secondary\">{}</button></div></form>",
                escape(props.str("submitLabel", "Submit")),
                escape(props.str("resetLabel", "Reset")),
            ));
        }
        "card" => {
            let elevation = lookup(
                &[("none", "shadow-none"), ("small", "shadow-sm"), ("medium", "shadow-md"), ("large", "shadow-lg")],
                props.str("elevation", "medium"),
                "shadow-md",
            );
            out.push_str(&format!("<div class=\"{elevation} rounded-lg overflow-hidden border border-gray-200\">"));
            if props.flag("showHeader") {
                out.push_str(&format!(
                    "<div class=\"px-4 py-3 bg-gray-50 border-b\"><h3 class=\"font-semibold\">{}</h3></div>",
                    escape(props.str("title", "")),
                ));
            }
            out.push_str("<div class=\"p-4\">");
            render_children(out, component, "Card content area");
            out.push_str("</div>");
            if props.flag("showFooter") {
                out.push_str("<div class=\"px-4 py-3 bg-gray-50 border-t\"><p class=\"text-sm text-gray-500\">Card footer</p></div>");
            }
            out.push_str("</div>");
        }
        unknown => {
            out.push_str(&format!(
                "<div class=\"p-4 bg-gray-100 rounded border border-gray-300\">Unknown component type: {}</div>",
                escape(unknown),
            ));
        }
    }

    out.push_str("</div>");
}
