//! Field palette and placement defaults for newly created fields.

#[cfg(test)]
#[path = "palette_test.rs"]
mod palette_test;

use serde::Serialize;
use serde_json::{Value, json};

use crate::doc::FieldNode;

/// One draggable entry of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteItem {
    /// Palette type passed to `create_field`.
    #[serde(rename = "type")]
    pub field_type: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const PALETTE: &[PaletteItem] = &[
    PaletteItem { field_type: "input", label: "Text Input", icon: "📝" },
    PaletteItem { field_type: "textarea", label: "Textarea", icon: "📄" },
    PaletteItem { field_type: "number", label: "Number", icon: "🔢" },
    PaletteItem { field_type: "email", label: "Email", icon: "✉️" },
    PaletteItem { field_type: "password", label: "Password", icon: "🔐" },
    PaletteItem { field_type: "telephone", label: "Telephone", icon: "☎️" },
    PaletteItem { field_type: "url", label: "URL", icon: "🔗" },
    PaletteItem { field_type: "select", label: "Select", icon: "📋" },
    PaletteItem { field_type: "radio", label: "Radio", icon: "🔘" },
    PaletteItem { field_type: "multicheckbox", label: "Multi Checkbox", icon: "☑️" },
    PaletteItem { field_type: "checkbox", label: "Checkbox", icon: "✅" },
    PaletteItem { field_type: "toggle", label: "Toggle", icon: "🔀" },
    PaletteItem { field_type: "datepicker", label: "Date", icon: "📅" },
    PaletteItem { field_type: "markdown", label: "Text Block", icon: "📰" },
];

/// Wrapper every palette-created field is rendered inside.
pub const FIELD_WRAPPER: &str = "field-wrapper";

/// Starting content of a new markdown text block.
const MARKDOWN_SEED: &str = "# Heading\n\nYour text here...";

/// Palette types that render as a plain `input` with an HTML input type.
const INPUT_TYPES: &[&str] = &["number", "email", "password", "telephone", "url"];

/// Look up a palette entry by type.
#[must_use]
pub fn item(field_type: &str) -> Option<&'static PaletteItem> {
    PALETTE.iter().find(|p| p.field_type == field_type)
}

/// Widget type and HTML input type a palette type maps to.
#[must_use]
pub fn widget_for(field_type: &str) -> (&str, Option<&'static str>) {
    if !INPUT_TYPES.contains(&field_type) {
        return (field_type, None);
    }
    let html = match field_type {
        "telephone" => "tel",
        "number" => "number",
        "email" => "email",
        "password" => "password",
        _ => "url",
    };
    ("input", Some(html))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn seeded_options(count: usize) -> Value {
    let options: Vec<Value> = (1..=count)
        .map(|i| json!({ "value": format!("option{i}"), "label": format!("Option {i}") }))
        .collect();
    Value::Array(options)
}

/// Create a leaf for a palette type, bound to `key`.
///
/// Unknown types pass through as the widget type with the generic defaults.
#[must_use]
pub fn create_field(field_type: &str, key: impl Into<String>) -> FieldNode {
    let (widget, html_type) = widget_for(field_type);
    let mut node = FieldNode::leaf(key, widget)
        .with_attribute("label", json!(format!("New {}", capitalize(field_type))))
        .with_attribute("placeholder", json!(format!("Enter {field_type}")));
    node.extra.insert("wrappers".to_owned(), json!([FIELD_WRAPPER]));

    if let Some(html_type) = html_type {
        node.attributes.insert("type".to_owned(), json!(html_type));
    }
    match field_type {
        "select" => {
            node.attributes.insert("options".to_owned(), seeded_options(2));
        }
        "radio" | "multicheckbox" => {
            node.attributes.insert("options".to_owned(), seeded_options(3));
        }
        "textarea" => {
            node.attributes.insert("rows".to_owned(), json!(5));
        }
        "checkbox" | "toggle" => {
            node.attributes.remove("placeholder");
        }
        "datepicker" => {
            node.attributes.insert("placeholder".to_owned(), json!("Select a date"));
        }
        "markdown" => {
            node.attributes.insert("label".to_owned(), json!("Text Block"));
            node.attributes.insert("placeholder".to_owned(), json!("Enter markdown content..."));
            node.default_value = Some(json!(MARKDOWN_SEED));
        }
        _ => {}
    }
    node
}
