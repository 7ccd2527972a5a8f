//! Rendering: the value model handed to the form renderer and a plain-text
//! outline of the tree.
//!
//! Both functions take read-only views of the field list; neither mutates
//! editor state.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde_json::{Map, Value};

use crate::doc::{FieldKey, FieldNode, NodeId};

/// Indent per tree level in the outline.
const INDENT: &str = "  ";
const SELECTED_MARKER: &str = "> ";
const UNSELECTED_MARKER: &str = "  ";

/// Build the mutable value model the renderer binds to, seeded from
/// `defaultValue`s.
///
/// Keyed leaves without a default are left out. A keyed group nests its
/// children's values under its key; an unkeyed group (a row) contributes its
/// children to the enclosing level. Path keys nest one object per segment.
#[must_use]
pub fn seed_value_model(fields: &[FieldNode]) -> Map<String, Value> {
    let mut model = Map::new();
    seed_into(fields, &mut model);
    model
}

fn seed_into(nodes: &[FieldNode], model: &mut Map<String, Value>) {
    for node in nodes {
        match (node.is_group(), &node.key) {
            (true, Some(key)) => {
                let mut nested = Map::new();
                seed_into(node.child_nodes(), &mut nested);
                if !nested.is_empty() {
                    insert_at(model, key, Value::Object(nested));
                }
            }
            (true, None) => seed_into(node.child_nodes(), model),
            (false, Some(key)) => {
                if let Some(value) = &node.default_value {
                    insert_at(model, key, value.clone());
                }
            }
            (false, None) => {}
        }
    }
}

/// Store `value` under `key`, creating intermediate objects for path keys.
fn insert_at(model: &mut Map<String, Value>, key: &FieldKey, value: Value) {
    let segments = key.segments();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut level = model;
    for segment in parents {
        let slot = level.entry((*segment).to_owned()).or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        level = next;
    }
    level.insert((*last).to_owned(), value);
}

/// Render an indented outline of the tree, one node per line.
///
/// The selected node is marked with `>`. Row groups show their column count;
/// leaves show type, key, label, column class and a `*` when required.
#[must_use]
pub fn render_outline(fields: &[FieldNode], selected: Option<NodeId>) -> String {
    let mut out = String::new();
    if fields.is_empty() {
        out.push_str("(empty form)\n");
        return out;
    }
    outline_into(fields, selected, 0, &mut out);
    out
}

fn outline_into(nodes: &[FieldNode], selected: Option<NodeId>, depth: usize, out: &mut String) {
    for node in nodes {
        out.push_str(if selected == Some(node.id) { SELECTED_MARKER } else { UNSELECTED_MARKER });
        out.push_str(&INDENT.repeat(depth));
        describe(node, out);
        out.push('\n');
        if node.is_group() {
            outline_into(node.child_nodes(), selected, depth + 1, out);
        }
    }
}

fn describe(node: &FieldNode, out: &mut String) {
    if node.is_group() {
        let (kind, unit) = if node.is_row() { ("row", "columns") } else { ("group", "children") };
        out.push_str(kind);
        if let Some(key) = &node.key {
            out.push_str(&format!(" {key}"));
        }
        out.push_str(&format!(" ({} {unit})", node.child_nodes().len()));
    } else {
        let attrs = node.attrs();
        let widget = match (node.field_type.as_deref(), attrs.input_type()) {
            (Some(widget), Some(html)) => format!("{widget}/{html}"),
            (Some(widget), None) => widget.to_owned(),
            (None, _) => "?".to_owned(),
        };
        out.push_str(&format!("[{widget}] {}", node.key.as_deref().unwrap_or("-")));
        if !attrs.label().is_empty() {
            out.push_str(&format!(" \"{}\"", attrs.label()));
        }
        if attrs.required() {
            out.push_str(" *");
        }
    }
    if let Some(class) = &node.layout_class {
        out.push_str(&format!(" <{class}>"));
    }
}
