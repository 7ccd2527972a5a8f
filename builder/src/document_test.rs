use serde_json::json;

use crate::doc::FieldKey;

use super::*;

fn half(mut node: FieldNode) -> FieldNode {
    node.layout_class = Some("col-span-6".into());
    node
}

fn sample() -> Vec<FieldNode> {
    vec![
        FieldNode::leaf("name", "input").with_attribute("label", json!("Name")),
        FieldNode::row(
            half(FieldNode::leaf("city", "input")),
            half(FieldNode::leaf("zip", "input").with_attribute("maxLengthHint", json!(5))),
        ),
        FieldNode::leaf("notes", "textarea")
            .with_attribute("rows", json!(5))
            .with_attribute("x-custom", json!({ "nested": [1, 2, 3] }))
            .with_default(json!("none")),
    ]
}

#[test]
fn round_trip_preserves_structure() {
    let fields = sample();
    let text = export_document(&fields).expect("export");
    let back = import_document(&text).expect("import");
    assert_eq!(back, fields);
    assert_ne!(back[0].id, fields[0].id);
}

#[test]
fn export_is_two_space_pretty_json() {
    let text = export_document(&[FieldNode::leaf("a", "input")]).expect("export");
    assert_eq!(text, "[\n  {\n    \"key\": \"a\",\n    \"type\": \"input\"\n  }\n]");
}

#[test]
fn export_uses_framework_property_names() {
    let text = export_document(&sample()).expect("export");
    assert!(text.contains("\"fieldGroupClassName\": \"row\""));
    assert!(text.contains("\"fieldGroup\""));
    assert!(text.contains("\"className\": \"col-span-6\""));
    assert!(text.contains("\"props\""));
    assert!(text.contains("\"defaultValue\": \"none\""));
    assert!(!text.contains("\"id\""));
}

#[test]
fn empty_array_is_empty_list() {
    assert!(import_document("[]").expect("import").is_empty());
    assert_eq!(export_document(&[]).expect("export"), "[]");
}

#[test]
fn unknown_top_level_properties_survive() {
    let text = r#"[{"key":"a","type":"input","wrappers":["field-wrapper"],"validators":{"validation":["email"]}}]"#;
    let fields = import_document(text).expect("import");
    let out: Value = serde_json::from_str(&export_document(&fields).expect("export")).expect("json");
    assert_eq!(out[0]["wrappers"], json!(["field-wrapper"]));
    assert_eq!(out[0]["validators"]["validation"], json!(["email"]));
}

#[test]
fn path_keys_round_trip_verbatim() {
    let text = r#"[{"key":["address","street"],"type":"input"},{"key":"name","type":"input"}]"#;
    let fields = import_document(text).expect("import");
    assert_eq!(fields[0].key.as_deref(), Some("address.street"));
    assert!(fields[0].key.as_ref().is_some_and(FieldKey::is_path));

    let out: Value = serde_json::from_str(&export_document(&fields).expect("export")).expect("json");
    assert_eq!(out, serde_json::from_str::<Value>(text).expect("json"));
}

#[test]
fn invalid_json_is_parse_error() {
    assert!(matches!(import_document("[{"), Err(DocumentError::Parse(_))));
    assert!(matches!(import_document(""), Err(DocumentError::Parse(_))));
}

#[test]
fn non_array_documents_are_rejected() {
    assert!(matches!(import_document("{}"), Err(DocumentError::NotAnArray { found: "an object" })));
    assert!(matches!(import_document("42"), Err(DocumentError::NotAnArray { found: "a number" })));
    assert!(matches!(import_document("\"x\""), Err(DocumentError::NotAnArray { found: "a string" })));
    assert!(matches!(import_document("null"), Err(DocumentError::NotAnArray { found: "null" })));
}

#[test]
fn non_object_element_reports_index() {
    let err = import_document(r#"[{"key":"a"}, 7]"#).expect_err("rejects");
    assert!(matches!(err, DocumentError::InvalidNode { index: 1, .. }));
    assert!(err.to_string().starts_with("field 1 is malformed"));
}

#[test]
fn file_name_uses_title() {
    assert_eq!(export_file_name("Signup"), "Signup.json");
    assert_eq!(export_file_name("  Contact us "), "Contact us.json");
}

#[test]
fn blank_title_falls_back_to_default_name() {
    assert_eq!(export_file_name(""), "form-settings.json");
    assert_eq!(export_file_name("   "), "form-settings.json");
}
