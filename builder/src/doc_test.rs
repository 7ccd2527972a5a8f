use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use super::*;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn sample_row() -> FieldNode {
    FieldNode::row(FieldNode::leaf("first", "input"), FieldNode::leaf("last", "input"))
}

// =============================================================
// Serde
// =============================================================

#[test]
fn leaf_serializes_with_framework_names() {
    let node = FieldNode::leaf("email", "input")
        .with_attribute("label", json!("Email"))
        .with_default(json!("a@b.c"));
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(
        value,
        json!({
            "key": "email",
            "type": "input",
            "props": { "label": "Email" },
            "defaultValue": "a@b.c"
        })
    );
}

#[test]
fn id_is_never_serialized() {
    let node = FieldNode::leaf("a", "input");
    let value = serde_json::to_value(&node).unwrap();
    assert!(value.get("id").is_none());
}

#[test]
fn row_serializes_group_class_and_children() {
    let value = serde_json::to_value(sample_row()).unwrap();
    assert_eq!(value["fieldGroupClassName"], json!("row"));
    assert_eq!(value["fieldGroup"].as_array().unwrap().len(), 2);
    assert!(value.get("key").is_none());
    assert!(value.get("type").is_none());
}

#[test]
fn unknown_top_level_properties_round_trip() {
    let raw = json!({
        "key": "name",
        "type": "input",
        "wrappers": ["field-wrapper"],
        "expressions": { "hide": "model.x" },
        "props": { "label": "Name", "customThing": [1, 2, 3] }
    });
    let node: FieldNode = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(node.extra.get("wrappers"), Some(&json!(["field-wrapper"])));
    assert_eq!(node.attributes.get("customThing"), Some(&json!([1, 2, 3])));
    assert_eq!(serde_json::to_value(&node).unwrap(), raw);
}

#[test]
fn incoming_id_property_is_preserved_as_extra() {
    let node: FieldNode = serde_json::from_value(json!({ "key": "a", "id": "dom-id" })).unwrap();
    assert_eq!(node.extra.get("id"), Some(&json!("dom-id")));
    assert_eq!(serde_json::to_value(&node).unwrap()["id"], json!("dom-id"));
}

#[test]
fn numeric_key_is_normalized_to_string() {
    let node: FieldNode = serde_json::from_value(json!({ "key": 3, "type": "input" })).unwrap();
    assert_eq!(node.key.as_deref(), Some("3"));
}

#[test]
fn array_key_is_a_path() {
    let node: FieldNode = serde_json::from_value(json!({ "key": ["address", 0, "street"] })).unwrap();
    let key = node.key.as_ref().unwrap();
    assert!(key.is_path());
    assert_eq!(key.segments(), ["address", "0", "street"]);
    assert_eq!(*key, "address.0.street");
    assert_eq!(serde_json::to_value(&node).unwrap()["key"], json!(["address", "0", "street"]));
}

#[test]
fn empty_or_nested_array_key_is_rejected() {
    assert!(serde_json::from_value::<FieldNode>(json!({ "key": [] })).is_err());
    assert!(serde_json::from_value::<FieldNode>(json!({ "key": [["a"]] })).is_err());
}

#[test]
fn object_key_is_rejected() {
    let result: Result<FieldNode, _> = serde_json::from_value(json!({ "key": { "nested": true } }));
    assert!(result.is_err());
}

#[test]
fn plain_group_is_tolerated_on_import() {
    let node: FieldNode = serde_json::from_value(json!({
        "fieldGroup": [{ "key": "a", "type": "input" }]
    }))
    .unwrap();
    assert!(node.is_group());
    assert!(!node.is_row());
    assert_eq!(node.child_nodes().len(), 1);
}

#[test]
fn deserialization_assigns_distinct_ids() {
    let a: FieldNode = serde_json::from_value(json!({ "key": "a" })).unwrap();
    let b: FieldNode = serde_json::from_value(json!({ "key": "a" })).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(a, b);
}

// =============================================================
// Equality
// =============================================================

#[test]
fn equality_ignores_id() {
    let a = FieldNode::leaf("a", "input");
    let mut b = a.clone();
    b.regenerate_ids();
    assert_ne!(a.id, b.id);
    assert_eq!(a, b);
}

#[test]
fn equality_sees_attribute_changes() {
    let a = FieldNode::leaf("a", "input");
    let b = a.clone().with_attribute("label", json!("A"));
    assert_ne!(a, b);
}

// =============================================================
// Kind helpers
// =============================================================

#[test]
fn leaf_is_not_group() {
    let node = FieldNode::leaf("a", "input");
    assert!(!node.is_group());
    assert!(!node.is_row());
    assert!(node.child_nodes().is_empty());
}

#[test]
fn row_constructor_produces_row_group() {
    let row = sample_row();
    assert!(row.is_group());
    assert!(row.is_row());
    assert!(row.key.is_none());
    assert_eq!(row.child_nodes().len(), 2);
}

// =============================================================
// Attrs
// =============================================================

#[test]
fn attrs_defaults_when_absent() {
    let node = FieldNode::leaf("a", "input");
    let attrs = node.attrs();
    assert_eq!(attrs.label(), "");
    assert!(attrs.placeholder().is_none());
    assert!(attrs.description().is_none());
    assert!(!attrs.required());
    assert!(attrs.rows().is_none());
    assert!(attrs.options().is_empty());
    assert!(attrs.validation_conditions().is_empty());
}

#[test]
fn attrs_reads_common_keys() {
    let node = FieldNode::leaf("a", "input")
        .with_attribute("label", json!("Phone"))
        .with_attribute("placeholder", json!("+1"))
        .with_attribute("required", json!(true))
        .with_attribute("type", json!("tel"))
        .with_attribute("rows", json!(4));
    let attrs = node.attrs();
    assert_eq!(attrs.label(), "Phone");
    assert_eq!(attrs.placeholder(), Some("+1"));
    assert!(attrs.required());
    assert_eq!(attrs.input_type(), Some("tel"));
    assert_eq!(attrs.rows(), Some(4));
}

#[test]
fn attrs_options_skip_malformed_entries() {
    let node = FieldNode::leaf("a", "select").with_attribute(
        "options",
        json!([
            { "label": "One", "value": 1 },
            "garbage",
            { "label": "Two", "value": "two" }
        ]),
    );
    let options = node.attrs().options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0], SelectOption { label: "One".into(), value: json!(1) });
    assert_eq!(options[1].value, json!("two"));
}

#[test]
fn attrs_validation_conditions_parse_kinds() {
    let node = FieldNode::leaf("a", "input").with_attribute(
        "validationConditions",
        json!([
            { "type": "minLength", "value": "3" },
            { "type": "notContains", "value": "spam" },
            { "type": "unknown", "value": "x" }
        ]),
    );
    let conditions = node.attrs().validation_conditions();
    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions[0].kind, ConditionKind::MinLength);
    assert_eq!(conditions[1].kind, ConditionKind::NotContains);
    assert_eq!(conditions[1].value, "spam");
}

// =============================================================
// apply_patch
// =============================================================

#[test]
fn apply_patch_merges_and_deletes() {
    let mut node = FieldNode::leaf("a", "input")
        .with_attribute("label", json!("Old"))
        .with_attribute("placeholder", json!("p"));
    assert!(node.apply_patch(&json!({ "label": "New", "placeholder": null, "required": true })));
    assert_eq!(node.attrs().label(), "New");
    assert!(node.attrs().placeholder().is_none());
    assert!(node.attrs().required());
}

#[test]
fn apply_patch_rejects_non_object() {
    let mut node = FieldNode::leaf("a", "input").with_attribute("label", json!("Keep"));
    assert!(!node.apply_patch(&json!([1, 2])));
    assert_eq!(node.attrs().label(), "Keep");
}

// =============================================================
// Tree walks
// =============================================================

#[test]
fn find_reaches_nested_nodes() {
    let row = sample_row();
    let nested_id = row.child_nodes()[1].id;
    let nodes = vec![FieldNode::leaf("top", "input"), row];
    let found = find(&nodes, nested_id).unwrap();
    assert_eq!(found.key.as_deref(), Some("last"));
    assert!(contains(&nodes, nested_id));
    assert!(!contains(&nodes, Uuid::new_v4()));
}

#[test]
fn find_mut_allows_nested_edit() {
    let row = sample_row();
    let nested_id = row.child_nodes()[0].id;
    let mut nodes = vec![row];
    find_mut(&mut nodes, nested_id).unwrap().key = Some("renamed".into());
    assert_eq!(nodes[0].child_nodes()[0].key.as_deref(), Some("renamed"));
}

#[test]
fn find_by_key_searches_depth_first() {
    let nodes = vec![FieldNode::leaf("top", "input"), sample_row()];
    assert_eq!(find_by_key(&nodes, "last").map(|n| n.id), Some(nodes[1].child_nodes()[1].id));
    assert_eq!(find_by_key(&nodes, "top").map(|n| n.id), Some(nodes[0].id));
    assert!(find_by_key(&nodes, "missing").is_none());
}

#[test]
fn find_by_path_follows_child_indices() {
    let nodes = vec![FieldNode::leaf("top", "input"), sample_row()];
    assert_eq!(find_by_path(&nodes, &[0]).and_then(|n| n.key.as_deref()), Some("top"));
    assert_eq!(find_by_path(&nodes, &[1, 1]).and_then(|n| n.key.as_deref()), Some("last"));
    assert!(find_by_path(&nodes, &[1, 5]).is_none());
    assert!(find_by_path(&nodes, &[0, 0]).is_none());
    assert!(find_by_path(&nodes, &[]).is_none());
}

#[test]
fn position_is_top_level_only() {
    let row = sample_row();
    let row_id = row.id;
    let nested_id = row.child_nodes()[0].id;
    let nodes = vec![FieldNode::leaf("top", "input"), row];
    assert_eq!(position(&nodes, row_id), Some(1));
    assert_eq!(position(&nodes, nested_id), None);
}

#[test]
fn collect_keys_walks_groups() {
    let nodes = vec![FieldNode::leaf("top", "input"), sample_row()];
    let keys = collect_keys(&nodes);
    assert_eq!(keys.len(), 3);
    assert!(keys.contains("first"));
    assert!(keys.contains("last"));
}

#[test]
fn random_suffix_is_hex_of_fixed_length() {
    let suffix = random_suffix(&mut rng());
    assert_eq!(suffix.len(), KEY_SUFFIX_LEN);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn unique_key_avoids_taken_keys() {
    let mut taken = HashSet::new();
    let first = unique_key("a", COPY_KEY_INFIX, &taken, &mut rng());
    taken.insert(first.clone());
    // Same seed would reproduce `first`; it must be skipped.
    let second = unique_key("a", COPY_KEY_INFIX, &taken, &mut rng());
    assert!(first.starts_with("a_copy_"));
    assert_ne!(first, second);
}

#[test]
fn duplicate_node_requires_key() {
    let row = sample_row();
    let nodes = vec![row.clone()];
    assert!(duplicate_node(&row, &nodes, &mut rng()).is_none());
}

#[test]
fn duplicate_node_is_deep_and_rekeyed() {
    let original = FieldNode::leaf("x", "input").with_attribute("label", json!("X"));
    let nodes = vec![original.clone()];
    let mut copy = duplicate_node(&original, &nodes, &mut rng()).unwrap();
    assert_ne!(copy.id, original.id);
    assert_ne!(copy.key, original.key);
    assert!(copy.key.as_deref().unwrap().starts_with("x_copy_"));
    copy.attributes.insert("label".into(), json!("Changed"));
    assert_eq!(original.attrs().label(), "X");
}

#[test]
fn duplicate_path_key_suffixes_last_segment() {
    let mut original = FieldNode::leaf("unused", "input");
    original.key = Some(FieldKey::path(["address", "street"]));
    let nodes = vec![original.clone()];
    let copy = duplicate_node(&original, &nodes, &mut rng()).unwrap();
    let key = copy.key.as_ref().unwrap();
    assert!(key.is_path());
    assert_eq!(key.segments()[0], "address");
    assert!(key.segments()[1].starts_with("street_copy_"));
    assert!(key.starts_with("address.street_copy_"));
}

#[test]
fn path_keys_are_found_and_collected_by_joined_form() {
    let mut street = FieldNode::leaf("unused", "input");
    street.key = Some(FieldKey::path(["address", "street"]));
    let nodes = vec![FieldNode::leaf("name", "input"), street];
    assert_eq!(find_by_key(&nodes, "address.street").map(|n| n.id), Some(nodes[1].id));
    assert!(collect_keys(&nodes).contains("address.street"));
}

#[test]
fn duplicate_keyed_group_rekeys_descendants() {
    let mut group = sample_row();
    group.key = Some("address".into());
    let nodes = vec![group.clone()];
    let copy = duplicate_node(&group, &nodes, &mut rng()).unwrap();
    let mut all = nodes.clone();
    all.push(copy.clone());
    assert_eq!(collect_keys(&all).len(), 6);
    assert_ne!(copy.child_nodes()[0].id, group.child_nodes()[0].id);
}
