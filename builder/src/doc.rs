//! Field model: form nodes, their attributes, and tree helpers.
//!
//! This module defines the data shape of a form (`FieldNode`), typed accessors
//! for the open-ended `props` JSON bag (`Attrs`), and the free functions that
//! walk a tree of nodes (lookup by id, key collection, fresh key generation).
//!
//! Data flows into this layer from imported documents and templates (JSON
//! deserialization) and from the palette (freshly created leaves). The store
//! owns the live tree; everything here is plain data and pure functions.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::consts::{COPY_KEY_INFIX, KEY_PATH_SEPARATOR, KEY_SUFFIX_LEN, ROW_CLASS};

/// Stable in-memory identifier for a field node. Never serialized.
pub type NodeId = Uuid;

/// A node in the form tree: either a leaf (renderable field) or a group.
///
/// Serialized names follow the form-rendering framework's field config.
/// Properties the builder does not model are kept in `extra` and written back
/// unchanged on export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    /// Synthetic identity, regenerated on deserialization.
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: NodeId,
    /// Value-binding key. Leaves normally carry one; groups normally do not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<FieldKey>,
    /// Widget tag for leaves (`"input"`, `"select"`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Column span token, e.g. `"col-span-6"`. Absent means full width.
    #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
    pub layout_class: Option<String>,
    /// Group container class; `"row"` marks a side-by-side row.
    #[serde(rename = "fieldGroupClassName", default, skip_serializing_if = "Option::is_none")]
    pub group_class: Option<String>,
    /// Ordered children. Present only on groups.
    #[serde(rename = "fieldGroup", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FieldNode>>,
    /// Presentation and validation metadata. Unknown keys round-trip.
    #[serde(rename = "props", default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    /// Seed value for the bound model entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Any other field-config property, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structural equality. The synthetic `id` is not part of it.
impl PartialEq for FieldNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.field_type == other.field_type
            && self.layout_class == other.layout_class
            && self.group_class == other.group_class
            && self.children == other.children
            && self.attributes == other.attributes
            && self.default_value == other.default_value
            && self.extra == other.extra
    }
}

/// Value-binding key of a node.
///
/// Either a plain name (`"email"`) or a path into nested model objects
/// (`["address", "street"]`). Both forms round-trip as written; numeric keys and
/// numeric path segments are normalized to strings. Lookups, uniqueness and
/// display use the joined form (`"address.street"`), which the key derefs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    joined: String,
    segments: Option<Vec<String>>,
}

impl FieldKey {
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self { joined: name.into(), segments: None }
    }

    /// A path key. A single segment is still written back as an array.
    #[must_use]
    pub fn path<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        Self { joined: segments.join(KEY_PATH_SEPARATOR), segments: Some(segments) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.joined
    }

    #[must_use]
    pub fn is_path(&self) -> bool {
        self.segments.is_some()
    }

    /// Model path segments; a plain name is a single segment.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        match &self.segments {
            Some(segments) => segments.iter().map(String::as_str).collect(),
            None => vec![self.joined.as_str()],
        }
    }

    /// Same shape with `suffix` appended to the name, or to the last path segment.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        match &self.segments {
            Some(segments) => {
                let mut segments = segments.clone();
                if let Some(last) = segments.last_mut() {
                    last.push_str(suffix);
                }
                Self::path(segments)
            }
            None => Self::name(format!("{}{suffix}", self.joined)),
        }
    }
}

impl std::ops::Deref for FieldKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.joined
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.joined)
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        Self::name(name)
    }
}

impl PartialEq<str> for FieldKey {
    fn eq(&self, other: &str) -> bool {
        self.joined == other
    }
}

impl PartialEq<&str> for FieldKey {
    fn eq(&self, other: &&str) -> bool {
        self.joined == *other
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.segments {
            Some(segments) => segments.serialize(serializer),
            None => serializer.serialize_str(&self.joined),
        }
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        fn scalar(value: &Value) -> Option<String> {
            match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        }

        let value = Value::deserialize(deserializer)?;
        let invalid = || -> D::Error { serde::de::Error::custom(format!("invalid field key: {value}")) };
        if let Some(name) = scalar(&value) {
            return Ok(Self::name(name));
        }
        let Value::Array(items) = &value else {
            return Err(invalid());
        };
        if items.is_empty() {
            return Err(invalid());
        }
        let segments = items.iter().map(scalar).collect::<Option<Vec<_>>>().ok_or_else(invalid)?;
        Ok(Self::path(segments))
    }
}

impl FieldNode {
    /// Create a leaf field with a key and widget type.
    #[must_use]
    pub fn leaf(key: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: Some(FieldKey::name(key)),
            field_type: Some(field_type.into()),
            layout_class: None,
            group_class: None,
            children: None,
            attributes: Map::new(),
            default_value: None,
            extra: Map::new(),
        }
    }

    /// Create a row group hosting two nodes side by side.
    ///
    /// Taking exactly two nodes keeps the core from ever producing an empty group.
    #[must_use]
    pub fn row(first: FieldNode, second: FieldNode) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: None,
            field_type: None,
            layout_class: None,
            group_class: Some(ROW_CLASS.to_owned()),
            children: Some(vec![first, second]),
            attributes: Map::new(),
            default_value: None,
            extra: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: Value) -> Self {
        self.attributes.insert(name.to_owned(), value);
        self
    }

    /// Builder-style default value setter.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Whether this node is a group (has a `fieldGroup`).
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    /// Whether this node is a row container.
    #[must_use]
    pub fn is_row(&self) -> bool {
        self.is_group() && self.group_class.as_deref() == Some(ROW_CLASS)
    }

    /// Children of a group; empty for leaves.
    #[must_use]
    pub fn child_nodes(&self) -> &[FieldNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Typed view over `attributes`.
    #[must_use]
    pub fn attrs(&self) -> Attrs<'_> {
        Attrs::new(&self.attributes)
    }

    /// Merge a sparse attribute patch. `null` values delete keys.
    ///
    /// Returns false (leaving the node untouched) when the patch is not an object.
    pub fn apply_patch(&mut self, patch: &Value) -> bool {
        let Some(incoming) = patch.as_object() else {
            return false;
        };
        for (k, v) in incoming {
            if v.is_null() {
                self.attributes.remove(k);
            } else {
                self.attributes.insert(k.clone(), v.clone());
            }
        }
        true
    }

    /// Assign fresh ids to this node and every descendant.
    pub fn regenerate_ids(&mut self) {
        self.id = Uuid::new_v4();
        if let Some(children) = self.children.as_mut() {
            for child in children {
                child.regenerate_ids();
            }
        }
    }
}

/// An entry of a select/radio/multicheckbox `options` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

/// Comparison applied by a custom validation condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionKind {
    Contains,
    NotContains,
    MinLength,
    MaxLength,
}

/// A custom validation condition stored under `validationConditions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCondition {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    pub value: String,
}

/// Typed access to common attribute keys of a `FieldNode.attributes` map.
pub struct Attrs<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Attrs<'a> {
    /// Wrap an attribute map for typed access.
    #[must_use]
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    fn str_of(&self, name: &str) -> Option<&'a str> {
        self.map.get(name).and_then(Value::as_str)
    }

    /// Display label. Empty string when absent.
    #[must_use]
    pub fn label(&self) -> &'a str {
        self.str_of("label").unwrap_or("")
    }

    /// Placeholder text, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'a str> {
        self.str_of("placeholder")
    }

    /// Help text shown under the field, if any.
    #[must_use]
    pub fn description(&self) -> Option<&'a str> {
        self.str_of("description")
    }

    /// HTML input type for `input` widgets (`"email"`, `"tel"`, ...).
    #[must_use]
    pub fn input_type(&self) -> Option<&'a str> {
        self.str_of("type")
    }

    /// Whether the field is required. Defaults to false.
    #[must_use]
    pub fn required(&self) -> bool {
        self.map.get("required").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Visible rows of a textarea, if set.
    #[must_use]
    pub fn rows(&self) -> Option<u64> {
        self.map.get("rows").and_then(Value::as_u64)
    }

    /// Choice list. Malformed entries are skipped.
    #[must_use]
    pub fn options(&self) -> Vec<SelectOption> {
        self.list_of("options")
    }

    /// Custom validation conditions. Malformed entries are skipped.
    #[must_use]
    pub fn validation_conditions(&self) -> Vec<ValidationCondition> {
        self.list_of("validationConditions")
    }

    fn list_of<T: serde::de::DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let Some(items) = self.map.get(name).and_then(Value::as_array) else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(parsed) => Some(parsed),
                Err(_) => None,
            })
            .collect()
    }
}

// ── Tree walks ──────────────────────────────────────────────────

/// Find a node at any depth by id.
#[must_use]
pub fn find(nodes: &[FieldNode], id: NodeId) -> Option<&FieldNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find(node.child_nodes(), id) {
            return Some(found);
        }
    }
    None
}

/// Find a node at any depth by id, mutably.
pub fn find_mut(nodes: &mut [FieldNode], id: NodeId) -> Option<&mut FieldNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_mut() {
            if let Some(found) = find_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Find the first node (depth-first) bound to `key`. Path keys match by their
/// joined form (`"address.street"`).
#[must_use]
pub fn find_by_key<'a>(nodes: &'a [FieldNode], key: &str) -> Option<&'a FieldNode> {
    for node in nodes {
        if node.key.as_deref() == Some(key) {
            return Some(node);
        }
        if let Some(found) = find_by_key(node.child_nodes(), key) {
            return Some(found);
        }
    }
    None
}

/// Follow child indices from the top level: `[2, 0]` is the first child of the third node.
#[must_use]
pub fn find_by_path<'a>(nodes: &'a [FieldNode], path: &[usize]) -> Option<&'a FieldNode> {
    let (&first, rest) = path.split_first()?;
    let node = nodes.get(first)?;
    if rest.is_empty() { Some(node) } else { find_by_path(node.child_nodes(), rest) }
}

/// Whether a node with `id` exists at any depth.
#[must_use]
pub fn contains(nodes: &[FieldNode], id: NodeId) -> bool {
    find(nodes, id).is_some()
}

/// Index of a top-level node by id.
#[must_use]
pub fn position(nodes: &[FieldNode], id: NodeId) -> Option<usize> {
    nodes.iter().position(|n| n.id == id)
}

/// Every key present in the tree, at any depth.
#[must_use]
pub fn collect_keys(nodes: &[FieldNode]) -> HashSet<String> {
    let mut keys = HashSet::new();
    collect_keys_into(nodes, &mut keys);
    keys
}

fn collect_keys_into(nodes: &[FieldNode], out: &mut HashSet<String>) {
    for node in nodes {
        if let Some(key) = &node.key {
            out.insert(key.as_str().to_owned());
        }
        collect_keys_into(node.child_nodes(), out);
    }
}

/// Random lowercase hex suffix of `KEY_SUFFIX_LEN` characters.
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    let n: u32 = rng.random();
    let hex = format!("{n:08x}");
    hex[..KEY_SUFFIX_LEN.min(hex.len())].to_owned()
}

/// `<base><infix><random hex>`, redrawn until it collides with nothing in `taken`.
pub fn unique_key<R: Rng + ?Sized>(base: &str, infix: &str, taken: &HashSet<String>, rng: &mut R) -> String {
    loop {
        let candidate = format!("{base}{infix}{}", random_suffix(rng));
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
}

/// Deep copy of `node` with fresh ids and a fresh key unique within `nodes`.
///
/// Keyed descendants of a copied group are re-keyed the same way so keys stay
/// unique across the whole tree. Returns `None` when `node` has no key.
pub fn duplicate_node<R: Rng + ?Sized>(node: &FieldNode, nodes: &[FieldNode], rng: &mut R) -> Option<FieldNode> {
    node.key.as_ref()?;
    let mut copy = node.clone();
    copy.regenerate_ids();
    let mut taken = collect_keys(nodes);
    rekey(&mut copy, &mut taken, rng);
    Some(copy)
}

fn rekey<R: Rng + ?Sized>(node: &mut FieldNode, taken: &mut HashSet<String>, rng: &mut R) {
    if let Some(key) = node.key.take() {
        let fresh = unique_key(key.as_str(), COPY_KEY_INFIX, taken, rng);
        let rekeyed = key.with_suffix(&fresh[key.len()..]);
        taken.insert(fresh);
        node.key = Some(rekeyed);
    }
    if let Some(children) = node.children.as_mut() {
        for child in children {
            rekey(child, taken, rng);
        }
    }
}
