//! Export/import document codec.
//!
//! A document is a JSON array of field configs, pretty-printed with two-space
//! indentation. No schema version; unknown properties round-trip.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use serde_json::Value;

use crate::consts::{DEFAULT_EXPORT_STEM, EXPORT_EXTENSION};
use crate::doc::FieldNode;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("document must be a JSON array of fields, found {found}")]
    NotAnArray { found: &'static str },
    #[error("field {index} is malformed: {source}")]
    InvalidNode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Serialize the top-level list as a pretty-printed document.
///
/// # Errors
///
/// Returns `Serialize` if an attribute value cannot be represented as JSON.
pub fn export_document(fields: &[FieldNode]) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(fields).map_err(DocumentError::Serialize)
}

/// Parse a document into a fresh top-level list. Every node gets a new id.
///
/// # Errors
///
/// Returns `Parse` for invalid JSON, `NotAnArray` when the top level is not an
/// array, and `InvalidNode` for the first element that is not a field config.
pub fn import_document(text: &str) -> Result<Vec<FieldNode>, DocumentError> {
    let value: Value = serde_json::from_str(text).map_err(DocumentError::Parse)?;
    let Value::Array(items) = value else {
        return Err(DocumentError::NotAnArray { found: kind_of(&value) });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| serde_json::from_value(item).map_err(|source| DocumentError::InvalidNode { index, source }))
        .collect()
}

/// Download file name for a form title: `<title>.json`, or the default stem
/// when the title is blank.
#[must_use]
pub fn export_file_name(title: &str) -> String {
    let stem = title.trim();
    let stem = if stem.is_empty() { DEFAULT_EXPORT_STEM } else { stem };
    format!("{stem}.{EXPORT_EXTENSION}")
}
