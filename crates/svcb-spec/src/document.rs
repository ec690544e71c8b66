//! Raw specification documents.
//!
//! A document is the untyped mapping produced by parsing a `spec.yml` file.
//! Nothing here knows about the schema; see [`crate::validate`] for that.

use std::path::Path;

use serde_json::Value;

use crate::error::{Result, SpecError};

/// An untyped specification document (top-level mapping).
///
/// Key order follows the source text.
pub type Document = serde_json::Map<String, Value>;

/// Key holding the schema version a document was written against.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Parse YAML text into a document.
pub fn parse_document(text: &str) -> Result<Document> {
    let value: Value = serde_yaml::from_str(text)?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SpecError::NotAMapping {
            found: kind_name(&other),
        }),
    }
}

/// Load and parse a specification file.
pub fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(SpecError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

/// Serialize a document back to YAML text.
pub fn document_to_yaml(doc: &Document) -> Result<String> {
    Ok(serde_yaml::to_string(doc)?)
}

/// Read the declared schema version of a document.
///
/// Fails with [`SpecError::MissingVersion`], [`SpecError::InvalidVersionType`]
/// or [`SpecError::InvalidVersionValue`], checked in that order.
pub fn schema_version(doc: &Document) -> Result<u64> {
    let value = doc.get(SCHEMA_VERSION_KEY).ok_or(SpecError::MissingVersion)?;
    let number = match value {
        Value::Number(n) => n,
        _ => return Err(SpecError::InvalidVersionType),
    };
    if let Some(v) = number.as_u64() {
        Ok(v)
    } else if number.is_i64() {
        Err(SpecError::InvalidVersionValue)
    } else {
        // Floats are not integers, even `1.0`.
        Err(SpecError::InvalidVersionType)
    }
}

/// Human-readable name of a value's JSON type.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
