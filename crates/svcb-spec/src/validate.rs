//! Specification validation against a versioned schema.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::document::{load_document, schema_version, Document};
use crate::error::{Result, SpecError};
use crate::schema::Schema;

/// Validate a specification document against `schema`.
///
/// Checks run in order and stop at the first failure:
/// 1. `schema_version` is present, an integer, and non-negative.
/// 2. `schema_version` equals the schema's `__version__`. Structural rules
///    are version specific, so this must hold before they are consulted.
/// 3. The document satisfies every structural rule.
pub fn validate(doc: &Document, schema: &Schema) -> Result<()> {
    let have = schema_version(doc)?;
    let want = schema.version();
    if have != want {
        return Err(SpecError::VersionMismatch { have, want });
    }

    let violations = schema.check(&Value::Object(doc.clone()));
    if !violations.is_empty() {
        debug!(count = violations.len(), "specification failed structural checks");
    }
    // Only the first violation is reported.
    if let Some(first) = violations.into_iter().next() {
        return Err(SpecError::StructuralViolation {
            message: first.message,
            schema_path: first.schema_path,
            instance_path: first.instance_path,
        });
    }

    Ok(())
}

/// Load a specification file and validate it against `schema`.
pub fn load_specification(path: &Path, schema: &Schema) -> Result<Document> {
    let doc = load_document(path)?;
    validate(&doc, schema)?;
    debug!(path = %path.display(), "specification is valid");
    Ok(doc)
}
