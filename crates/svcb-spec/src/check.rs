//! Structural checking of documents against JSON-Schema rules.
//!
//! Rules are compiled once with [`jsonschema`] and every failure is reported
//! as a [`Violation`] carrying the failing rule's location in the schema and
//! the offending value's location in the document.

use jsonschema::{ValidationError, Validator};
use serde_json::Value;

use crate::error::{Result, SpecError};

/// One failed structural rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub message: String,
    /// Slash-separated path of the failing rule, e.g. `properties/name/type`.
    pub schema_path: String,
    /// JSON pointer to the offending value; `/` for the document root.
    pub instance_path: String,
}

impl From<ValidationError<'_>> for Violation {
    fn from(err: ValidationError<'_>) -> Self {
        let schema_path = err.schema_path.to_string();
        let instance_path = err.instance_path.to_string();
        Self {
            message: err.to_string(),
            schema_path: schema_path.trim_start_matches('/').to_string(),
            instance_path: if instance_path.is_empty() {
                "/".into()
            } else {
                instance_path
            },
        }
    }
}

/// Compile structural rules into a reusable validator.
pub fn compile(rules: &Value) -> Result<Validator> {
    jsonschema::validator_for(rules).map_err(|e| SpecError::InvalidSchema {
        detail: format!("schema rules do not compile: {e}"),
    })
}

/// Every violation of `validator` by `value`, in the order they are found.
pub fn violations(validator: &Validator, value: &Value) -> Vec<Violation> {
    validator.iter_errors(value).map(Violation::from).collect()
}

/// Check `value` against uncompiled `rules`.
pub fn check_structure(value: &Value, rules: &Value) -> Result<Vec<Violation>> {
    Ok(violations(&compile(rules)?, value))
}
