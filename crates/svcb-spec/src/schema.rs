//! The versioned schema that specification documents are checked against.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::Value;

use crate::check::{self, Violation};
use crate::error::{Result, SpecError};

/// Bundled schema text.
const BUILTIN_SCHEMA: &str = include_str!("../schema/schema.yml");

/// Key holding the schema's own version.
pub const SCHEMA_VERSION_FIELD: &str = "__version__";

/// The set marker meaning "builds for every architecture".
pub const ANY_ARCHITECTURE: &str = "any";

/// A loaded, immutable schema document with its compiled rules.
#[derive(Clone)]
pub struct Schema {
    version: u64,
    rules: Value,
    validator: Arc<Validator>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("version", &self.version)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.rules == other.rules
    }
}

impl Schema {
    /// Build a schema from an already-parsed value.
    ///
    /// The value must be a mapping with a non-negative integer `__version__`
    /// whose remaining keys compile as JSON-Schema rules.
    pub fn from_value(rules: Value) -> Result<Self> {
        let version = rules
            .as_object()
            .ok_or_else(|| SpecError::InvalidSchema {
                detail: "schema must be a mapping".into(),
            })?
            .get(SCHEMA_VERSION_FIELD)
            .and_then(Value::as_u64)
            .ok_or_else(|| SpecError::InvalidSchema {
                detail: format!("schema is missing an integer '{SCHEMA_VERSION_FIELD}'"),
            })?;
        let validator = Arc::new(check::compile(&rules)?);
        Ok(Self {
            version,
            rules,
            validator,
        })
    }

    /// Parse a schema from YAML text.
    pub fn parse(text: &str) -> Result<Self> {
        let rules: Value = serde_yaml::from_str(text)?;
        Self::from_value(rules)
    }

    /// Load a schema from a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SpecError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// The schema bundled with this crate.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_SCHEMA)
    }

    /// Schema version (`__version__`).
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Raw structural rules.
    pub fn rules(&self) -> &Value {
        &self.rules
    }

    /// Every structural rule `value` breaks.
    pub fn check(&self, value: &Value) -> Vec<Violation> {
        check::violations(&self.validator, value)
    }

    /// All concrete architecture identifiers the schema recognizes.
    ///
    /// Read from `properties.architectures.oneOf[0].items.enum`.
    pub fn architectures(&self) -> Result<BTreeSet<String>> {
        let values = self
            .rules
            .pointer("/properties/architectures/oneOf/0/items/enum")
            .and_then(Value::as_array)
            .ok_or_else(|| SpecError::InvalidSchema {
                detail: "schema does not enumerate architectures".into(),
            })?;
        Ok(values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }
}
