//! Error types for specification loading, validation, and upgrading.

use std::path::PathBuf;

/// Errors that can occur while handling benchmark specifications.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The raw text could not be parsed as a document.
    #[error("malformed document: {0}")]
    MalformedDocument(#[from] serde_yaml::Error),

    /// The document parsed, but its top level is not a mapping.
    #[error("specification must be a mapping at the top level, found {found}")]
    NotAMapping { found: &'static str },

    #[error("'schema_version' is missing")]
    MissingVersion,

    #[error("'schema_version' should map to an integer")]
    InvalidVersionType,

    #[error("'schema_version' should map to an integer >= 0")]
    InvalidVersionValue,

    /// The document was written against a different schema version.
    #[error(
        "schema version used by benchmark ({have}) does not match the currently supported schema ({want})"
    )]
    VersionMismatch { have: u64, want: u64 },

    /// A structural rule of the schema was violated.
    #[error("{message} (at {instance_path}, schema rule {schema_path})")]
    StructuralViolation {
        message: String,
        /// Keyword/property trail inside the schema, e.g. `properties/name/type`.
        schema_path: String,
        /// Trail inside the document, e.g. `/sources/0`.
        instance_path: String,
    },

    /// A document fragment could not be read as a concrete benchmark.
    #[error("invalid benchmark: {0}")]
    InvalidBenchmark(#[from] serde_json::Error),

    #[error("cannot downgrade benchmark specification from schema {from} to older schema {to}")]
    DowngradeNotSupported { from: u64, to: u64 },

    #[error("no migration registered from schema {from} to {to}")]
    NoMigrationPath { from: u64, to: u64 },

    /// A migration step was registered that does not move forward.
    #[error("migration step from schema {from} to {to} does not move forward")]
    InvalidMigration { from: u64, to: u64 },

    /// A migration produced a document the target schema rejects.
    ///
    /// This is a bug in the migration itself, never a user error.
    #[error("migration from schema {from} to {to} produced an invalid document: {source}")]
    MigrationProducedInvalid {
        from: u64,
        to: u64,
        #[source]
        source: Box<SpecError>,
    },

    /// The schema document itself is unusable.
    #[error("invalid schema: {detail}")]
    InvalidSchema { detail: String },

    #[error("specification file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Whether this error concerns the document's `schema_version` field.
    ///
    /// Callers may respond to these by attempting an upgrade.
    pub fn is_version_error(&self) -> bool {
        matches!(
            self,
            SpecError::MissingVersion
                | SpecError::InvalidVersionType
                | SpecError::InvalidVersionValue
                | SpecError::VersionMismatch { .. }
        )
    }
}

/// Result type for specification operations.
pub type Result<T> = std::result::Result<T, SpecError>;
