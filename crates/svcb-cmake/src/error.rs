//! Error types for build declaration generation.

use std::path::PathBuf;

use svcb_spec::LanguageFamily;

/// Errors that can occur while generating CMake declarations.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A benchmark names a dependency no resolver is registered for.
    #[error("unhandled benchmark dependency \"{0}\"")]
    UnsupportedDependency(String),

    /// A resolver has no attachment logic for the benchmark's language family.
    #[error("dependency \"{dependency}\" cannot be attached to {family} benchmark \"{benchmark}\"")]
    UnknownLanguageFamily {
        dependency: String,
        benchmark: String,
        family: LanguageFamily,
    },

    /// Dependency configuration has the wrong shape.
    #[error("invalid configuration for dependency \"{dependency}\": {detail}")]
    InvalidDependencyConfig { dependency: String, detail: String },

    /// The source root is missing or not a directory.
    #[error("source root {} is unusable: {detail}", path.display())]
    SourceRoot { path: PathBuf, detail: String },
}

/// Result type for emission operations.
pub type Result<T> = std::result::Result<T, EmitError>;
