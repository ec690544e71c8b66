//! Benchmark specification handling for svcb.
//!
//! A specification document (`spec.yml`) describes one benchmark, or several
//! variants of one, together with the architectures, language standard,
//! defines, and external dependencies it needs. This crate turns such a
//! document into normalized [`Benchmark`] values:
//!
//! - [`document`]: parse raw YAML into an untyped [`Document`]
//! - [`schema`] / [`validate`]: check a document against the versioned schema
//! - [`upgrade`]: migrate documents written against older schema versions
//! - [`variant`]: expand one document into its concrete benchmarks
//! - [`benchmark`]: the read-only benchmark model

pub mod benchmark;
pub mod check;
pub mod document;
pub mod error;
pub mod schema;
pub mod upgrade;
pub mod validate;
pub mod variant;

pub use benchmark::{Architectures, Benchmark, Language, LanguageFamily};
pub use check::{check_structure, Violation};
pub use document::{document_to_yaml, load_document, parse_document, schema_version, Document};
pub use error::{Result, SpecError};
pub use schema::{Schema, ANY_ARCHITECTURE};
pub use upgrade::{Migration, MigrationFn, MigrationTable};
pub use validate::{load_specification, validate};
pub use variant::expand;
