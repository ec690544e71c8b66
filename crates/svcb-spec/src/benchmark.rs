//! Normalized benchmark model.
//!
//! A [`Benchmark`] is one concrete, expansion-resolved buildable unit. It is
//! built once from a document fragment (optional fields defaulted at
//! construction) and is read-only afterwards.

use std::fmt;

use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{kind_name, Document};
use crate::error::{Result, SpecError};
use crate::schema::ANY_ARCHITECTURE;

/// Marker in a language tag that denotes the C++ dialect family.
const CXX_MARKER: &str = "++";

/// Architectures a benchmark can be built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Architectures {
    /// Builds for whatever architecture the compiler targets.
    Any,
    /// Builds only for the listed architectures, in declaration order.
    Explicit(Vec<String>),
}

impl Architectures {
    /// The identifiers to iterate over when emitting targets.
    ///
    /// [`Architectures::Any`] yields the single `"any"` marker rather than
    /// being expanded into concrete names.
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            Architectures::Any => vec![ANY_ARCHITECTURE],
            Architectures::Explicit(archs) => archs.iter().map(String::as_str).collect(),
        }
    }
}

impl Serialize for Architectures {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Architectures::Any => serializer.serialize_str(ANY_ARCHITECTURE),
            Architectures::Explicit(archs) => {
                let mut seq = serializer.serialize_seq(Some(archs.len()))?;
                for arch in archs {
                    seq.serialize_element(arch)?;
                }
                seq.end()
            }
        }
    }
}

/// Language family a benchmark is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageFamily {
    C,
    Cxx,
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageFamily::C => write!(f, "C"),
            LanguageFamily::Cxx => write!(f, "C++"),
        }
    }
}

/// A language and standard tag such as `c99` or `gnu++11`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag exactly as written.
    pub fn tag(&self) -> &str {
        &self.0
    }

    /// C++ if the tag carries the `++` marker, C otherwise.
    pub fn family(&self) -> LanguageFamily {
        if self.0.contains(CXX_MARKER) {
            LanguageFamily::Cxx
        } else {
            LanguageFamily::C
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw shape of a concrete benchmark document.
#[derive(Debug, Deserialize)]
struct RawBenchmark {
    #[serde(default)]
    schema_version: Option<u64>,
    name: String,
    #[serde(default)]
    comments: String,
    sources: Vec<String>,
    architectures: RawArchitectures,
    language: String,
    #[serde(default)]
    defines: Vec<String>,
    #[serde(default)]
    dependencies: serde_json::Map<String, Value>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArchitectures {
    Marker(String),
    List(Vec<String>),
}

/// One concrete benchmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Benchmark {
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<u64>,
    name: String,
    comments: String,
    sources: Vec<String>,
    architectures: Architectures,
    language: Language,
    defines: Vec<String>,
    dependencies: serde_json::Map<String, Value>,
    categories: Vec<String>,
}

impl Benchmark {
    /// Build a benchmark from a concrete (already expanded) document.
    ///
    /// `comments`, `defines`, `dependencies` and `categories` default to
    /// empty. A document still carrying `variants` is rejected; expand it
    /// with [`crate::variant::expand`] first.
    pub fn from_document(doc: Document) -> Result<Self> {
        if doc.contains_key("variants") {
            return Err(violation(
                "variants",
                "benchmark must be expanded before it can be constructed",
            ));
        }

        let raw: RawBenchmark = serde_json::from_value(Value::Object(doc))?;

        let architectures = match raw.architectures {
            RawArchitectures::Marker(marker) if marker == ANY_ARCHITECTURE => Architectures::Any,
            RawArchitectures::Marker(other) => {
                return Err(violation(
                    "architectures",
                    &format!("{other:?} is neither \"{ANY_ARCHITECTURE}\" nor a list"),
                ));
            }
            RawArchitectures::List(archs) => {
                if archs.is_empty() {
                    return Err(violation("architectures", "architecture list is empty"));
                }
                if archs.iter().any(|a| a == ANY_ARCHITECTURE) {
                    return Err(violation(
                        "architectures",
                        &format!("\"{ANY_ARCHITECTURE}\" cannot appear inside an architecture list"),
                    ));
                }
                Architectures::Explicit(archs)
            }
        };

        Ok(Self {
            schema_version: raw.schema_version,
            name: raw.name,
            comments: raw.comments,
            sources: raw.sources,
            architectures,
            language: Language::new(raw.language),
            defines: raw.defines,
            dependencies: raw.dependencies,
            categories: raw.categories,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn architectures(&self) -> &Architectures {
        &self.architectures
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Preprocessor defines (global defines, then variant defines).
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Dependency name to dependency-specific configuration, in declaration order.
    pub fn dependencies(&self) -> &serde_json::Map<String, Value> {
        &self.dependencies
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_language_c(&self) -> bool {
        self.language.family() == LanguageFamily::C
    }

    pub fn is_language_cxx(&self) -> bool {
        self.language.family() == LanguageFamily::Cxx
    }

    /// The normalized document this benchmark represents.
    pub fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(SpecError::NotAMapping {
                found: kind_name(&other),
            }),
        }
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yaml = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&yaml)
    }
}

fn violation(field: &str, message: &str) -> SpecError {
    SpecError::StructuralViolation {
        message: message.to_string(),
        schema_path: format!("properties/{field}"),
        instance_path: format!("/{field}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    fn bench(yaml: &str) -> Result<Benchmark> {
        Benchmark::from_document(parse_document(yaml).unwrap())
    }

    const MINIMAL: &str = r#"
schema_version: 0
name: sort
sources: [sort.c]
architectures: any
language: c99
"#;

    #[test]
    fn optional_fields_are_defaulted() {
        let b = bench(MINIMAL).unwrap();
        assert_eq!(b.name(), "sort");
        assert_eq!(b.comments(), "");
        assert!(b.defines().is_empty());
        assert!(b.dependencies().is_empty());
        assert!(b.categories().is_empty());
        assert_eq!(b.architectures(), &Architectures::Any);
    }

    #[test]
    fn defaults_appear_in_document() {
        let doc = bench(MINIMAL).unwrap().to_document().unwrap();
        assert_eq!(doc["comments"], "");
        assert_eq!(doc["defines"], Value::Array(vec![]));
        assert_eq!(doc["dependencies"], Value::Object(Default::default()));
        assert_eq!(doc["architectures"], "any");
        assert_eq!(doc["schema_version"], 0);
    }

    #[test]
    fn language_family_is_exclusive() {
        for (tag, cxx) in [("c99", false), ("gnu11", false), ("c++11", true), ("GNU++14", true)] {
            let b = bench(&MINIMAL.replace("c99", tag)).unwrap();
            assert_eq!(b.is_language_cxx(), cxx, "{tag}");
            assert_eq!(b.is_language_c(), !cxx, "{tag}");
        }
    }

    #[test]
    fn explicit_architectures_keep_order() {
        let b = bench(&MINIMAL.replace("architectures: any", "architectures: [64bit, 32bit]"))
            .unwrap();
        assert_eq!(b.architectures().identifiers(), ["64bit", "32bit"]);
        assert_eq!(Architectures::Any.identifiers(), ["any"]);
    }

    #[test]
    fn any_inside_list_is_structural_violation() {
        let err = bench(&MINIMAL.replace("architectures: any", "architectures: [any, 32bit]"))
            .unwrap_err();
        match err {
            SpecError::StructuralViolation { schema_path, .. } => {
                assert_eq!(schema_path, "properties/architectures");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_marker_rejected() {
        assert!(bench(&MINIMAL.replace("architectures: any", "architectures: all")).is_err());
        assert!(bench(&MINIMAL.replace("architectures: any", "architectures: []")).is_err());
    }

    #[test]
    fn unexpanded_document_rejected() {
        let err = bench(&format!("{MINIMAL}variants:\n  a: [X=1]\n")).unwrap_err();
        assert!(matches!(err, SpecError::StructuralViolation { .. }));
    }

    #[test]
    fn missing_required_field_rejected() {
        let err = bench("name: x\nsources: [a.c]\narchitectures: any\n").unwrap_err();
        assert!(matches!(err, SpecError::InvalidBenchmark(_)));
    }

    #[test]
    fn dependencies_keep_declaration_order() {
        let b = bench(&format!("{MINIMAL}dependencies:\n  openmp: {{}}\n  pthreads: {{}}\n"))
            .unwrap();
        let names: Vec<&str> = b.dependencies().keys().map(String::as_str).collect();
        assert_eq!(names, ["openmp", "pthreads"]);
    }

    #[test]
    fn display_is_yaml() {
        let text = bench(MINIMAL).unwrap().to_string();
        assert!(text.contains("name: sort"));
        assert!(text.contains("architectures: any"));
    }
}
