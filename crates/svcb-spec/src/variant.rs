//! Variant expansion: one specification document into concrete benchmarks.
//!
//! A document may declare `variants`, a mapping from variant name to extra
//! preprocessor defines. Each variant becomes its own [`Benchmark`] named
//! `{name}_{variant}` whose defines are the document's global defines
//! followed by the variant's.

use serde_json::Value;
use tracing::debug;

use crate::benchmark::Benchmark;
use crate::document::Document;
use crate::error::{Result, SpecError};

const VARIANTS_KEY: &str = "variants";
const DEFINES_KEY: &str = "defines";
const NAME_KEY: &str = "name";

/// Expand a document into its concrete benchmarks.
///
/// Always returns at least one benchmark. Every benchmark owns its own copy
/// of the data; `doc` is left untouched and repeated calls share nothing.
/// Output follows the document's variant order, but callers should sort by
/// name if they need a stable order.
pub fn expand(doc: &Document) -> Result<Vec<Benchmark>> {
    let Some(variants) = doc.get(VARIANTS_KEY) else {
        return Ok(vec![Benchmark::from_document(doc.clone())?]);
    };

    let variants = variants
        .as_object()
        .ok_or_else(|| shape_error(VARIANTS_KEY, "'variants' must be a mapping"))?;
    if variants.is_empty() {
        return Err(shape_error(VARIANTS_KEY, "'variants' must not be empty"));
    }

    let base_name = doc
        .get(NAME_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| shape_error(NAME_KEY, "'name' must be a string"))?;
    let global_defines = match doc.get(DEFINES_KEY) {
        Some(defines) => string_list(defines, DEFINES_KEY)?,
        None => Vec::new(),
    };

    let mut benchmarks = Vec::with_capacity(variants.len());
    for (variant_name, extra) in variants {
        let extra = string_list(extra, &format!("{VARIANTS_KEY}/{variant_name}"))?;

        let mut copy = doc.clone();
        copy.remove(VARIANTS_KEY);

        let defines: Vec<Value> = global_defines
            .iter()
            .chain(extra.iter())
            .cloned()
            .map(Value::String)
            .collect();
        copy.insert(DEFINES_KEY.to_string(), Value::Array(defines));

        let name = format!("{base_name}_{variant_name}");
        copy.insert(NAME_KEY.to_string(), Value::String(name.clone()));

        debug!(benchmark = %name, "expanded variant");
        benchmarks.push(Benchmark::from_document(copy)?);
    }
    Ok(benchmarks)
}

fn string_list(value: &Value, field: &str) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| shape_error(field, &format!("'{field}' must be a list of strings")))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| shape_error(field, &format!("'{field}' must be a list of strings")))
        })
        .collect()
}

fn shape_error(field: &str, message: &str) -> SpecError {
    SpecError::StructuralViolation {
        message: message.to_string(),
        schema_path: format!("properties/{}", field.split('/').next().unwrap_or(field)),
        instance_path: format!("/{field}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    const BASE: &str = r#"
schema_version: 0
name: loop
sources: [loop.c]
architectures: any
language: c99
"#;

    fn names(benchmarks: &[Benchmark]) -> Vec<String> {
        let mut names: Vec<String> = benchmarks.iter().map(|b| b.name().to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn single_benchmark_without_variants() {
        let doc = parse_document(BASE).unwrap();
        let benchmarks = expand(&doc).unwrap();
        assert_eq!(benchmarks.len(), 1);
        assert_eq!(benchmarks[0].name(), "loop");
    }

    #[test]
    fn one_benchmark_per_variant() {
        let doc = parse_document(&format!(
            "{BASE}defines: [BASE=1, SHARED]\nvariants:\n  fast: [FAST=1]\n  slow: [SLOW=1, EXTRA]\n"
        ))
        .unwrap();
        let benchmarks = expand(&doc).unwrap();
        assert_eq!(names(&benchmarks), ["loop_fast", "loop_slow"]);

        for b in &benchmarks {
            let expected: Vec<&str> = match b.name() {
                "loop_fast" => vec!["BASE=1", "SHARED", "FAST=1"],
                "loop_slow" => vec!["BASE=1", "SHARED", "SLOW=1", "EXTRA"],
                other => panic!("unexpected benchmark {other}"),
            };
            assert_eq!(b.defines(), expected.as_slice());
        }
    }

    #[test]
    fn variants_without_global_defines() {
        let doc = parse_document(&format!("{BASE}variants:\n  a: [A]\n  b: []\n")).unwrap();
        let benchmarks = expand(&doc).unwrap();
        let b = benchmarks.iter().find(|b| b.name() == "loop_b").unwrap();
        assert!(b.defines().is_empty());
        let a = benchmarks.iter().find(|b| b.name() == "loop_a").unwrap();
        assert_eq!(a.defines(), ["A"]);
    }

    #[test]
    fn expansion_removes_variants_and_keeps_source() {
        let doc = parse_document(&format!("{BASE}variants:\n  a: [A]\n")).unwrap();
        let before = doc.clone();
        let benchmarks = expand(&doc).unwrap();
        assert_eq!(doc, before);
        let expanded = benchmarks[0].to_document().unwrap();
        assert!(!expanded.contains_key("variants"));
    }

    #[test]
    fn expansions_are_independent() {
        let doc = parse_document(&format!("{BASE}variants:\n  a: [A]\n  b: [B]\n")).unwrap();
        let first = expand(&doc).unwrap();
        let mut second = expand(&doc).unwrap();
        assert_eq!(first, second);

        // Owned copies: changing one expansion cannot reach the other.
        second.clear();
        assert_eq!(first.len(), 2);
        assert_eq!(names(&first), ["loop_a", "loop_b"]);
    }

    #[test]
    fn malformed_variants_rejected() {
        for tail in ["variants: [a, b]\n", "variants: {}\n", "variants:\n  a: A\n", "variants:\n  a: [1]\n"] {
            let doc = parse_document(&format!("{BASE}{tail}")).unwrap();
            assert!(
                matches!(expand(&doc), Err(SpecError::StructuralViolation { .. })),
                "{tail}"
            );
        }
    }

    #[test]
    fn non_string_global_defines_rejected() {
        let doc =
            parse_document(&format!("{BASE}defines: [1]\nvariants:\n  a: [A]\n")).unwrap();
        assert!(expand(&doc).is_err());
    }
}
