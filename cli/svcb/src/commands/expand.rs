//! `svcb expand`: print the concrete benchmarks a specification declares.

use std::path::Path;

use anyhow::{Context, Result};
use svcb_spec::Schema;

use super::load_benchmarks;

/// Render the expanded benchmarks of `file` as a YAML list.
pub fn expand_file(file: &Path, schema: &Schema) -> Result<String> {
    let benchmarks = load_benchmarks(&[file.to_path_buf()], schema)?;
    serde_yaml::to_string(&benchmarks).context("serializing benchmarks")
}

pub fn run(file: &Path, schema: &Schema) -> Result<()> {
    print!("{}", expand_file(file, schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_listed_with_merged_defines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.yml");
        std::fs::write(
            &path,
            "schema_version: 0\nname: loop\nsources: [loop.c]\narchitectures: any\nlanguage: c99\ndefines: [BASE]\nvariants:\n  fast: [FAST]\n",
        )
        .unwrap();

        let text = expand_file(&path, &Schema::builtin().unwrap()).unwrap();
        let listed: Vec<serde_json::Value> = serde_yaml::from_str(&text).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["name"], "loop_fast");
        assert_eq!(listed[0]["defines"], serde_json::json!(["BASE", "FAST"]));
        assert!(listed[0].get("variants").is_none());
    }
}
