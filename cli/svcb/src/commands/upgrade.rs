//! `svcb upgrade`: migrate a specification to the current schema.

use std::path::Path;

use anyhow::{Context, Result};
use svcb_spec::{document_to_yaml, load_document, MigrationTable, Schema};

use super::write_output;

/// Upgrade `file` to `schema` and return the resulting YAML.
pub fn upgrade_file(file: &Path, schema: &Schema, migrations: &MigrationTable) -> Result<String> {
    let doc = load_document(file).with_context(|| format!("loading {}", file.display()))?;
    let upgraded = migrations
        .upgrade_to_schema(&doc, schema)
        .with_context(|| format!("upgrading {}", file.display()))?;
    Ok(document_to_yaml(&upgraded)?)
}

pub fn run(file: &Path, output: Option<&Path>, schema: &Schema) -> Result<()> {
    let text = upgrade_file(file, schema, &MigrationTable::builtin())?;
    write_output(&text, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str =
        "schema_version: 0\nname: sort\nsources: [sort.c]\narchitectures: any\nlanguage: c99\n";

    #[test]
    fn current_document_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.yml");
        std::fs::write(&path, CURRENT).unwrap();

        let text = upgrade_file(&path, &Schema::builtin().unwrap(), &MigrationTable::builtin())
            .unwrap();
        let before = svcb_spec::parse_document(CURRENT).unwrap();
        let after = svcb_spec::parse_document(&text).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn newer_document_cannot_be_downgraded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.yml");
        std::fs::write(&path, CURRENT.replace("schema_version: 0", "schema_version: 3")).unwrap();

        let err = upgrade_file(&path, &Schema::builtin().unwrap(), &MigrationTable::builtin())
            .unwrap_err();
        assert!(format!("{err:#}").contains("cannot downgrade"));
    }

    #[test]
    fn output_file_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.yml");
        let out = dir.path().join("upgraded/spec.yml");
        std::fs::write(&path, CURRENT).unwrap();

        run(&path, Some(&out), &Schema::builtin().unwrap()).unwrap();
        assert!(std::fs::read_to_string(out).unwrap().contains("name: sort"));
    }
}
