//! `svcb check`: validate specification files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use svcb_spec::{expand, load_specification, Schema};

/// Validate and expand one file, returning how many benchmarks it declares.
pub fn check_file(path: &Path, schema: &Schema) -> svcb_spec::Result<usize> {
    let doc = load_specification(path, schema)?;
    Ok(expand(&doc)?.len())
}

/// Check every file, reporting each one; fails if any file is invalid.
pub fn run(files: &[PathBuf], schema: &Schema) -> Result<()> {
    let mut failed = 0;
    for file in files {
        match check_file(file, schema) {
            Ok(count) => println!("ok    {} ({count} benchmark(s))", file.display()),
            Err(e) => {
                failed += 1;
                println!("FAIL  {}: {e}", file.display());
            }
        }
    }

    if failed > 0 {
        bail!(
            "{failed} of {} specification file(s) failed validation",
            files.len()
        );
    }
    Ok(())
}
