//! CLI command implementations.

pub mod archs;
pub mod check;
pub mod emit;
pub mod expand;
pub mod plan;
pub mod upgrade;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use svcb_spec::{expand, load_specification, Benchmark, Schema};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::SvcbConfig;

/// File name looked for when a directory is given as a specification path.
pub const SPEC_FILE_NAME: &str = "spec.yml";

/// Specification files named on the command line, or `[specs] paths` from
/// `svcb.toml` when none are given.
pub fn spec_files(cli_paths: Vec<PathBuf>, config: Option<&SvcbConfig>) -> Result<Vec<PathBuf>> {
    let paths = if cli_paths.is_empty() {
        config.map(|c| c.specs.paths.clone()).unwrap_or_default()
    } else {
        cli_paths
    };
    if paths.is_empty() {
        bail!("no specification files given (pass paths or set [specs] paths in svcb.toml)");
    }

    let files = collect_spec_files(&paths)?;
    if files.is_empty() {
        bail!("no {SPEC_FILE_NAME} files found");
    }
    Ok(files)
}

/// Files are kept as given; directories are searched recursively for
/// `spec.yml` without following symbolic links. A file reached more than
/// once, directly or through a directory, is listed only the first time.
pub fn collect_spec_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = BTreeSet::new();
    for path in paths {
        if path.is_dir() {
            for found in find_in_dir(path)? {
                push_unique(found, &mut files, &mut seen)?;
            }
        } else if path.is_file() {
            push_unique(path.clone(), &mut files, &mut seen)?;
        } else {
            bail!("specification path {} does not exist", path.display());
        }
    }
    Ok(files)
}

fn push_unique(path: PathBuf, files: &mut Vec<PathBuf>, seen: &mut BTreeSet<PathBuf>) -> Result<()> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("resolving {}", path.display()))?;
    if seen.insert(canonical) {
        files.push(path);
    } else {
        debug!(path = %path.display(), "skipping specification listed twice");
    }
    Ok(())
}

fn find_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("searching {}", dir.display()))?;
        if entry.file_type().is_file() && entry.file_name() == SPEC_FILE_NAME {
            debug!(path = %entry.path().display(), "found specification");
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Validate and expand every file, in order.
///
/// Every benchmark name becomes a build target, so a name declared twice
/// across the files is an error.
pub fn load_benchmarks(files: &[PathBuf], schema: &Schema) -> Result<Vec<Benchmark>> {
    let mut benchmarks = Vec::new();
    let mut declared_in: BTreeMap<String, &Path> = BTreeMap::new();
    for file in files {
        let doc = load_specification(file, schema)
            .with_context(|| format!("loading {}", file.display()))?;
        let expanded = expand(&doc).with_context(|| format!("expanding {}", file.display()))?;
        for benchmark in &expanded {
            if let Some(first) = declared_in.insert(benchmark.name().to_string(), file.as_path()) {
                bail!(
                    "benchmark '{}' is declared more than once ({} and {})",
                    benchmark.name(),
                    first.display(),
                    file.display()
                );
            }
        }
        benchmarks.extend(expanded);
    }
    Ok(benchmarks)
}

/// Write `text` to `output`, or to stdout when no output file is set.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_are_searched_for_spec_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("b/nested")).unwrap();
        std::fs::create_dir_all(root.join("a")).unwrap();
        std::fs::write(root.join("b/nested/spec.yml"), "").unwrap();
        std::fs::write(root.join("a/spec.yml"), "").unwrap();
        std::fs::write(root.join("a/other.yml"), "").unwrap();
        let explicit = root.join("a/other.yml");

        let files = collect_spec_files(&[root.to_path_buf(), explicit.clone()]).unwrap();
        assert_eq!(
            files,
            [root.join("a/spec.yml"), root.join("b/nested/spec.yml"), explicit]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("a")).unwrap();
        std::fs::write(root.join("a/spec.yml"), "").unwrap();
        std::os::unix::fs::symlink("..", root.join("a/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("a"), root.join("alias")).unwrap();

        let files = collect_spec_files(&[root.to_path_buf()]).unwrap();
        assert_eq!(files, [root.join("a/spec.yml")]);
    }

    #[test]
    fn file_listed_twice_is_kept_once() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("spec.yml");
        std::fs::write(&spec, "").unwrap();

        let files = collect_spec_files(&[spec.clone(), dir.path().to_path_buf()]).unwrap();
        assert_eq!(files, [spec]);
    }

    #[test]
    fn duplicate_benchmark_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let text = "schema_version: 0\nname: sort\nsources: [sort.c]\narchitectures: any\nlanguage: c99\n";
        let first = dir.path().join("one.yml");
        let second = dir.path().join("two.yml");
        std::fs::write(&first, text).unwrap();
        std::fs::write(&second, text).unwrap();
        let schema = Schema::builtin().unwrap();

        assert_eq!(load_benchmarks(&[first.clone()], &schema).unwrap().len(), 1);
        let err = load_benchmarks(&[first, second], &schema).unwrap_err();
        assert!(err.to_string().contains("'sort' is declared more than once"));
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_spec_files(&[dir.path().join("nope.yml")]).is_err());
    }

    #[test]
    fn config_paths_used_when_none_given() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("spec.yml"), "").unwrap();
        let mut config = SvcbConfig::default();
        config.specs.paths = vec![dir.path().to_path_buf()];

        let files = spec_files(vec![], Some(&config)).unwrap();
        assert_eq!(files, [dir.path().join("spec.yml")]);
        assert!(spec_files(vec![], None).is_err());
    }

    #[test]
    fn write_output_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("build/out.cmake");
        write_output("hello\n", Some(&out)).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "hello\n");
    }
}
