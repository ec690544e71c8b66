//! `svcb emit`: generate CMake declarations for benchmark specifications.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use svcb_cmake::{EmitOptions, Emitter, ResolverRegistry, DEFAULT_RUNTIME_LIBRARY};
use svcb_spec::Schema;

use super::{load_benchmarks, write_output};
use crate::config::SvcbConfig;

/// Emission settings after merging command-line flags over `svcb.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSettings {
    pub architecture: String,
    pub source_root: PathBuf,
    pub runtime_library: String,
    pub output: Option<PathBuf>,
}

impl EmitSettings {
    /// Flags win over `svcb.toml`; the source root falls back to `cwd`.
    pub fn resolve(
        architecture: Option<String>,
        source_root: Option<PathBuf>,
        output: Option<PathBuf>,
        config: Option<&SvcbConfig>,
        cwd: &Path,
        schema: &Schema,
    ) -> Result<Self> {
        let emit = config.map(|c| c.emit.clone()).unwrap_or_default();

        let Some(architecture) = architecture.or(emit.architecture) else {
            bail!("no architecture given (use --arch or set [emit] architecture in svcb.toml)");
        };
        let known = schema.architectures()?;
        if !known.contains(&architecture) {
            let known: Vec<&str> = known.iter().map(String::as_str).collect();
            bail!(
                "unknown architecture '{architecture}' (expected one of: {})",
                known.join(", ")
            );
        }

        Ok(Self {
            architecture,
            source_root: source_root
                .or(emit.source_root)
                .unwrap_or_else(|| cwd.to_path_buf()),
            runtime_library: emit
                .runtime_library
                .unwrap_or_else(|| DEFAULT_RUNTIME_LIBRARY.to_string()),
            output: output.or(emit.output),
        })
    }

    pub fn emitter(&self) -> Emitter {
        Emitter::new(
            ResolverRegistry::with_builtins(),
            EmitOptions {
                runtime_library: self.runtime_library.clone(),
            },
        )
    }
}

/// Validate, expand, and emit every file as one CMake text.
pub fn generate(files: &[PathBuf], schema: &Schema, settings: &EmitSettings) -> Result<String> {
    let benchmarks = load_benchmarks(files, schema)?;
    settings
        .emitter()
        .emit(&benchmarks, &settings.source_root, &settings.architecture)
        .context("generating CMake declarations")
}

pub fn run(files: &[PathBuf], schema: &Schema, settings: &EmitSettings) -> Result<()> {
    let text = generate(files, schema, settings)?;
    write_output(&text, settings.output.as_deref())
}
