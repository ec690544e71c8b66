//! `svcb.toml` project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name searched for from the working directory upward.
pub const CONFIG_FILE: &str = "svcb.toml";

/// The top-level project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SvcbConfig {
    /// Defaults for `svcb emit` and `svcb plan`.
    #[serde(default)]
    pub emit: EmitConfig,
    /// Where specification files live.
    #[serde(default)]
    pub specs: SpecsConfig,
}

/// `[emit]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EmitConfig {
    /// Architecture the compiler targets (e.g. "64bit").
    #[serde(default)]
    pub architecture: Option<String>,
    /// Directory benchmark sources are resolved against.
    #[serde(default)]
    pub source_root: Option<PathBuf>,
    /// Runtime support library linked into every target.
    #[serde(default)]
    pub runtime_library: Option<String>,
    /// File the generated declarations are written to.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// `[specs]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecsConfig {
    /// Specification files, or directories searched for `spec.yml`.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

impl SvcbConfig {
    /// Search upward from `start_dir` for `svcb.toml`, parse it, and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: SvcbConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config.rooted_at(&dir), dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing svcb.toml")
    }

    /// Make every relative path in the configuration relative to `dir`.
    fn rooted_at(mut self, dir: &Path) -> Self {
        let root = |p: PathBuf| if p.is_relative() { dir.join(p) } else { p };
        self.emit.source_root = self.emit.source_root.map(root);
        self.emit.output = self.emit.output.map(root);
        self.specs.paths = self.specs.paths.into_iter().map(root).collect();
        self
    }
}
