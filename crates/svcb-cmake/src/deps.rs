//! Built-in dependency resolvers.

use std::collections::BTreeMap;

use serde_json::Value;
use svcb_spec::{Benchmark, LanguageFamily};

use crate::error::{EmitError, Result};
use crate::resolver::{DependencyDecls, DependencyResolver};
use crate::target::{Guard, TargetIdentity};

/// Set by `find_package(Threads)` when the native thread library is pthreads.
pub const PTHREADS_CAPABILITY: &str = "CMAKE_USE_PTHREADS_INIT";

/// Set by `find_package(OpenMP)`.
pub const OPENMP_CAPABILITY: &str = "OPENMP_FOUND";

/// Native threading through the pthreads library.
#[derive(Debug, Clone, Copy, Default)]
pub struct PthreadsResolver;

impl DependencyResolver for PthreadsResolver {
    fn resolve(
        &self,
        config: &Value,
        _benchmark: &Benchmark,
        target: &TargetIdentity,
    ) -> Result<DependencyDecls> {
        check_config("pthreads", config)?;
        Ok(DependencyDecls {
            guards: vec![Guard::new(
                PTHREADS_CAPABILITY,
                "Pthreads library not available",
            )],
            attachments: vec![format!(
                "target_link_libraries({} PRIVATE ${{CMAKE_THREAD_LIBS_INIT}})",
                target.target_name
            )],
        })
    }
}

/// OpenMP, attached with the compiler flags of the benchmark's language family.
#[derive(Debug, Clone)]
pub struct OpenMpResolver {
    flags: BTreeMap<LanguageFamily, String>,
}

impl OpenMpResolver {
    /// Resolver knowing only the flag variables in `flags`.
    pub fn with_flags(flags: BTreeMap<LanguageFamily, String>) -> Self {
        Self { flags }
    }
}

impl Default for OpenMpResolver {
    fn default() -> Self {
        Self::with_flags(BTreeMap::from([
            (LanguageFamily::C, "OpenMP_C_FLAGS".to_string()),
            (LanguageFamily::Cxx, "OpenMP_CXX_FLAGS".to_string()),
        ]))
    }
}

impl DependencyResolver for OpenMpResolver {
    fn resolve(
        &self,
        config: &Value,
        benchmark: &Benchmark,
        target: &TargetIdentity,
    ) -> Result<DependencyDecls> {
        check_config("openmp", config)?;
        let family = benchmark.language().family();
        let flags = self
            .flags
            .get(&family)
            .ok_or_else(|| EmitError::UnknownLanguageFamily {
                dependency: "openmp".to_string(),
                benchmark: benchmark.name().to_string(),
                family,
            })?;
        let name = &target.target_name;
        Ok(DependencyDecls {
            guards: vec![Guard::new(OPENMP_CAPABILITY, "OpenMP not available")],
            attachments: vec![
                format!("target_compile_options({name} PRIVATE ${{{flags}}})"),
                format!(
                    "set_property(TARGET {name} APPEND_STRING PROPERTY LINK_FLAGS \" ${{{flags}}}\")"
                ),
            ],
        })
    }
}

/// Built-in dependencies take no options; an absent or empty mapping is accepted.
fn check_config(dependency: &str, config: &Value) -> Result<()> {
    match config {
        Value::Null | Value::Object(_) => Ok(()),
        other => Err(EmitError::InvalidDependencyConfig {
            dependency: dependency.to_string(),
            detail: format!("expected a mapping, found {other}"),
        }),
    }
}
