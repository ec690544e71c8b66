//! CMake declaration generation.
//!
//! [`Emitter::plan`] turns benchmarks into [`TargetDeclaration`]s for one
//! supported architecture; [`Emitter::emit`] renders them as CMake text. A
//! pairing whose architecture can never be built by the toolchain becomes a
//! status message only. Every other pairing gets an enable toggle, dependency
//! and language-standard guards, the target itself, and an else branch that
//! reports every reason the target was disabled.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use svcb_spec::{Benchmark, ANY_ARCHITECTURE};
use tracing::{debug, info, warn};

use crate::error::{EmitError, Result};
use crate::resolver::ResolverRegistry;
use crate::target::{
    standard_capability, standard_flags_variable, standard_tag, Guard, GuardedTarget,
    TargetDeclaration, TargetIdentity,
};

/// First line of every generated file.
pub const HEADER: &str = "# Autogenerated. DO NOT MODIFY!";

/// Line introducing each (benchmark, architecture) pairing.
pub const SEPARATOR: &str = "####";

/// Runtime support library linked into every target unless configured otherwise.
pub const DEFAULT_RUNTIME_LIBRARY: &str = "svcomp_runtime";

const INDENT: &str = "  ";

/// Emission settings that do not depend on the benchmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub runtime_library: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            runtime_library: DEFAULT_RUNTIME_LIBRARY.to_string(),
        }
    }
}

/// Generates CMake target declarations for benchmarks.
#[derive(Debug, Clone)]
pub struct Emitter {
    registry: ResolverRegistry,
    options: EmitOptions,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(ResolverRegistry::with_builtins(), EmitOptions::default())
    }
}

impl Emitter {
    pub fn new(registry: ResolverRegistry, options: EmitOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }

    /// Build the declaration for every (benchmark, architecture) pairing.
    ///
    /// `source_root` must be an existing directory; it is checked before any
    /// benchmark is looked at. Declarations follow benchmark order, then each
    /// benchmark's architecture order. The `any` marker is declared once,
    /// under the name of `supported_architecture`.
    pub fn plan(
        &self,
        benchmarks: &[Benchmark],
        source_root: &Path,
        supported_architecture: &str,
    ) -> Result<Vec<TargetDeclaration>> {
        let root = check_source_root(source_root)?;

        let mut declarations = Vec::new();
        for benchmark in benchmarks {
            for architecture in benchmark.architectures().identifiers() {
                declarations.push(self.declare(
                    benchmark,
                    architecture,
                    &root,
                    supported_architecture,
                )?);
            }
        }

        info!(
            benchmarks = benchmarks.len(),
            targets = declarations.len(),
            arch = supported_architecture,
            "planned target declarations"
        );
        Ok(declarations)
    }

    /// Generate the CMake text for `benchmarks`.
    ///
    /// All declarations are planned before any text is produced, so a failing
    /// dependency leaves no partial output.
    pub fn emit(
        &self,
        benchmarks: &[Benchmark],
        source_root: &Path,
        supported_architecture: &str,
    ) -> Result<String> {
        let declarations = self.plan(benchmarks, source_root, supported_architecture)?;
        Ok(render(&declarations))
    }

    fn declare(
        &self,
        benchmark: &Benchmark,
        architecture: &str,
        root: &Path,
        supported_architecture: &str,
    ) -> Result<TargetDeclaration> {
        if architecture != ANY_ARCHITECTURE && architecture != supported_architecture {
            let identity = TargetIdentity::new(benchmark.name(), architecture);
            warn!(
                target_name = %identity.target_name,
                supported = supported_architecture,
                "architecture not supported by compiler, skipping target"
            );
            let note = format!(
                "Compiler cannot build target {}. Architecture not supported by compiler",
                identity.target_name
            );
            return Ok(TargetDeclaration::Excluded { identity, note });
        }

        let identity = TargetIdentity::new(benchmark.name(), supported_architecture);
        let mut guards = Vec::new();
        let mut attachments = Vec::new();
        for (name, config) in benchmark.dependencies() {
            let decls = self.registry.resolve(name, config, benchmark, &identity)?;
            guards.extend(decls.guards);
            attachments.extend(decls.attachments);
        }

        let language = benchmark.language();
        guards.push(Guard::new(
            standard_capability(language),
            format!(
                "Compiler does not support language standard {}",
                standard_tag(language)
            ),
        ));

        debug!(
            target_name = %identity.target_name,
            guards = guards.len(),
            "declared guarded target"
        );
        Ok(TargetDeclaration::Guarded(GuardedTarget {
            sources: benchmark.sources().iter().map(|s| root.join(s)).collect(),
            runtime_library: self.options.runtime_library.clone(),
            defines: benchmark.defines().to_vec(),
            standard_flags_variable: standard_flags_variable(language),
            identity,
            guards,
            attachments,
        }))
    }
}

/// Render declarations as a complete CMake file.
pub fn render(declarations: &[TargetDeclaration]) -> String {
    let mut out = format!("{HEADER}\n");
    for declaration in declarations {
        out.push_str(&declaration.to_string());
    }
    out
}

fn check_source_root(path: &Path) -> Result<PathBuf> {
    let unusable = |detail: String| EmitError::SourceRoot {
        path: path.to_path_buf(),
        detail,
    };
    let metadata = fs::metadata(path).map_err(|e| unusable(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(unusable("not a directory".to_string()));
    }
    fs::canonicalize(path).map_err(|e| unusable(e.to_string()))
}

/// Quote a CMake argument so it reaches the build verbatim, with `${..}`
/// left unexpanded.
fn quote(arg: &str) -> String {
    format!(
        "\"{}\"",
        arg.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$")
    )
}

impl fmt::Display for TargetDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        match self {
            TargetDeclaration::Excluded { note, .. } => {
                writeln!(f, "message(STATUS {})", quote(note))
            }
            TargetDeclaration::Guarded(target) => fmt::Display::fmt(target, f),
        }
    }
}

impl fmt::Display for GuardedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enable = &self.identity.enable_variable;
        let reasons = &self.identity.reasons_variable;
        let name = &self.identity.target_name;

        writeln!(f, "set({enable} TRUE)")?;
        writeln!(f, "set({reasons} \"\")")?;
        for guard in &self.guards {
            writeln!(f, "if (NOT {})", guard.capability)?;
            writeln!(f, "{INDENT}set({enable} FALSE)")?;
            writeln!(f, "{INDENT}list(APPEND {reasons} {})", quote(&guard.reason))?;
            writeln!(f, "endif()")?;
        }

        writeln!(f, "if ({enable})")?;
        writeln!(f, "{INDENT}add_executable({name}")?;
        for source in &self.sources {
            writeln!(f, "{INDENT}{INDENT}{}", quote(&source.display().to_string()))?;
        }
        writeln!(f, "{INDENT})")?;
        writeln!(
            f,
            "{INDENT}target_link_libraries({name} PRIVATE {})",
            self.runtime_library
        )?;
        if !self.defines.is_empty() {
            writeln!(f, "{INDENT}target_compile_definitions({name} PRIVATE")?;
            for define in &self.defines {
                writeln!(f, "{INDENT}{INDENT}{}", quote(define))?;
            }
            writeln!(f, "{INDENT})")?;
        }
        writeln!(
            f,
            "{INDENT}target_compile_options({name} PRIVATE ${{{}}})",
            self.standard_flags_variable
        )?;
        for line in &self.attachments {
            writeln!(f, "{INDENT}{line}")?;
        }

        writeln!(f, "else()")?;
        writeln!(f, "{INDENT}set(msgConcat \"\")")?;
        writeln!(f, "{INDENT}foreach (msg ${{{reasons}}})")?;
        writeln!(f, "{INDENT}{INDENT}set(msgConcat \"${{msgConcat}}\\n  ${{msg}}\")")?;
        writeln!(f, "{INDENT}endforeach()")?;
        writeln!(
            f,
            "{INDENT}message(WARNING \"Not building target {name} due to ${{msgConcat}}\")"
        )?;
        writeln!(f, "{INDENT}unset(msgConcat)")?;
        writeln!(f, "endif()")
    }
}
