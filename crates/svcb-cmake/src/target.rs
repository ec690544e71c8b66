//! Per-(benchmark, architecture) target declarations.
//!
//! A [`TargetDeclaration`] is the structured form of what gets written to
//! the generated CMake file for one benchmark/architecture pairing. Whether a
//! guarded target is actually built is only known when CMake configures the
//! project; [`GuardedTarget::evaluate`] replays that decision for a given set
//! of [`ToolchainFacts`].

use std::collections::BTreeSet;
use std::path::PathBuf;

use svcb_spec::Language;

/// Variable accumulating disablement reasons for the current target.
pub const REASONS_VARIABLE: &str = "DISABLED_TARGET_REASONS";

/// Names identifying one generated target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetIdentity {
    /// Benchmark name.
    pub benchmark: String,
    /// Architecture identifier (may be the `any` marker).
    pub architecture: String,
    /// CMake target name, `{benchmark}.{architecture}`.
    pub target_name: String,
    /// Boolean toggle that guards creation of the target.
    pub enable_variable: String,
    /// List variable collecting reasons the target was disabled.
    pub reasons_variable: String,
}

impl TargetIdentity {
    pub fn new(benchmark: &str, architecture: &str) -> Self {
        let target_name = format!("{benchmark}.{architecture}");
        Self {
            enable_variable: format!("ENABLE_TARGET_{}", cmake_identifier(&target_name)),
            reasons_variable: REASONS_VARIABLE.to_string(),
            benchmark: benchmark.to_string(),
            architecture: architecture.to_string(),
            target_name,
        }
    }
}

/// A check that clears the enable toggle when a toolchain capability is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    /// CMake variable that is true when the capability is available.
    pub capability: String,
    /// Reason recorded when the capability is missing.
    pub reason: String,
}

impl Guard {
    pub fn new(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            reason: reason.into(),
        }
    }
}

/// Toolchain capabilities known to be available at configure time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainFacts {
    available: BTreeSet<String>,
}

impl ToolchainFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a capability as available.
    pub fn with(mut self, capability: impl Into<String>) -> Self {
        self.available.insert(capability.into());
        self
    }

    pub fn insert(&mut self, capability: impl Into<String>) {
        self.available.insert(capability.into());
    }

    pub fn has(&self, capability: &str) -> bool {
        self.available.contains(capability)
    }
}

impl<S: Into<String>> FromIterator<S> for ToolchainFacts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            available: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of evaluating a guarded target against toolchain facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStatus {
    pub enabled: bool,
    /// Every reason the target was disabled, in guard order.
    pub reasons: Vec<String>,
}

/// A target whose existence is decided by guards at configure time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedTarget {
    pub identity: TargetIdentity,
    /// Dependency guards in declaration order, then the language-standard guard.
    pub guards: Vec<Guard>,
    /// Source files resolved against the source root.
    pub sources: Vec<PathBuf>,
    /// Runtime support library every target links against.
    pub runtime_library: String,
    pub defines: Vec<String>,
    /// Variable holding the compiler flags for the language standard.
    pub standard_flags_variable: String,
    /// Dependency attachment lines, in dependency declaration order.
    pub attachments: Vec<String>,
}

impl GuardedTarget {
    /// Decide whether the target would be built given `facts`.
    pub fn evaluate(&self, facts: &ToolchainFacts) -> TargetStatus {
        let reasons: Vec<String> = self
            .guards
            .iter()
            .filter(|guard| !facts.has(&guard.capability))
            .map(|guard| guard.reason.clone())
            .collect();
        TargetStatus {
            enabled: reasons.is_empty(),
            reasons,
        }
    }
}

/// The declaration generated for one (benchmark, architecture) pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDeclaration {
    /// The architecture can never be built by this toolchain; only a note is emitted.
    Excluded { identity: TargetIdentity, note: String },
    /// A conditionally created target.
    Guarded(GuardedTarget),
}

impl TargetDeclaration {
    pub fn identity(&self) -> &TargetIdentity {
        match self {
            TargetDeclaration::Excluded { identity, .. } => identity,
            TargetDeclaration::Guarded(target) => &target.identity,
        }
    }

    pub fn as_guarded(&self) -> Option<&GuardedTarget> {
        match self {
            TargetDeclaration::Guarded(target) => Some(target),
            TargetDeclaration::Excluded { .. } => None,
        }
    }

    /// Excluded pairings are never built; their note is the only reason.
    pub fn evaluate(&self, facts: &ToolchainFacts) -> TargetStatus {
        match self {
            TargetDeclaration::Excluded { note, .. } => TargetStatus {
                enabled: false,
                reasons: vec![note.clone()],
            },
            TargetDeclaration::Guarded(target) => target.evaluate(facts),
        }
    }
}

/// Uppercase a name and replace anything CMake would not accept in a variable name.
pub fn cmake_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Tag used in capability and flag variables for a language standard.
///
/// `c99` becomes `C99`, `gnu++11` becomes `GNUXX11`.
pub fn standard_tag(language: &Language) -> String {
    language.tag().replace('+', "X").to_uppercase()
}

/// Capability variable for toolchain support of `language`.
pub fn standard_capability(language: &Language) -> String {
    format!("HAS_STD_{}", standard_tag(language))
}

/// Variable holding the compiler flags that select `language`.
pub fn standard_flags_variable(language: &Language) -> String {
    format!("SVCOMP_STD_{}", standard_tag(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guarded(guards: Vec<Guard>) -> GuardedTarget {
        GuardedTarget {
            identity: TargetIdentity::new("sort", "any"),
            guards,
            sources: vec![PathBuf::from("/src/sort.c")],
            runtime_library: "svcomp_runtime".into(),
            defines: vec![],
            standard_flags_variable: "SVCOMP_STD_C99".into(),
            attachments: vec![],
        }
    }

    #[test]
    fn identity_names() {
        let id = TargetIdentity::new("sort_fast", "64bit");
        assert_eq!(id.target_name, "sort_fast.64bit");
        assert_eq!(id.enable_variable, "ENABLE_TARGET_SORT_FAST_64BIT");
        assert_eq!(id.reasons_variable, REASONS_VARIABLE);
    }

    #[test]
    fn standard_variables() {
        assert_eq!(standard_tag(&Language::new("c99")), "C99");
        assert_eq!(standard_tag(&Language::new("gnu++11")), "GNUXX11");
        assert_eq!(standard_capability(&Language::new("C++14")), "HAS_STD_CXX14");
        assert_eq!(
            standard_flags_variable(&Language::new("gnu99")),
            "SVCOMP_STD_GNU99"
        );
    }

    #[test]
    fn evaluate_collects_every_missing_capability() {
        let target = guarded(vec![
            Guard::new("CMAKE_USE_PTHREADS_INIT", "no threads"),
            Guard::new("OPENMP_FOUND", "no openmp"),
            Guard::new("HAS_STD_C99", "no c99"),
        ]);

        let none = target.evaluate(&ToolchainFacts::new());
        assert!(!none.enabled);
        assert_eq!(none.reasons, ["no threads", "no openmp", "no c99"]);

        let some: ToolchainFacts = ["HAS_STD_C99", "OPENMP_FOUND"].into_iter().collect();
        let status = target.evaluate(&some);
        assert!(!status.enabled);
        assert_eq!(status.reasons, ["no threads"]);

        let all = some.with("CMAKE_USE_PTHREADS_INIT");
        assert_eq!(
            target.evaluate(&all),
            TargetStatus {
                enabled: true,
                reasons: vec![]
            }
        );
    }

    #[test]
    fn unguarded_target_is_enabled() {
        assert!(guarded(vec![]).evaluate(&ToolchainFacts::new()).enabled);
    }

    #[test]
    fn declaration_accessors() {
        let excluded = TargetDeclaration::Excluded {
            identity: TargetIdentity::new("sort", "32bit"),
            note: "skipped".into(),
        };
        assert!(excluded.as_guarded().is_none());
        assert_eq!(excluded.identity().architecture, "32bit");
        let status = excluded.evaluate(&ToolchainFacts::new().with("HAS_STD_C99"));
        assert!(!status.enabled);
        assert_eq!(status.reasons, ["skipped"]);

        let target = TargetDeclaration::Guarded(guarded(vec![]));
        assert!(target.as_guarded().is_some());
        assert_eq!(target.identity().target_name, "sort.any");
    }
}
