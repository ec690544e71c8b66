//! Registry of dependency resolvers.
//!
//! Each dependency a benchmark declares is looked up by name here. A resolver
//! expresses, for one target, the guards that disable the target when the
//! dependency is missing and the lines that wire the dependency in when it is
//! present. Resolvers only name the capability variables; whether a
//! capability is actually available is decided later by the build system.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use svcb_spec::Benchmark;

use crate::deps::{OpenMpResolver, PthreadsResolver};
use crate::error::{EmitError, Result};
use crate::target::{Guard, TargetIdentity};

/// Guard and attachment fragments contributed by one dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyDecls {
    /// Checks evaluated before the target is created.
    pub guards: Vec<Guard>,
    /// Lines applied to the target after it is created.
    pub attachments: Vec<String>,
}

/// Strategy for expressing one named dependency.
pub trait DependencyResolver: Send + Sync {
    fn resolve(
        &self,
        config: &Value,
        benchmark: &Benchmark,
        target: &TargetIdentity,
    ) -> Result<DependencyDecls>;
}

/// Maps dependency names to resolvers.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: BTreeMap<String, Arc<dyn DependencyResolver>>,
}

impl ResolverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in `pthreads` (alias `threading`) and `openmp` resolvers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let pthreads: Arc<dyn DependencyResolver> = Arc::new(PthreadsResolver);
        registry.register("pthreads", Arc::clone(&pthreads));
        registry.register("threading", pthreads);
        registry.register("openmp", Arc::new(OpenMpResolver::default()));
        registry
    }

    /// Register a resolver, returning the one it replaced, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        resolver: Arc<dyn DependencyResolver>,
    ) -> Option<Arc<dyn DependencyResolver>> {
        self.resolvers.insert(name.into(), resolver)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    /// Registered dependency names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }

    /// Resolve dependency `name` for one target.
    ///
    /// Unknown names fail with [`EmitError::UnsupportedDependency`].
    pub fn resolve(
        &self,
        name: &str,
        config: &Value,
        benchmark: &Benchmark,
        target: &TargetIdentity,
    ) -> Result<DependencyDecls> {
        let resolver = self
            .resolvers
            .get(name)
            .ok_or_else(|| EmitError::UnsupportedDependency(name.to_string()))?;
        resolver.resolve(config, benchmark, target)
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.resolvers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcb_spec::parse_document;

    fn benchmark() -> Benchmark {
        let doc = parse_document(
            "schema_version: 0\nname: sort\nsources: [sort.c]\narchitectures: any\nlanguage: c99\n",
        )
        .unwrap();
        Benchmark::from_document(doc).unwrap()
    }

    struct Marker;

    impl DependencyResolver for Marker {
        fn resolve(
            &self,
            _config: &Value,
            _benchmark: &Benchmark,
            target: &TargetIdentity,
        ) -> Result<DependencyDecls> {
            Ok(DependencyDecls {
                guards: vec![Guard::new("HAS_MARKER", "marker missing")],
                attachments: vec![format!("mark({})", target.target_name)],
            })
        }
    }

    #[test]
    fn builtins_registered() {
        let registry = ResolverRegistry::with_builtins();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["openmp", "pthreads", "threading"]);
    }

    #[test]
    fn unknown_dependency_is_an_error() {
        let registry = ResolverRegistry::with_builtins();
        let target = TargetIdentity::new("sort", "64bit");
        let err = registry
            .resolve("gpu-offload", &Value::Null, &benchmark(), &target)
            .unwrap_err();
        assert!(matches!(err, EmitError::UnsupportedDependency(name) if name == "gpu-offload"));
    }

    #[test]
    fn custom_resolver_can_be_registered() {
        let mut registry = ResolverRegistry::new();
        assert!(!registry.contains("marker"));
        assert!(registry.register("marker", Arc::new(Marker)).is_none());
        assert!(registry.register("marker", Arc::new(Marker)).is_some());

        let target = TargetIdentity::new("sort", "64bit");
        let decls = registry
            .resolve("marker", &Value::Null, &benchmark(), &target)
            .unwrap();
        assert_eq!(decls.attachments, ["mark(sort.64bit)"]);
        assert_eq!(decls.guards[0].capability, "HAS_MARKER");
    }

    #[test]
    fn threading_alias_matches_pthreads() {
        let registry = ResolverRegistry::with_builtins();
        let target = TargetIdentity::new("sort", "32bit");
        let config = Value::Object(Default::default());
        let a = registry.resolve("threading", &config, &benchmark(), &target).unwrap();
        let b = registry.resolve("pthreads", &config, &benchmark(), &target).unwrap();
        assert_eq!(a, b);
    }
}
