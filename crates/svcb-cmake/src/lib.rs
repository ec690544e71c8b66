//! CMake build declarations for svcb benchmarks.
//!
//! Given expanded [`svcb_spec::Benchmark`]s and the architecture the
//! compiler targets, [`Emitter`] produces one conditional CMake target per
//! buildable (benchmark, architecture) pairing. Dependencies are expressed
//! by named resolvers in a [`ResolverRegistry`]; new dependencies are added
//! by registering a [`DependencyResolver`], not by touching the emitter.

pub mod deps;
pub mod emit;
pub mod error;
pub mod resolver;
pub mod target;

pub use deps::{OpenMpResolver, PthreadsResolver};
pub use emit::{render, EmitOptions, Emitter, DEFAULT_RUNTIME_LIBRARY, HEADER};
pub use error::{EmitError, Result};
pub use resolver::{DependencyDecls, DependencyResolver, ResolverRegistry};
pub use target::{
    Guard, GuardedTarget, TargetDeclaration, TargetIdentity, TargetStatus, ToolchainFacts,
};
