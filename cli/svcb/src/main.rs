//! svcb CLI: check benchmark specifications and generate CMake declarations.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use svcb_cmake::ToolchainFacts;
use svcb_spec::Schema;
use tracing_subscriber::EnvFilter;

use commands::emit::EmitSettings;
use config::SvcbConfig;

#[derive(Parser)]
#[command(name = "svcb", version, about = "Benchmark specification toolkit")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate specification files against the bundled schema
    Check {
        /// Specification files or directories (default: [specs] paths in svcb.toml)
        specs: Vec<PathBuf>,
    },
    /// Print the concrete benchmarks a specification declares
    Expand {
        /// Specification file
        spec: PathBuf,
    },
    /// Upgrade a specification to the current schema version
    Upgrade {
        /// Specification file
        spec: PathBuf,
        /// Write the upgraded specification here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate CMake declarations for benchmarks
    Emit {
        /// Specification files or directories (default: [specs] paths in svcb.toml)
        specs: Vec<PathBuf>,
        /// Architecture supported by the compiler (e.g. 32bit, 64bit)
        #[arg(long)]
        arch: Option<String>,
        /// Directory benchmark sources are resolved against (default: current directory)
        #[arg(long)]
        source_root: Option<PathBuf>,
        /// Write declarations here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show which targets would be built given toolchain capabilities
    Plan {
        /// Specification files or directories (default: [specs] paths in svcb.toml)
        specs: Vec<PathBuf>,
        /// Architecture supported by the compiler
        #[arg(long)]
        arch: Option<String>,
        /// Directory benchmark sources are resolved against (default: current directory)
        #[arg(long)]
        source_root: Option<PathBuf>,
        /// Capability available in the toolchain (e.g. HAS_STD_C99, OPENMP_FOUND); repeatable
        #[arg(long = "fact")]
        facts: Vec<String>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recognized architecture identifiers
    Archs,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `-v` selects debug and `-q` errors only.
fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let schema = Schema::builtin()?;

    match cli.command {
        Commands::Check { specs } => {
            let config = load_config_optional(&cwd)?;
            let files = commands::spec_files(specs, config.as_ref())?;
            commands::check::run(&files, &schema)
        }

        Commands::Expand { spec } => commands::expand::run(&spec, &schema),

        Commands::Upgrade { spec, output } => {
            commands::upgrade::run(&spec, output.as_deref(), &schema)
        }

        Commands::Emit {
            specs,
            arch,
            source_root,
            output,
        } => {
            let config = load_config_optional(&cwd)?;
            let files = commands::spec_files(specs, config.as_ref())?;
            let settings =
                EmitSettings::resolve(arch, source_root, output, config.as_ref(), &cwd, &schema)?;
            commands::emit::run(&files, &schema, &settings)
        }

        Commands::Plan {
            specs,
            arch,
            source_root,
            facts,
            json,
        } => {
            let config = load_config_optional(&cwd)?;
            let files = commands::spec_files(specs, config.as_ref())?;
            let settings =
                EmitSettings::resolve(arch, source_root, None, config.as_ref(), &cwd, &schema)?;
            let facts: ToolchainFacts = facts.into_iter().collect();
            commands::plan::run(&files, &schema, &settings, &facts, json)
        }

        Commands::Archs => commands::archs::run(&schema),
    }
}

/// Try to load `svcb.toml` from the current directory upward.
fn load_config_optional(cwd: &Path) -> anyhow::Result<Option<SvcbConfig>> {
    Ok(SvcbConfig::find_and_load(cwd)?.map(|(config, _)| config))
}
