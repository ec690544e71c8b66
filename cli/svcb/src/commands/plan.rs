//! `svcb plan`: show which targets would be built under assumed toolchain facts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use svcb_cmake::ToolchainFacts;
use svcb_spec::Schema;

use super::emit::EmitSettings;
use super::load_benchmarks;

/// Build decision for one (benchmark, architecture) pairing.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRow {
    pub target: String,
    pub enabled: bool,
    pub reasons: Vec<String>,
}

pub fn plan_targets(
    files: &[PathBuf],
    schema: &Schema,
    settings: &EmitSettings,
    facts: &ToolchainFacts,
) -> Result<Vec<PlanRow>> {
    let benchmarks = load_benchmarks(files, schema)?;
    let declarations = settings
        .emitter()
        .plan(&benchmarks, &settings.source_root, &settings.architecture)
        .context("planning targets")?;

    Ok(declarations
        .iter()
        .map(|declaration| {
            let status = declaration.evaluate(facts);
            PlanRow {
                target: declaration.identity().target_name.clone(),
                enabled: status.enabled,
                reasons: status.reasons,
            }
        })
        .collect())
}

pub fn run(
    files: &[PathBuf],
    schema: &Schema,
    settings: &EmitSettings,
    facts: &ToolchainFacts,
    json: bool,
) -> Result<()> {
    let rows = plan_targets(files, schema, settings, facts)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        let state = if row.enabled { "build" } else { "skip" };
        println!("{state:<6} {}", row.target);
        for reason in &row.reasons {
            println!("         {reason}");
        }
    }
    let enabled = rows.iter().filter(|r| r.enabled).count();
    println!();
    println!("{enabled} of {} target(s) would be built", rows.len());
    Ok(())
}
