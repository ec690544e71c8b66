//! Forward migration of specifications written against older schemas.
//!
//! Upgrades are driven by a [`MigrationTable`] of `(from, to, transform)`
//! steps. A document is moved forward along the shortest chain of
//! registered steps that ends exactly at the requested version; when no
//! such chain exists the upgrade fails before any step is applied.

use std::collections::{BTreeMap, VecDeque};

use serde_json::Value;
use tracing::{debug, info};

use crate::document::{schema_version, Document, SCHEMA_VERSION_KEY};
use crate::error::{Result, SpecError};
use crate::schema::Schema;
use crate::validate::validate;

/// Transform applied by one migration step.
///
/// The step does not need to touch `schema_version`; the table sets it.
pub type MigrationFn = fn(&mut Document);

/// A single version-to-version migration.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from: u64,
    pub to: u64,
    pub transform: MigrationFn,
}

/// Ordered set of registered migrations.
#[derive(Debug, Clone, Default)]
pub struct MigrationTable {
    steps: Vec<Migration>,
}

impl MigrationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Migrations shipped with the bundled schema.
    ///
    /// Schema 0 is the first published version, so there is nothing to
    /// migrate from yet.
    pub fn builtin() -> Self {
        Self::new()
    }

    /// Register a step. Steps must move forward (`to > from`).
    pub fn with(mut self, from: u64, to: u64, transform: MigrationFn) -> Result<Self> {
        if to <= from {
            return Err(SpecError::InvalidMigration { from, to });
        }
        self.steps.push(Migration {
            from,
            to,
            transform,
        });
        self.steps.sort_by_key(|m| (m.from, m.to));
        Ok(self)
    }

    /// Registered steps, ordered by source version.
    pub fn steps(&self) -> &[Migration] {
        &self.steps
    }

    /// The shortest chain of steps leading from `from` to exactly `target`.
    ///
    /// Steps that overshoot `target` are never taken. Ties go to the chain
    /// whose steps were found first, in `(from, to)` order.
    fn chain(&self, from: u64, target: u64) -> Option<Vec<&Migration>> {
        let mut arrived_by: BTreeMap<u64, &Migration> = BTreeMap::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == target {
                break;
            }
            for step in self
                .steps
                .iter()
                .filter(|m| m.from == current && m.to <= target)
            {
                if !arrived_by.contains_key(&step.to) {
                    arrived_by.insert(step.to, step);
                    queue.push_back(step.to);
                }
            }
        }

        let mut chain = Vec::new();
        let mut version = target;
        while version != from {
            let step = arrived_by.get(&version)?;
            chain.push(*step);
            version = step.from;
        }
        chain.reverse();
        Some(chain)
    }

    /// Upgrade `doc` to `target` without validating the result.
    ///
    /// Returns an independent copy; `doc` is never modified. The shortest
    /// registered chain is applied, and nothing is applied when no chain
    /// reaches `target`.
    pub fn upgrade(&self, doc: &Document, target: u64) -> Result<Document> {
        let from = schema_version(doc)?;
        if from > target {
            return Err(SpecError::DowngradeNotSupported { from, to: target });
        }

        let chain = self
            .chain(from, target)
            .ok_or(SpecError::NoMigrationPath { from, to: target })?;
        let mut upgraded = doc.clone();
        for step in chain {
            debug!(from = step.from, to = step.to, "applying schema migration");
            (step.transform)(&mut upgraded);
            upgraded.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(step.to));
        }
        Ok(upgraded)
    }

    /// Upgrade `doc` to the version of `schema` and validate the result.
    ///
    /// If any migration ran and the result fails validation, the failure is
    /// reported as [`SpecError::MigrationProducedInvalid`]: the migration is
    /// at fault, not the input.
    pub fn upgrade_to_schema(&self, doc: &Document, schema: &Schema) -> Result<Document> {
        let from = schema_version(doc)?;
        let to = schema.version();
        let upgraded = self.upgrade(doc, to)?;

        match validate(&upgraded, schema) {
            Ok(()) => {
                if from != to {
                    info!(from, to, "upgraded specification");
                }
                Ok(upgraded)
            }
            Err(err) if from != to => Err(SpecError::MigrationProducedInvalid {
                from,
                to,
                source: Box::new(err),
            }),
            Err(err) => Err(err),
        }
    }
}
