//! Outer join of two aggregated snapshots into a percent-change matrix

use crate::aggregate::SnapshotMap;
use crate::error::CoreResult;
use crate::ids::{EntityId, PeriodId};
use crate::mapping::{EntityMetadata, MetadataResolver};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Percent change per entity and period, with entity metadata.
///
/// Built in one pass and never mutated afterwards. Every entity has a cell for
/// every period; `None` means no meaningful comparison exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Union of entity ids from both snapshots, lexicographic order
    pub entities: Vec<EntityId>,

    /// Union of period ids from both snapshots, chronological order
    pub periods: Vec<PeriodId>,

    pub cells: BTreeMap<EntityId, BTreeMap<PeriodId, Option<f64>>>,

    pub metadata: BTreeMap<EntityId, EntityMetadata>,
}

impl ComparisonResult {
    /// Stored percent change for a cell; `None` for no-data or unknown keys
    pub fn cell(&self, entity: &str, period: &str) -> Option<f64> {
        self.cells
            .get(entity)
            .and_then(|periods| periods.get(period))
            .copied()
            .flatten()
    }

    /// Metadata for an entity, `Unknown`/`Unknown` if the entity is not present
    pub fn metadata_for(&self, entity: &str) -> EntityMetadata {
        self.metadata.get(entity).cloned().unwrap_or_default()
    }

    /// Serialize as the pretty-printed JSON document consumed by the portal
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a previously written result document
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Round the exact binary value to 2 decimal places, halves away from zero.
///
/// `2.675` is stored as `2.67499...` and rounds down; scaling by 100 first
/// would push it over the half.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // multiples of 1/8 are the only doubles that sit exactly on a half cent
    if (value * 8.0).fract() == 0.0 {
        return (value * 100.0).round() / 100.0;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// `(latest - prior) / prior * 100`, rounded to 2 decimals.
///
/// Absent or zero values on either side yield `None`, as does a result that
/// is not finite.
pub fn percent_change(prior: Option<f64>, latest: Option<f64>) -> Option<f64> {
    let prior = prior.filter(|v| *v != 0.0)?;
    let latest = latest.filter(|v| *v != 0.0)?;
    let change = round2((latest - prior) / prior * 100.0);
    change.is_finite().then_some(change)
}

/// Join two aggregated snapshots and attach metadata.
pub fn compare(
    prior: &SnapshotMap,
    latest: &SnapshotMap,
    resolver: &MetadataResolver,
) -> ComparisonResult {
    let entities: Vec<EntityId> = prior
        .entities()
        .chain(latest.entities())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut periods: Vec<PeriodId> = prior
        .periods()
        .into_iter()
        .chain(latest.periods())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    periods.sort_by(|a, b| a.chronological_cmp(b));

    let mut cells = BTreeMap::new();
    let mut metadata = BTreeMap::new();

    for entity in &entities {
        let row: BTreeMap<PeriodId, Option<f64>> = periods
            .iter()
            .map(|period| {
                let change = percent_change(
                    prior.total(entity, period),
                    latest.total(entity, period),
                );
                (period.clone(), change)
            })
            .collect();
        cells.insert(entity.clone(), row);
        metadata.insert(entity.clone(), resolver.resolve(entity));
    }

    log::debug!(
        "Compared {} entities across {} periods",
        entities.len(),
        periods.len()
    );

    ComparisonResult {
        entities,
        periods,
        cells,
        metadata,
    }
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
