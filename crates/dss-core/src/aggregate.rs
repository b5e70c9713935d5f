//! Group-and-sum of raw records by `(entity, period)`

use crate::ids::{EntityId, PeriodId};
use crate::record::RawRecord;
use std::collections::{BTreeSet, HashMap};

/// Sum of the metric over every raw record sharing one `(entity, period)` key
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub entity_id: EntityId,
    pub period_id: PeriodId,
    pub metric_total: f64,
    /// Number of contributing raw records (diagnostic only)
    pub count: usize,
}

/// Aggregated snapshot keyed by entity, then period.
///
/// Holds at most one row per distinct key. Lookups take `&str` so callers
/// never allocate a composite key.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMap {
    rows: HashMap<EntityId, HashMap<PeriodId, AggregatedRow>>,
    len: usize,
}

impl SnapshotMap {
    /// Build the map from raw records. Order of input does not matter.
    ///
    /// Repeated keys add together. Records without a metric value contribute
    /// zero but still create their key.
    pub fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut map = SnapshotMap::default();
        for record in records {
            let by_period = map.rows.entry(record.entity_id.clone()).or_default();
            let row = by_period
                .entry(record.period_id.clone())
                .or_insert_with(|| {
                    map.len += 1;
                    AggregatedRow {
                        entity_id: record.entity_id.clone(),
                        period_id: record.period_id.clone(),
                        metric_total: 0.0,
                        count: 0,
                    }
                });
            row.metric_total += record.metric_value.unwrap_or(0.0);
            row.count += 1;
        }
        map
    }

    /// Look up the aggregated row for a key
    pub fn get(&self, entity: &str, period: &str) -> Option<&AggregatedRow> {
        self.rows.get(entity).and_then(|periods| periods.get(period))
    }

    /// Aggregated total for a key, if the key exists
    pub fn total(&self, entity: &str, period: &str) -> Option<f64> {
        self.get(entity, period).map(|row| row.metric_total)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct entity ids present in this snapshot
    pub fn entities(&self) -> impl Iterator<Item = &EntityId> {
        self.rows.keys()
    }

    /// Distinct period ids present in this snapshot
    pub fn periods(&self) -> BTreeSet<&PeriodId> {
        self.rows
            .values()
            .flat_map(|periods| periods.keys())
            .collect()
    }

    /// Iterate over every aggregated row (unordered)
    pub fn rows(&self) -> impl Iterator<Item = &AggregatedRow> {
        self.rows.values().flat_map(|periods| periods.values())
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
