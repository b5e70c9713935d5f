//! Raw snapshot records and CSV parsing
//!
//! A snapshot is a delimited export with a header row. Only three columns
//! matter to the comparison: the entity identifier, the period identifier and
//! the metric being compared. Their names are configurable.

use crate::error::{CoreError, CoreResult};
use crate::ids::{EntityId, PeriodId};
use crate::tabular;
use serde::{Deserialize, Serialize};

/// Header names of the columns read from a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMapping {
    /// Entity identifier column
    #[serde(default = "default_entity_column")]
    pub entity: String,

    /// Period identifier column
    #[serde(default = "default_period_column")]
    pub period: String,

    /// Numeric metric column
    #[serde(default = "default_metric_column")]
    pub metric: String,
}

fn default_entity_column() -> String {
    "node".to_string()
}

fn default_period_column() -> String {
    "ofd_week".to_string()
}

fn default_metric_column() -> String {
    "final_tva".to_string()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            entity: default_entity_column(),
            period: default_period_column(),
            metric: default_metric_column(),
        }
    }
}

/// One row of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub entity_id: EntityId,
    pub period_id: PeriodId,
    /// `None` when the cell is empty, non-numeric or not finite
    pub metric_value: Option<f64>,
}

/// Parse a metric cell. Anything that is not a finite number is absent.
pub fn parse_metric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a snapshot into raw records.
///
/// Fails on the first structural problem: no header, a missing required
/// column, a row with the wrong number of fields, invalid UTF-8, or an empty
/// entity/period cell. No partial result is returned.
pub fn parse_snapshot(
    bytes: &[u8],
    columns: &ColumnMapping,
    delimiter: u8,
    source_name: &str,
) -> CoreResult<Vec<RawRecord>> {
    let mut reader = tabular::reader(bytes, delimiter);
    let headers = tabular::headers(&mut reader, source_name)?;

    let entity_idx = tabular::require_column(&headers, &columns.entity, source_name)?;
    let period_idx = tabular::require_column(&headers, &columns.period, source_name)?;
    let metric_idx = tabular::require_column(&headers, &columns.metric, source_name)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| tabular::malformed(e, source_name))?;
        let line = tabular::line_of(&row);

        let entity_id = key_field(&row, entity_idx, &columns.entity, line, source_name)
            .map(EntityId::new)?;
        let period_id = key_field(&row, period_idx, &columns.period, line, source_name)
            .map(PeriodId::new)?;
        let metric_value = row.get(metric_idx).and_then(parse_metric);

        records.push(RawRecord {
            entity_id,
            period_id,
            metric_value,
        });
    }

    log::debug!("Parsed {} records from {}", records.len(), source_name);
    Ok(records)
}

fn key_field<'r>(
    row: &'r csv::StringRecord,
    idx: usize,
    column: &str,
    line: u64,
    source_name: &str,
) -> CoreResult<&'r str> {
    match row.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CoreError::EmptyKeyField {
            source_name: source_name.to_string(),
            column: column.to_string(),
            line,
        }),
    }
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
