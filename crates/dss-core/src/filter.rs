//! Period selection and entity filtering over a comparison result

use crate::classification::is_significant;
use crate::compare::ComparisonResult;
use crate::error::{CoreError, CoreResult};
use crate::ids::{EntityId, PeriodId};

/// Resolve a requested subset of periods against the result.
///
/// `None` or an empty request selects every period. The returned periods
/// follow the result's chronological order regardless of request order;
/// duplicates collapse. A label the result does not contain is an error.
pub fn select_periods<S: AsRef<str>>(
    result: &ComparisonResult,
    requested: Option<&[S]>,
) -> CoreResult<Vec<PeriodId>> {
    let requested = match requested {
        Some(req) if !req.is_empty() => req,
        _ => return Ok(result.periods.clone()),
    };

    for label in requested {
        let label = label.as_ref();
        if !result.periods.iter().any(|p| p == &label) {
            return Err(CoreError::UnknownPeriod {
                period: label.to_string(),
            });
        }
    }

    Ok(result
        .periods
        .iter()
        .filter(|p| requested.iter().any(|r| r.as_ref() == p.as_str()))
        .cloned()
        .collect())
}

/// Row filter matching the portal's search box and significance toggle
#[derive(Debug, Clone, Default)]
pub struct EntityFilter {
    /// Case-insensitive substring matched against entity id, region and planner
    pub search: Option<String>,

    /// Keep only entities with at least one significant move in the selected periods
    pub significant_only: bool,
}

impl EntityFilter {
    /// Entities passing the filter, in result order
    pub fn apply<'r>(
        &self,
        result: &'r ComparisonResult,
        periods: &[PeriodId],
    ) -> Vec<&'r EntityId> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        result
            .entities
            .iter()
            .filter(|entity| match &needle {
                Some(needle) => matches_search(result, entity, needle),
                None => true,
            })
            .filter(|entity| !self.significant_only || has_significant_move(result, entity, periods))
            .collect()
    }
}

fn matches_search(result: &ComparisonResult, entity: &EntityId, needle: &str) -> bool {
    if entity.to_lowercase().contains(needle) {
        return true;
    }
    result.metadata.get(entity).is_some_and(|meta| {
        meta.region.to_lowercase().contains(needle) || meta.planner.to_lowercase().contains(needle)
    })
}

fn has_significant_move(result: &ComparisonResult, entity: &EntityId, periods: &[PeriodId]) -> bool {
    periods
        .iter()
        .filter_map(|period| result.cell(entity, period))
        .any(is_significant)
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
