//! CSV export of a comparison result

use crate::classification::{display_text, export_text};
use crate::compare::ComparisonResult;
use crate::error::CoreResult;
use crate::ids::{EntityId, PeriodId};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// How cell values are rendered in an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Every value with 2 decimals and `%`, `N/A` for no data
    #[default]
    Raw,
    /// Same text as the on-screen table: moves within ±5% are blank
    Display,
}

impl ExportMode {
    pub fn render(self, value: Option<f64>) -> String {
        match self {
            ExportMode::Raw => export_text(value),
            ExportMode::Display => display_text(value),
        }
    }
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportMode::Raw => write!(f, "raw"),
            ExportMode::Display => write!(f, "display"),
        }
    }
}

/// Header row: `Station`, then `Week <p>` per selected period
pub fn header_row(periods: &[PeriodId]) -> Vec<String> {
    std::iter::once("Station".to_string())
        .chain(periods.iter().map(|p| format!("Week {}", p)))
        .collect()
}

/// Write the selected entities and periods as CSV.
///
/// Rows follow the order of `entities`; callers pass `result.entities` (or a
/// filtered subset of it) to keep lexicographic order.
pub fn write_csv<W: Write>(
    result: &ComparisonResult,
    entities: &[&EntityId],
    periods: &[PeriodId],
    mode: ExportMode,
    writer: W,
) -> CoreResult<()> {
    let mut out = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    out.write_record(header_row(periods))?;
    for entity in entities {
        let row = std::iter::once(entity.to_string()).chain(
            periods
                .iter()
                .map(|period| mode.render(result.cell(entity, period))),
        );
        out.write_record(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Export into a `String`
pub fn to_csv_string(
    result: &ComparisonResult,
    entities: &[&EntityId],
    periods: &[PeriodId],
    mode: ExportMode,
) -> CoreResult<String> {
    let mut buf = Vec::new();
    write_csv(result, entities, periods, mode, &mut buf)?;
    // The writer only ever receives UTF-8 input
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
