//! Show command implementation

use anyhow::Result;
use dss_core::{classify, display_text, ChangeClass, ComparisonResult, EntityId, PeriodId};

use crate::cli::{GlobalArgs, ShowArgs};
use crate::commands::common::{apply_selection, format_table, load_result};

/// Execute the show command
pub async fn execute(args: &ShowArgs, global: &GlobalArgs) -> Result<()> {
    let result = load_result(global, args.selection.input.as_deref())?;
    let selection = apply_selection(&result, &args.selection)?;

    if selection.entities.is_empty() {
        println!("No stations match the current filters.");
        return Ok(());
    }

    let shown = args
        .limit
        .unwrap_or(selection.entities.len())
        .min(selection.entities.len());
    let (headers, rows) = build_rows(&result, &selection.entities[..shown], &selection.periods);
    print!("{}", format_table(&headers, &rows));

    if shown < selection.entities.len() {
        println!(
            "\nShowing {} of {} stations",
            shown,
            selection.entities.len()
        );
    }
    Ok(())
}

/// `+` and/or `-` when any selected week moved significantly up or down
fn trend_marker(result: &ComparisonResult, entity: &EntityId, periods: &[PeriodId]) -> String {
    let classes: Vec<ChangeClass> = periods
        .iter()
        .map(|period| classify(result.cell(entity, period)))
        .collect();
    let mut marker = String::new();
    if classes.contains(&ChangeClass::SignificantIncrease) {
        marker.push('+');
    }
    if classes.contains(&ChangeClass::SignificantDecrease) {
        marker.push('-');
    }
    marker
}

/// Region, Planner, Station, Trend, then one display cell per selected week
pub(crate) fn build_rows(
    result: &ComparisonResult,
    entities: &[&EntityId],
    periods: &[PeriodId],
) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = ["Region", "Planner", "Station", "Trend"]
        .into_iter()
        .map(String::from)
        .chain(periods.iter().map(|p| format!("Week {}", p)))
        .collect();

    let rows = entities
        .iter()
        .map(|entity| {
            let meta = result.metadata_for(entity);
            [
                meta.region,
                meta.planner,
                entity.to_string(),
                trend_marker(result, entity, periods),
            ]
            .into_iter()
            .chain(
                periods
                    .iter()
                    .map(|period| display_text(result.cell(entity, period))),
            )
            .collect()
        })
        .collect();

    (headers, rows)
}

#[cfg(test)]
#[path = "show_test.rs"]
mod tests;
