//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dss_core::{select_periods, ComparisonResult, Config, EntityFilter, EntityId, PeriodId};
use std::path::{Path, PathBuf};

use crate::cli::{GlobalArgs, SelectionArgs};

/// Loaded configuration and the directory its paths resolve against
#[derive(Debug, Clone)]
pub(crate) struct ProjectContext {
    pub root: PathBuf,
    pub config: Config,
}

impl ProjectContext {
    /// Load config from `--config` or the project directory
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);
        let config = match &global.config {
            Some(path) => {
                Config::load(Path::new(path)).context("Failed to load configuration file")?
            }
            None => Config::load_from_dir(&root).context("Failed to load project configuration")?,
        };
        log::debug!("Loaded project '{}' from {}", config.name, root.display());
        Ok(Self { root, config })
    }

    /// Path of the comparison document, `override_path` taking precedence
    pub fn output_path(&self, override_path: Option<&str>) -> PathBuf {
        match override_path {
            Some(path) => Config::resolve_path(&self.root, path),
            None => self.config.output_path(&self.root),
        }
    }
}

/// Read a comparison document from `--input` or the configured output path
pub(crate) fn load_result(global: &GlobalArgs, input: Option<&str>) -> Result<ComparisonResult> {
    let path = match input {
        Some(path) => PathBuf::from(path),
        None => ProjectContext::load(global)?.output_path(None),
    };
    read_result(&path)
}

pub(crate) fn read_result(path: &Path) -> Result<ComparisonResult> {
    let json = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read comparison document {} (run `dss compare` first)",
            path.display()
        )
    })?;
    ComparisonResult::from_json(&json)
        .with_context(|| format!("Invalid comparison document {}", path.display()))
}

/// Split a comma-separated week list, dropping blanks
pub(crate) fn parse_weeks(weeks: Option<&str>) -> Vec<String> {
    weeks
        .map(|w| {
            w.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Periods and entities picked by the selection flags
pub(crate) struct Selection<'r> {
    pub periods: Vec<PeriodId>,
    pub entities: Vec<&'r EntityId>,
}

pub(crate) fn apply_selection<'r>(
    result: &'r ComparisonResult,
    selection: &SelectionArgs,
) -> Result<Selection<'r>> {
    let weeks = parse_weeks(selection.weeks.as_deref());
    let periods = select_periods(result, Some(weeks.as_slice()))?;
    let filter = EntityFilter {
        search: selection.search.clone(),
        significant_only: selection.significant,
    };
    let entities = filter.apply(result, &periods);
    Ok(Selection { periods, entities })
}

/// Calculate column widths for table output
pub(crate) fn calculate_column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Render a left-aligned table with a dashed separator under the header.
/// Columns are separated by two spaces.
pub(crate) fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers));
    out.push('\n');
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&sep.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
