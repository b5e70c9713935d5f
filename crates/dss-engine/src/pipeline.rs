//! Comparison run: fetch, parse, aggregate, resolve metadata, join

use crate::error::{EngineError, EngineResult, SnapshotRole};
use crate::inputs::{ComparisonInputs, MappingSource, SnapshotSource};
use dss_core::{
    compare, parse_snapshot, ComparisonResult, MappingTable, MetadataResolver, RawRecord,
    SnapshotMap,
};
use serde::Serialize;
use std::path::Path;

/// Counts gathered during a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub prior_records: usize,
    pub latest_records: usize,
    pub prior_keys: usize,
    pub latest_keys: usize,
    pub entities: usize,
    pub periods: usize,
    /// Entities found in the primary or fallback mapping table
    pub metadata_matched: usize,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ComparisonRun {
    pub result: ComparisonResult,
    pub stats: RunStats,
}

/// Run one comparison.
///
/// Both snapshots are fetched concurrently. A fetch or parse failure of
/// either snapshot aborts the run; mapping table problems only degrade
/// metadata to `Unknown`.
pub async fn run_comparison(inputs: &ComparisonInputs) -> EngineResult<ComparisonRun> {
    log::info!(
        "Comparing {} against {}",
        inputs.prior.describe(),
        inputs.latest.describe()
    );

    let (prior_bytes, latest_bytes) = tokio::try_join!(
        fetch_snapshot(SnapshotRole::Prior, &inputs.prior),
        fetch_snapshot(SnapshotRole::Latest, &inputs.latest),
    )?;

    let prior_records = parse(SnapshotRole::Prior, &inputs.prior, &prior_bytes, inputs)?;
    let latest_records = parse(SnapshotRole::Latest, &inputs.latest, &latest_bytes, inputs)?;

    let prior = SnapshotMap::aggregate(&prior_records);
    let latest = SnapshotMap::aggregate(&latest_records);

    let (primary, fallback) = tokio::join!(
        load_mapping(inputs.primary_mapping.as_ref(), inputs.delimiter),
        load_mapping(inputs.fallback_mapping.as_ref(), inputs.delimiter),
    );
    let resolver = MetadataResolver::new(primary, fallback);

    let result = compare(&prior, &latest, &resolver);

    let stats = RunStats {
        prior_records: prior_records.len(),
        latest_records: latest_records.len(),
        prior_keys: prior.len(),
        latest_keys: latest.len(),
        entities: result.entities.len(),
        periods: result.periods.len(),
        metadata_matched: result
            .entities
            .iter()
            .filter(|e| resolver.lookup(e).is_some())
            .count(),
    };

    log::info!(
        "Parsed {} prior and {} latest records into {} and {} keys",
        stats.prior_records,
        stats.latest_records,
        stats.prior_keys,
        stats.latest_keys
    );
    log::info!(
        "Compared {} entities across {} periods ({} with mapped metadata)",
        stats.entities,
        stats.periods,
        stats.metadata_matched
    );

    Ok(ComparisonRun { result, stats })
}

async fn fetch_snapshot(role: SnapshotRole, source: &SnapshotSource) -> EngineResult<Vec<u8>> {
    let bytes = source
        .reader
        .read(&source.location)
        .await
        .map_err(|e| EngineError::SourceUnavailable { role, source: e })?;
    log::debug!(
        "Fetched {} bytes for the {} snapshot",
        bytes.len(),
        role
    );
    Ok(bytes)
}

fn parse(
    role: SnapshotRole,
    source: &SnapshotSource,
    bytes: &[u8],
    inputs: &ComparisonInputs,
) -> EngineResult<Vec<RawRecord>> {
    parse_snapshot(bytes, &inputs.columns, inputs.delimiter, &source.describe())
        .map_err(|e| EngineError::Parse { role, source: e })
}

async fn load_mapping(mapping: Option<&MappingSource>, delimiter: u8) -> MappingTable {
    let Some(mapping) = mapping else {
        return MappingTable::default();
    };
    let name = mapping.source.describe();

    let bytes = match mapping.source.reader.read(&mapping.source.location).await {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => {
            log::info!("Mapping table {} not found, continuing without it", name);
            return MappingTable::default();
        }
        Err(e) => {
            log::warn!("Mapping table {} unreadable, continuing without it: {}", name, e);
            return MappingTable::default();
        }
    };

    match MappingTable::parse(&bytes, &mapping.columns, delimiter, &name) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("Mapping table {} is malformed, continuing without it: {}", name, e);
            MappingTable::default()
        }
    }
}

/// Write the result as pretty JSON, creating parent directories.
///
/// A failed write leaves any previous document at `path` untouched.
pub fn write_result(result: &ComparisonResult, path: &Path) -> EngineResult<()> {
    let output_error = |e: std::io::Error| EngineError::Output {
        path: path.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(output_error)?;
    }
    let mut json = result.to_json_pretty()?;
    json.push('\n');

    // Replace the previous document only once the new one is fully on disk
    let temp_path = temp_path_for(path);
    std::fs::write(&temp_path, json).map_err(output_error)?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        output_error(e)
    })?;

    log::info!("Wrote comparison result to {}", path.display());
    Ok(())
}

/// Sibling file the next document is staged in before the rename
fn temp_path_for(path: &Path) -> std::path::PathBuf {
    path.with_extension(format!("json.{}.tmp", std::process::id()))
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
