use super::*;
use async_trait::async_trait;
use dss_core::MappingColumns;
use dss_source::{SnapshotReader, SourceError, SourceResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Serves fixed byte blobs by location
struct MemoryReader {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryReader {
    fn new(files: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            files: files
                .iter()
                .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                .collect(),
        })
    }
}

#[async_trait]
impl SnapshotReader for MemoryReader {
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>> {
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                location: location.to_string(),
            })
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

fn inputs(reader: Arc<MemoryReader>) -> ComparisonInputs {
    ComparisonInputs::new(
        SnapshotSource::new(reader.clone(), "prior.csv"),
        SnapshotSource::new(reader, "latest.csv"),
    )
}

#[tokio::test]
async fn test_run_sums_duplicate_rows() {
    let reader = MemoryReader::new(&[
        ("prior.csv", "node,ofd_week,final_tva\nA,1,10\nA,1,20\n"),
        ("latest.csv", "node,ofd_week,final_tva\nA,1,33\n"),
    ]);

    let run = run_comparison(&inputs(reader)).await.unwrap();

    assert_eq!(run.result.cell("A", "1"), Some(10.0));
    assert_eq!(
        run.stats,
        RunStats {
            prior_records: 2,
            latest_records: 1,
            prior_keys: 1,
            latest_keys: 1,
            entities: 1,
            periods: 1,
            metadata_matched: 0,
        }
    );
}

#[tokio::test]
async fn test_missing_snapshot_aborts() {
    let reader = MemoryReader::new(&[("prior.csv", "node,ofd_week,final_tva\nA,1,10\n")]);

    let err = run_comparison(&inputs(reader)).await.unwrap_err();

    assert_eq!(err.role(), Some(SnapshotRole::Latest));
    match err {
        EngineError::SourceUnavailable { source, .. } => assert!(source.is_not_found()),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_parse_failure_aborts() {
    let reader = MemoryReader::new(&[
        ("prior.csv", "node,week,final_tva\nA,1,10\n"),
        ("latest.csv", "node,ofd_week,final_tva\nA,1,10\n"),
    ]);

    let err = run_comparison(&inputs(reader)).await.unwrap_err();

    assert_eq!(err.role(), Some(SnapshotRole::Prior));
    assert!(err.to_string().starts_with("[R002]"));
}

#[tokio::test]
async fn test_bad_mapping_tables_degrade_to_unknown() {
    let reader = MemoryReader::new(&[
        ("prior.csv", "node,ofd_week,final_tva\nA,1,10\n"),
        ("latest.csv", "node,ofd_week,final_tva\nA,1,20\n"),
        // wrong entity header
        ("primary.csv", "station,Region,Planner\nA,East,Alice\n"),
    ]);
    let mut inputs = inputs(reader.clone());
    inputs.primary_mapping = Some(MappingSource {
        source: SnapshotSource::new(reader.clone(), "primary.csv"),
        columns: MappingColumns::default(),
    });
    inputs.fallback_mapping = Some(MappingSource {
        source: SnapshotSource::new(reader, "missing.csv"),
        columns: MappingColumns::with_entity_column("Node"),
    });

    let run = run_comparison(&inputs).await.unwrap();

    assert_eq!(run.result.metadata_for("A").region, "Unknown");
    assert_eq!(run.result.metadata_for("A").planner, "Unknown");
    assert_eq!(run.stats.metadata_matched, 0);
    assert_eq!(run.result.cell("A", "1"), Some(100.0));
}

#[tokio::test]
async fn test_custom_columns_and_delimiter() {
    let reader = MemoryReader::new(&[
        ("prior.csv", "station;week;units\nA;W19;50\n"),
        ("latest.csv", "station;week;units\nA;W19;40\n"),
    ]);
    let mut inputs = inputs(reader);
    inputs.delimiter = b';';
    inputs.columns = dss_core::ColumnMapping {
        entity: "station".to_string(),
        period: "week".to_string(),
        metric: "units".to_string(),
    };

    let run = run_comparison(&inputs).await.unwrap();
    assert_eq!(run.result.cell("A", "W19"), Some(-20.0));
}

#[test]
fn test_write_result_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("dss-comparison.json");
    let result = ComparisonResult {
        entities: vec![],
        periods: vec![],
        cells: Default::default(),
        metadata: Default::default(),
    };

    write_result(&result, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.ends_with('\n'));
    assert_eq!(ComparisonResult::from_json(&written).unwrap(), result);
}

#[test]
fn test_failed_write_keeps_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dss-comparison.json");
    let previous = ComparisonResult {
        entities: vec![],
        periods: vec![],
        cells: Default::default(),
        metadata: Default::default(),
    };
    write_result(&previous, &path).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    // a directory squatting on the staging path makes the write fail
    std::fs::create_dir(temp_path_for(&path)).unwrap();
    let next = ComparisonResult {
        entities: vec![dss_core::EntityId::new("A")],
        periods: vec![dss_core::PeriodId::new("1")],
        ..previous
    };
    let err = write_result(&next, &path).unwrap_err();

    assert!(err.to_string().starts_with("[R004]"), "{err}");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}
