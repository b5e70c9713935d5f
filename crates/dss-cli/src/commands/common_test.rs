use super::*;
use dss_core::EntityMetadata;
use std::collections::BTreeMap;

fn result() -> ComparisonResult {
    let periods = vec![PeriodId::new("19"), PeriodId::new("20")];
    let rows: [(&str, &str, &str, [Option<f64>; 2]); 3] = [
        ("DAB2", "West", "Dana", [Some(2.5), Some(-12.0)]),
        ("DCK6", "East", "Kim", [Some(1.0), None]),
        ("DFX4", "North", "Lee", [Some(30.0), Some(4.0)]),
    ];

    let mut cells = BTreeMap::new();
    let mut metadata = BTreeMap::new();
    for (entity, region, planner, values) in rows {
        let row: BTreeMap<PeriodId, Option<f64>> =
            periods.iter().cloned().zip(values).collect();
        cells.insert(EntityId::new(entity), row);
        metadata.insert(
            EntityId::new(entity),
            EntityMetadata {
                region: region.to_string(),
                planner: planner.to_string(),
            },
        );
    }

    ComparisonResult {
        entities: cells.keys().cloned().collect(),
        periods,
        cells,
        metadata,
    }
}

fn names(entities: &[&EntityId]) -> Vec<String> {
    entities.iter().map(|e| e.to_string()).collect()
}

#[test]
fn test_parse_weeks() {
    assert!(parse_weeks(None).is_empty());
    assert_eq!(parse_weeks(Some(" 19, ,20 ")), vec!["19", "20"]);
}

#[test]
fn test_selection_defaults_to_everything() {
    let result = result();
    let selection = apply_selection(&result, &SelectionArgs::default()).unwrap();
    assert_eq!(selection.periods.len(), 2);
    assert_eq!(names(&selection.entities), vec!["DAB2", "DCK6", "DFX4"]);
}

#[test]
fn test_selection_significant_in_selected_weeks() {
    let result = result();
    let args = SelectionArgs {
        weeks: Some("20".to_string()),
        significant: true,
        ..Default::default()
    };
    let selection = apply_selection(&result, &args).unwrap();
    assert_eq!(selection.periods, vec![PeriodId::new("20")]);
    // DFX4 only moves significantly in week 19
    assert_eq!(names(&selection.entities), vec!["DAB2"]);
}

#[test]
fn test_selection_search_matches_planner() {
    let result = result();
    let args = SelectionArgs {
        search: Some("kIm".to_string()),
        ..Default::default()
    };
    let selection = apply_selection(&result, &args).unwrap();
    assert_eq!(names(&selection.entities), vec!["DCK6"]);
}

#[test]
fn test_selection_unknown_week() {
    let result = result();
    let args = SelectionArgs {
        weeks: Some("21".to_string()),
        ..Default::default()
    };
    let err = apply_selection(&result, &args).err().unwrap();
    assert!(err.to_string().contains("21"));
}

#[test]
fn test_format_table() {
    let headers = vec!["Station".to_string(), "Week 19".to_string()];
    let rows = vec![
        vec!["DAB2".to_string(), "".to_string()],
        vec!["DFX4".to_string(), "30.00%".to_string()],
    ];
    assert_eq!(
        format_table(&headers, &rows),
        "Station  Week 19\n-------  -------\nDAB2\nDFX4     30.00%\n"
    );
}

#[test]
fn test_read_result_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_result(&dir.path().join("none.json")).unwrap_err();
    assert!(err.to_string().contains("dss compare"));
}

#[test]
fn test_project_context_output_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dss.yml"),
        "name: t\nprior:\n  local: a.csv\nlatest:\n  local: b.csv\n",
    )
    .unwrap();
    let global = GlobalArgs {
        verbose: false,
        project_dir: dir.path().display().to_string(),
        config: None,
    };

    let ctx = ProjectContext::load(&global).unwrap();
    assert_eq!(
        ctx.output_path(None),
        dir.path().join("data/dss-comparison.json")
    );
    assert_eq!(ctx.output_path(Some("out.json")), dir.path().join("out.json"));
}
