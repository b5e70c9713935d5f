use super::*;

fn parse(csv: &str) -> CoreResult<Vec<RawRecord>> {
    parse_snapshot(csv.as_bytes(), &ColumnMapping::default(), b',', "prior")
}

#[test]
fn test_parse_basic_snapshot() {
    let records = parse("node,ofd_week,ofd_dow,final_tva\nDAB5,19,1,100.5\nDAB5,19,2,20\n").unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entity_id, "DAB5");
    assert_eq!(records[0].period_id, "19");
    assert_eq!(records[0].metric_value, Some(100.5));
    assert_eq!(records[1].metric_value, Some(20.0));
}

#[test]
fn test_columns_found_by_name_in_any_order() {
    let records = parse("final_tva,extra,node,ofd_week\n7,x,DCK1,20\n").unwrap();
    assert_eq!(records[0].entity_id, "DCK1");
    assert_eq!(records[0].period_id, "20");
    assert_eq!(records[0].metric_value, Some(7.0));
}

#[test]
fn test_custom_column_mapping_and_delimiter() {
    let columns = ColumnMapping {
        entity: "station".to_string(),
        period: "week".to_string(),
        metric: "volume".to_string(),
    };
    let records =
        parse_snapshot(b"station;week;volume\nDAB5;3;1,5\n", &columns, b';', "latest").unwrap();
    assert_eq!(records[0].entity_id, "DAB5");
    // "1,5" is not a number in this format
    assert_eq!(records[0].metric_value, None);
}

#[test]
fn test_non_numeric_metric_is_absent_not_error() {
    let records = parse("node,ofd_week,final_tva\nA,1,\nB,1,n/a\nC,1,NaN\nD,1,inf\nE,1, 4 \n").unwrap();
    let values: Vec<Option<f64>> = records.iter().map(|r| r.metric_value).collect();
    assert_eq!(values, vec![None, None, None, None, Some(4.0)]);
}

#[test]
fn test_blank_lines_are_skipped() {
    let records = parse("node,ofd_week,final_tva\n\nA,1,2\n\nB,1,3\n").unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_empty_input_is_missing_header() {
    let err = parse("").unwrap_err();
    assert!(matches!(err, CoreError::MissingHeader { .. }));
    assert!(err.is_parse_error());
}

#[test]
fn test_missing_required_column() {
    let err = parse("node,week,final_tva\nA,1,2\n").unwrap_err();
    match err {
        CoreError::MissingColumn { column, source_name } => {
            assert_eq!(column, "ofd_week");
            assert_eq!(source_name, "prior");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_inconsistent_column_count_fails_whole_load() {
    let err = parse("node,ofd_week,final_tva\nA,1,2\nB,1\nC,1,3\n").unwrap_err();
    match err {
        CoreError::MalformedRow { line, message, .. } => {
            assert_eq!(line, 3);
            assert!(message.contains("expected 3 fields"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_entity_is_rejected() {
    let err = parse("node,ofd_week,final_tva\n,1,2\n").unwrap_err();
    match err {
        CoreError::EmptyKeyField { column, line, .. } => {
            assert_eq!(column, "node");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_header_with_byte_order_mark() {
    let records = parse("\u{feff}node,ofd_week,final_tva\nA,1,2\n").unwrap();
    assert_eq!(records[0].entity_id, "A");
}

#[test]
fn test_parse_metric() {
    assert_eq!(parse_metric("12.25"), Some(12.25));
    assert_eq!(parse_metric("-3"), Some(-3.0));
    assert_eq!(parse_metric(""), None);
    assert_eq!(parse_metric("abc"), None);
}

#[test]
fn test_invalid_utf8_row_is_parse_error() {
    let err = parse_snapshot(
        b"node,ofd_week,final_tva\nA,1,\xff\xfe\n",
        &ColumnMapping::default(),
        b',',
        "latest",
    )
    .unwrap_err();

    assert!(err.is_parse_error());
    assert!(err.to_string().contains("invalid UTF-8"), "{err}");
}

#[test]
fn test_invalid_utf8_header_is_parse_error() {
    let err = parse_snapshot(
        b"node,ofd_\xffweek,final_tva\nA,1,2\n",
        &ColumnMapping::default(),
        b',',
        "prior",
    )
    .unwrap_err();

    assert!(err.is_parse_error());
}
