use super::*;

fn config(yaml: &str) -> Config {
    Config::from_yaml(yaml).unwrap()
}

#[test]
fn test_from_config_local_sources() {
    let config = config(
        r#"
name: local
delimiter: ";"
prior:
  local: data/prior.csv
latest:
  local: data/latest.csv
mappings:
  primary:
    path: mapping/primary.csv
  fallback:
    path: mapping/simple.csv
    entity_column: Node
"#,
    );

    let inputs = ComparisonInputs::from_config(&config, Path::new("/srv/dss")).unwrap();

    assert_eq!(inputs.prior.describe(), "local:data/prior.csv");
    assert_eq!(inputs.latest.describe(), "local:data/latest.csv");
    assert_eq!(inputs.delimiter, b';');

    let primary = inputs.primary_mapping.unwrap();
    assert_eq!(primary.columns.entity_column, "node");
    let fallback = inputs.fallback_mapping.unwrap();
    assert_eq!(fallback.columns.entity_column, "Node");
    assert_eq!(fallback.source.location, "mapping/simple.csv");
}

#[test]
fn test_from_config_object_source() {
    let config = config(
        r#"
name: remote
prior:
  local: data/prior.csv
latest:
  object: "W20 MTP Final DSS for NFP upload.csv"
object_store:
  bucket: dsslambda
credentials:
  from_env: false
  secret_file: secrets/dss.json
"#,
    );

    let inputs = ComparisonInputs::from_config(&config, Path::new("/srv/dss")).unwrap();
    assert_eq!(inputs.prior.reader.kind(), "local");
    assert_eq!(inputs.latest.reader.kind(), "object-store");
    assert_eq!(
        inputs.latest.location,
        "W20 MTP Final DSS for NFP upload.csv"
    );
    assert!(inputs.primary_mapping.is_none());
}

#[test]
fn test_from_config_object_source_without_credentials() {
    let config = config(
        r#"
name: remote
prior:
  local: data/prior.csv
latest:
  object: latest.csv
object_store:
  bucket: dsslambda
credentials:
  from_env: false
"#,
    );

    let err = ComparisonInputs::from_config(&config, Path::new(".")).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
    assert!(err.to_string().contains("[R003]"));
}

#[test]
fn test_from_config_secrets_manager_only() {
    let config = config(
        r#"
name: remote
prior:
  object: prior.csv
latest:
  object: latest.csv
object_store:
  bucket: dsslambda
credentials:
  from_env: false
  secret_id: DSSAccess
"#,
    );

    let inputs = ComparisonInputs::from_config(&config, Path::new(".")).unwrap();
    assert_eq!(inputs.prior.describe(), "object-store:prior.csv");
    assert!(Arc::ptr_eq(&inputs.prior.reader, &inputs.latest.reader));
}

#[test]
fn test_from_config_rejects_bad_endpoint() {
    let config = config(
        r#"
name: remote
prior:
  local: prior.csv
latest:
  object: latest.csv
object_store:
  bucket: dsslambda
  endpoint: minio:9000
"#,
    );

    let err = ComparisonInputs::from_config(&config, Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("[S007]"), "{err}");
}

#[test]
fn test_with_local_snapshots_keeps_mappings() {
    let config = config(
        r#"
name: remote
delimiter: ";"
prior:
  object: prior.csv
latest:
  object: latest.csv
object_store:
  bucket: dsslambda
mappings:
  primary:
    path: mapping/primary.csv
"#,
    );
    let inputs = ComparisonInputs::from_config(&config, Path::new("/srv/dss")).unwrap();

    let adhoc = inputs.with_local_snapshots(Path::new("/srv/dss"), "a.csv", "b.csv");

    assert_eq!(adhoc.prior.describe(), "local:a.csv");
    assert_eq!(adhoc.latest.describe(), "local:b.csv");
    assert_eq!(adhoc.delimiter, b';');
    assert_eq!(
        adhoc.primary_mapping.unwrap().source.location,
        "mapping/primary.csv"
    );
}
