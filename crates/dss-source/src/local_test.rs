use super::*;

#[tokio::test]
async fn test_reads_relative_to_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data/prior.csv"), "node,ofd_week,final_tva\n").unwrap();

    let reader = LocalFileReader::new(dir.path());
    let bytes = reader.read("data/prior.csv").await.unwrap();
    assert_eq!(bytes, b"node,ofd_week,final_tva\n");
    assert_eq!(reader.kind(), "local");
}

#[tokio::test]
async fn test_absolute_location_ignores_root() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("latest.csv");
    std::fs::write(&file, "x").unwrap();

    let reader = LocalFileReader::new("/nonexistent-root");
    let bytes = reader.read(file.to_str().unwrap()).await.unwrap();
    assert_eq!(bytes, b"x");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let reader = LocalFileReader::new(dir.path());
    let err = reader.read("missing.csv").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("[S001]"));
}
