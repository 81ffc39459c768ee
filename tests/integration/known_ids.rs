use feed_core::FeedError;
use funda_feed::load_known_ids;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_known_ids_accepts_strings_and_numbers() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("known.json");
    fs::write(&path, r#"["7123456", 7200001, "", null]"#).unwrap();

    let ids = load_known_ids(&path).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains("7123456"));
    assert!(ids.contains("7200001"));
}

#[test]
fn test_missing_file_is_a_config_error() {
    let temp_dir = tempdir().unwrap();
    let err = load_known_ids(&temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, FeedError::Config(_)));
}

#[test]
fn test_non_array_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("known.json");
    fs::write(&path, r#"{"ids": []}"#).unwrap();

    assert!(matches!(load_known_ids(&path), Err(FeedError::Config(_))));
}
