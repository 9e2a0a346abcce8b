//! Tests for RealFileStorage
//!
//! Every test works inside its own temporary directory.

use tempfile::TempDir;

use crate::services::file_storage::RealFileStorage;
use crate::traits::StateStorage;

#[tokio::test]
async fn test_missing_document_loads_as_none() {
    let dir = TempDir::new().unwrap();
    let storage = RealFileStorage::new(dir.path());

    assert!(storage.load("owbalancer").await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_then_load_returns_blob() {
    let dir = TempDir::new().unwrap();
    let storage = RealFileStorage::new(dir.path().join("nested"));

    storage.save("owbalancer", r#"{"players":{}}"#).await.unwrap();

    assert_eq!(storage.load("owbalancer").await.unwrap().as_deref(), Some(r#"{"players":{}}"#));
    assert!(storage.document_path("owbalancer").ends_with("owbalancer.json"));
}

#[tokio::test]
async fn test_save_overwrites_and_leaves_no_staging_file() {
    let dir = TempDir::new().unwrap();
    let storage = RealFileStorage::new(dir.path());

    storage.save("owbalancer", "first").await.unwrap();
    storage.save("owbalancer", "second").await.unwrap();

    assert_eq!(storage.load("owbalancer").await.unwrap().as_deref(), Some("second"));
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the document itself should remain");
}

#[tokio::test]
async fn test_keys_are_stored_separately() {
    let dir = TempDir::new().unwrap();
    let storage = RealFileStorage::new(dir.path());

    storage.save("a", "1").await.unwrap();
    storage.save("b", "2").await.unwrap();

    assert_eq!(storage.load("a").await.unwrap().as_deref(), Some("1"));
    assert_eq!(storage.load("b").await.unwrap().as_deref(), Some("2"));
}
