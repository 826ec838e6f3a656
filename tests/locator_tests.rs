//! File locator tests against an in-memory store

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::MemoryStore;
use equipment_portal::drive::ReadLocator;
use equipment_portal::locator::{default_file_name, next_backup_name, FileLocator};
use equipment_portal::types::FolderReference;
use equipment_portal::PortalError;
use pretty_assertions::assert_eq;

fn locator(store: MemoryStore) -> FileLocator {
    FileLocator::new(Arc::new(store), "/Equipment/")
}

#[tokio::test]
async fn test_resolve_picks_newest_equipment_file() {
    let store = MemoryStore::new()
        .with_file("Equipment/A", "old-id", "A_equipment_data.xlsx", 1, None)
        .with_file("Equipment/A", "new-id", "A_equipment_data_20240101_0101.xlsx", 2, None)
        .with_file("Equipment/A", "photo", "A_site_photo.jpg", 9, None);
    let folder = FolderReference::parse("A").unwrap();

    let resolved = locator(store).resolve(&folder).await.unwrap();

    assert_eq!(resolved.file_name, "A_equipment_data_20240101_0101.xlsx");
    assert_eq!(resolved.locator, ReadLocator::ItemId("new-id".to_string()));
}

#[tokio::test]
async fn test_resolve_ignores_non_matching_spreadsheets() {
    let store = MemoryStore::new()
        .with_file("Equipment/A", "quote", "A_quote.xlsx", 9, None)
        .with_file("Equipment/A", "data", "A_equipment_data.XLSX", 1, None);
    let folder = FolderReference::parse("A").unwrap();

    let resolved = locator(store).resolve(&folder).await.unwrap();

    assert_eq!(resolved.locator, ReadLocator::ItemId("data".to_string()));
}

#[tokio::test]
async fn test_resolve_falls_back_to_default_name() {
    let store = MemoryStore::new().with_file("Equipment/Clients/Acme Corp", "x", "readme.txt", 1, None);
    let folder = FolderReference::parse("Clients/Acme Corp").unwrap();

    let resolved = locator(store).resolve(&folder).await.unwrap();

    assert_eq!(resolved.file_name, "Acme Corp_equipment_data.xlsx");
    assert_eq!(
        resolved.locator,
        ReadLocator::Path("Equipment/Clients/Acme Corp/Acme Corp_equipment_data.xlsx".to_string())
    );
}

#[tokio::test]
async fn test_resolve_surfaces_listing_failure() {
    let folder = FolderReference::parse("Missing").unwrap();

    let err = locator(MemoryStore::new()).resolve(&folder).await.unwrap_err();

    match err {
        PortalError::RemoteUnavailable { operation, cause } => {
            assert!(operation.contains("Equipment/Missing"));
            assert!(cause.contains("404"));
        }
        other => panic!("expected RemoteUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_folders_defaults_to_root() {
    let store = MemoryStore::new()
        .with_folder("Equipment", "Acme Corp")
        .with_folder("Equipment", "Globex")
        .with_file("Equipment", "f", "index.xlsx", 1, None);

    let folders = locator(store).list_folders(None).await.unwrap();

    assert_eq!(folders, vec!["Acme Corp".to_string(), "Globex".to_string()]);
}

#[tokio::test]
async fn test_list_folders_with_explicit_path() {
    let store = MemoryStore::new().with_folder("Equipment/Acme Corp", "Site 2");

    let folders = locator(store)
        .list_folders(Some("/Equipment/Acme Corp/"))
        .await
        .unwrap();

    assert_eq!(folders, vec!["Site 2".to_string()]);
}

#[test]
fn test_backup_name_never_collides_with_read_name() {
    let folder = FolderReference::parse("Clients/Acme Corp").unwrap();
    let now = NaiveDate::from_ymd_opt(2024, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();

    let backup = next_backup_name(&folder, now);

    assert_eq!(backup, "Acme_Corp_equipment_data_20241231_235959.xlsx");
    assert_ne!(backup, default_file_name(&folder));
}

#[test]
fn test_backup_name_for_single_word_folder() {
    let folder = FolderReference::parse("Globex").unwrap();
    let now = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();

    assert_eq!(
        next_backup_name(&folder, now),
        "Globex_equipment_data_20250102_030405.xlsx"
    );
    assert_ne!(next_backup_name(&folder, now), default_file_name(&folder));
}

#[test]
fn test_file_path_joins_root_and_folder() {
    let folder = FolderReference::parse("Clients/Acme Corp").unwrap();
    let locator = locator(MemoryStore::new());

    assert_eq!(locator.folder_root(), "Equipment");
    assert_eq!(
        locator.file_path(&folder, "x.xlsx"),
        "Equipment/Clients/Acme Corp/x.xlsx"
    );
}
