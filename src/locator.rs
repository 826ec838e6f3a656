//! Cloud file locator
//!
//! Maps a logical client folder to the equipment workbook that backs it,
//! and names the backup objects written on save.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::drive::{ReadLocator, RemoteStore};
use crate::error::PortalResult;
use crate::types::{FolderReference, RemoteFileDescriptor};

/// Marker every equipment workbook name contains
pub const EQUIPMENT_MARKER: &str = "_equipment_data";

/// Spreadsheet file extension
pub const XLSX_EXTENSION: &str = ".xlsx";

/// The workbook chosen for a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub file_name: String,
    pub locator: ReadLocator,
}

/// Resolves client folders to workbooks under a configured drive root
pub struct FileLocator {
    store: Arc<dyn RemoteStore>,
    folder_root: String,
}

impl FileLocator {
    pub fn new(store: Arc<dyn RemoteStore>, folder_root: impl Into<String>) -> Self {
        let folder_root = folder_root.into().trim_matches('/').to_string();
        Self { store, folder_root }
    }

    pub fn folder_root(&self) -> &str {
        &self.folder_root
    }

    /// Drive path of a client folder
    pub fn folder_path(&self, folder: &FolderReference) -> String {
        join_path(&self.folder_root, &folder.as_path())
    }

    /// Drive path of a file inside a client folder
    pub fn file_path(&self, folder: &FolderReference, file_name: &str) -> String {
        join_path(&self.folder_path(folder), file_name)
    }

    /// Pick the workbook to read for `folder`.
    ///
    /// The most recently modified equipment workbook wins. When the folder
    /// holds none, the default name is returned with a path locator; reading
    /// it will then fail at the store.
    pub async fn resolve(&self, folder: &FolderReference) -> PortalResult<ResolvedFile> {
        let entries = self.store.list_children(&self.folder_path(folder)).await?;

        let resolved = match latest_equipment_file(&entries) {
            Some(entry) => ResolvedFile {
                file_name: entry.name.clone(),
                locator: ReadLocator::ItemId(entry.id.clone()),
            },
            None => {
                let file_name = default_file_name(folder);
                ResolvedFile {
                    locator: ReadLocator::Path(self.file_path(folder, &file_name)),
                    file_name,
                }
            }
        };

        debug!(folder = %folder, file = %resolved.file_name, "resolved equipment file");
        Ok(resolved)
    }

    /// Names of the sub-folders of `path` (the root when `None`)
    pub async fn list_folders(&self, path: Option<&str>) -> PortalResult<Vec<String>> {
        let path = path
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(self.folder_root.as_str());

        let entries = self.store.list_children(path).await?;
        Ok(entries
            .into_iter()
            .filter(RemoteFileDescriptor::is_folder)
            .map(|entry| entry.name)
            .collect())
    }
}

/// Whether a remote entry looks like an equipment workbook
pub fn is_equipment_file(entry: &RemoteFileDescriptor) -> bool {
    entry.is_file()
        && entry.name.to_ascii_lowercase().ends_with(XLSX_EXTENSION)
        && entry.name.contains(EQUIPMENT_MARKER)
}

/// Most recently modified equipment workbook among `entries`
pub fn latest_equipment_file(entries: &[RemoteFileDescriptor]) -> Option<&RemoteFileDescriptor> {
    entries
        .iter()
        .filter(|entry| is_equipment_file(entry))
        .max_by_key(|entry| entry.last_modified)
}

/// `<last segment>_equipment_data.xlsx`, spaces kept
pub fn default_file_name(folder: &FolderReference) -> String {
    format!(
        "{}{}{}",
        folder.last_segment(),
        EQUIPMENT_MARKER,
        XLSX_EXTENSION
    )
}

/// `<last segment, spaces as underscores>_equipment_data_<YYYYMMDD_HHMMSS>.xlsx`
pub fn next_backup_name(folder: &FolderReference, now: NaiveDateTime) -> String {
    format!(
        "{}{}_{}{}",
        folder.last_segment().replace(' ', "_"),
        EQUIPMENT_MARKER,
        now.format("%Y%m%d_%H%M%S"),
        XLSX_EXTENSION
    )
}

fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}/{}", parent, child)
    }
}
