//! In-memory remote store shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use equipment_portal::config::{
    DriveSettings, GraphCredentials, LoginSettings, PortalConfig,
};
use equipment_portal::drive::{ReadLocator, RemoteStore};
use equipment_portal::types::{EntryKind, RemoteFileDescriptor};
use equipment_portal::{PortalError, PortalResult};

#[derive(Default)]
pub struct MemoryStore {
    pub folders: HashMap<String, Vec<RemoteFileDescriptor>>,
    pub contents: HashMap<String, Vec<u8>>,
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail_uploads: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file entry (and optionally its bytes, keyed by id)
    pub fn with_file(mut self, folder: &str, id: &str, name: &str, hour: u32, bytes: Option<Vec<u8>>) -> Self {
        self.folders
            .entry(folder.to_string())
            .or_default()
            .push(RemoteFileDescriptor {
                id: id.to_string(),
                name: name.to_string(),
                last_modified: Some(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()),
                kind: EntryKind::File,
            });
        if let Some(bytes) = bytes {
            self.contents.insert(id.to_string(), bytes);
        }
        self
    }

    pub fn with_folder(mut self, parent: &str, name: &str) -> Self {
        self.folders
            .entry(parent.to_string())
            .or_default()
            .push(RemoteFileDescriptor {
                id: format!("folder-{}", name),
                name: name.to_string(),
                last_modified: None,
                kind: EntryKind::Folder,
            });
        self
    }

    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_children(&self, folder_path: &str) -> PortalResult<Vec<RemoteFileDescriptor>> {
        self.folders
            .get(folder_path)
            .cloned()
            .ok_or_else(|| PortalError::remote(format!("listing '{}'", folder_path), "404 Not Found"))
    }

    async fn get_content(&self, locator: &ReadLocator) -> PortalResult<Vec<u8>> {
        let key = match locator {
            ReadLocator::ItemId(id) => id,
            ReadLocator::Path(path) => path,
        };
        self.contents
            .get(key)
            .cloned()
            .ok_or_else(|| PortalError::remote("downloading the equipment file", "404 Not Found"))
    }

    async fn put_content(&self, file_path: &str, bytes: Vec<u8>) -> PortalResult<()> {
        if self.fail_uploads {
            return Err(PortalError::remote(
                format!("uploading '{}'", file_path),
                "503 Service Unavailable",
            ));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((file_path.to_string(), bytes));
        Ok(())
    }
}

pub fn test_config() -> PortalConfig {
    PortalConfig {
        host: "127.0.0.1".to_string(),
        port: 3000,
        credentials: GraphCredentials {
            tenant_id: "tenant".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        },
        drive: DriveSettings {
            drive_user: "ops@example.com".to_string(),
            folder_root: "Equipment".to_string(),
        },
        login: LoginSettings {
            login_username: "admin".to_string(),
            login_password: "hunter2".to_string(),
        },
        public_dir: "public".into(),
        views_dir: "views".into(),
    }
}
