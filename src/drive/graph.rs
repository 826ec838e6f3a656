//! Microsoft Graph (OneDrive) implementation of `RemoteStore`

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, error};

use super::{ReadLocator, RemoteStore, TokenProvider};
use crate::error::{PortalError, PortalResult};
use crate::types::{EntryKind, RemoteFileDescriptor};

const GRAPH_ROOT: &str = "https://graph.microsoft.com/v1.0";

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// One page of a `children` listing
#[derive(Deserialize)]
struct ChildrenPage {
    value: Vec<DriveItem>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveItem {
    id: String,
    name: String,
    last_modified_date_time: Option<DateTime<Utc>>,
    folder: Option<serde_json::Value>,
}

impl From<DriveItem> for RemoteFileDescriptor {
    fn from(item: DriveItem) -> Self {
        RemoteFileDescriptor {
            id: item.id,
            name: item.name,
            last_modified: item.last_modified_date_time,
            kind: if item.folder.is_some() {
                EntryKind::Folder
            } else {
                EntryKind::File
            },
        }
    }
}

/// A user's OneDrive, addressed through Microsoft Graph
pub struct GraphDrive {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    drive_user: String,
}

impl GraphDrive {
    pub fn new(
        client: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        drive_user: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tokens,
            drive_user: drive_user.into(),
        }
    }

    fn drive_url(&self) -> String {
        format!(
            "{}/users/{}/drive",
            GRAPH_ROOT,
            urlencoding::encode(&self.drive_user)
        )
    }

    /// `.../drive/root:/<path>:` with each segment percent-encoded
    fn path_url(&self, path: &str) -> String {
        format!("{}/root:/{}:", self.drive_url(), encode_path(path))
    }

    fn content_url(&self, locator: &ReadLocator) -> String {
        match locator {
            ReadLocator::ItemId(id) => {
                format!("{}/items/{}/content", self.drive_url(), urlencoding::encode(id))
            }
            ReadLocator::Path(path) => format!("{}/content", self.path_url(path)),
        }
    }
}

/// Percent-encode each segment of a slash-delimited path
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl RemoteStore for GraphDrive {
    async fn list_children(&self, folder_path: &str) -> PortalResult<Vec<RemoteFileDescriptor>> {
        let token = self.tokens.access_token().await?;
        let mut url = format!("{}/children", self.path_url(folder_path));
        let mut entries = Vec::new();

        loop {
            let page: ChildrenPage = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| {
                    error!(folder = folder_path, error = %e, "listing folder failed");
                    PortalError::remote(format!("listing '{}'", folder_path), e)
                })?
                .json()
                .await
                .map_err(|e| PortalError::remote(format!("reading listing of '{}'", folder_path), e))?;

            entries.extend(page.value.into_iter().map(RemoteFileDescriptor::from));

            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }

        debug!(folder = folder_path, count = entries.len(), "listed folder");
        Ok(entries)
    }

    async fn get_content(&self, locator: &ReadLocator) -> PortalResult<Vec<u8>> {
        let token = self.tokens.access_token().await?;
        let url = self.content_url(locator);

        let bytes = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(?locator, error = %e, "downloading file failed");
                PortalError::remote("downloading the equipment file", e)
            })?
            .bytes()
            .await
            .map_err(|e| PortalError::remote("downloading the equipment file", e))?;

        Ok(bytes.to_vec())
    }

    async fn put_content(&self, file_path: &str, bytes: Vec<u8>) -> PortalResult<()> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/content", self.path_url(file_path));

        self.client
            .put(&url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, XLSX_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(file = file_path, error = %e, "uploading backup failed");
                PortalError::remote(format!("uploading '{}'", file_path), e)
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticToken;

    #[async_trait]
    impl TokenProvider for StaticToken {
        async fn access_token(&self) -> PortalResult<String> {
            Ok("token".to_string())
        }
    }

    fn drive() -> GraphDrive {
        GraphDrive::new(reqwest::Client::new(), Arc::new(StaticToken), "ops@example.com")
    }

    #[test]
    fn test_encode_path_escapes_segments() {
        assert_eq!(
            encode_path("/Equipment/Acme Corp/a#b.xlsx"),
            "Equipment/Acme%20Corp/a%23b.xlsx"
        );
    }

    #[test]
    fn test_content_url_by_id() {
        let url = drive().content_url(&ReadLocator::ItemId("01ABC".to_string()));
        assert_eq!(
            url,
            "https://graph.microsoft.com/v1.0/users/ops%40example.com/drive/items/01ABC/content"
        );
    }

    #[test]
    fn test_content_url_by_path() {
        let url = drive().content_url(&ReadLocator::Path("Equipment/Acme Corp/x.xlsx".to_string()));
        assert_eq!(
            url,
            "https://graph.microsoft.com/v1.0/users/ops%40example.com/drive/root:/Equipment/Acme%20Corp/x.xlsx:/content"
        );
    }

    #[test]
    fn test_drive_item_folder_detection() {
        let json = r#"{
            "value": [
                {"id": "1", "name": "Acme", "folder": {"childCount": 2}},
                {"id": "2", "name": "a_equipment_data.xlsx", "file": {},
                 "lastModifiedDateTime": "2024-01-01T10:00:00Z"}
            ]
        }"#;
        let page: ChildrenPage = serde_json::from_str(json).unwrap();
        let entries: Vec<RemoteFileDescriptor> =
            page.value.into_iter().map(RemoteFileDescriptor::from).collect();

        assert!(page.next_link.is_none());
        assert!(entries[0].is_folder());
        assert!(entries[1].is_file());
        assert!(entries[1].last_modified.is_some());
    }
}
