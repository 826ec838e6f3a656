//! Remote file store access
//!
//! `RemoteStore` is the seam between the portal and the cloud drive. The
//! production implementation talks to Microsoft Graph; tests substitute an
//! in-memory store.

pub mod graph;
pub mod token;

use async_trait::async_trait;

use crate::error::PortalResult;
use crate::types::RemoteFileDescriptor;

pub use graph::GraphDrive;
pub use token::{ClientCredentials, TokenProvider};

/// How to address a file for reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadLocator {
    /// Store-assigned item id
    ItemId(String),
    /// Drive path relative to the drive root
    Path(String),
}

/// Operations the portal needs from the cloud drive
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List the direct children of a folder (drive-root-relative path)
    async fn list_children(&self, folder_path: &str) -> PortalResult<Vec<RemoteFileDescriptor>>;

    /// Download a file's bytes
    async fn get_content(&self, locator: &ReadLocator) -> PortalResult<Vec<u8>>;

    /// Upload bytes to a drive path, creating the file
    async fn put_content(&self, file_path: &str, bytes: Vec<u8>) -> PortalResult<()>;
}
