//! Equipment Portal - OneDrive equipment spreadsheet backend
//!
//! This library reads client equipment workbooks from a OneDrive folder,
//! normalizes them into equipment records, and writes edited records back
//! as timestamped backup workbooks. The original workbook is never
//! overwritten.
//!
//! # Features
//!
//! - Newest-file resolution per client folder
//! - Header block capture and letterhead re-export
//! - Declared column schema checked on read
//! - Session-gated HTTP API (Axum)
//!
//! # Example
//!
//! ```no_run
//! use equipment_portal::excel::{decode, ExcelImporter};
//!
//! let grid = ExcelImporter::from_path("Acme_equipment_data.xlsx")?.import()?;
//! let sheet = decode(&grid)?;
//!
//! println!("Records: {}", sheet.records.len());
//! # Ok::<(), equipment_portal::error::PortalError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod drive;
pub mod error;
pub mod excel;
pub mod locator;
pub mod types;

// Re-export commonly used types
pub use error::{PortalError, PortalResult};
pub use types::{EquipmentRecord, FolderReference, HeaderBlock, RemoteFileDescriptor, SheetGrid};
