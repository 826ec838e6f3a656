//! Equipment spreadsheet support
//!
//! - Codec: cell grid ↔ header block + equipment records
//! - Import: Excel (.xlsx) bytes → cell grid
//! - Export: cell grid → Excel (.xlsx) bytes

pub mod codec;
mod exporter;
mod importer;

pub use codec::{decode, encode, DecodedSheet};
pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;

use crate::error::PortalResult;
use crate::types::{EquipmentRecord, HeaderBlock};

/// Decode workbook bytes straight into header block and records
pub fn read_workbook(bytes: Vec<u8>) -> PortalResult<DecodedSheet> {
    let grid = ExcelImporter::from_bytes(bytes).import()?;
    decode(&grid)
}

/// Encode records into workbook bytes
pub fn write_workbook(
    header: Option<&HeaderBlock>,
    records: &[EquipmentRecord],
) -> PortalResult<Vec<u8>> {
    ExcelExporter::new(encode(header, records)).to_bytes()
}
