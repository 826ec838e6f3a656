//! Excel exporter implementation - cell grid → Excel (.xlsx)

use crate::error::{PortalError, PortalResult};
use crate::types::SheetGrid;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Name of the single worksheet in exported workbooks
pub const SHEET_NAME: &str = "Sheet1";

/// Writes a `SheetGrid` into a single-sheet workbook
pub struct ExcelExporter {
    grid: SheetGrid,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(grid: SheetGrid) -> Self {
        Self { grid }
    }

    /// Serialize the workbook into memory, ready for upload
    pub fn to_bytes(&self) -> PortalResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save_to_buffer()
            .map_err(|e| PortalError::Transcode(format!("Failed to build Excel file: {}", e)))
    }

    /// Export the workbook to an .xlsx file on disk
    pub fn export(&self, output_path: &Path) -> PortalResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| PortalError::Transcode(format!("Failed to save Excel file: {}", e)))
    }

    fn build_workbook(&self) -> PortalResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| PortalError::Transcode(format!("Failed to set worksheet name: {}", e)))?;

        self.write_grid(worksheet)?;
        Ok(workbook)
    }

    fn write_grid(&self, worksheet: &mut Worksheet) -> PortalResult<()> {
        for (col_idx, width) in self.grid.column_widths.iter().enumerate() {
            worksheet
                .set_column_width(col_idx as u16, *width)
                .map_err(|e| {
                    PortalError::Transcode(format!("Failed to set column width: {}", e))
                })?;
        }

        for (row_idx, row) in self.grid.rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                // Blank cells stay unwritten
                if value.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(row_idx as u32, col_idx as u16, value)
                    .map_err(|e| PortalError::Transcode(format!("Failed to write cell: {}", e)))?;
            }
        }

        Ok(())
    }
}
