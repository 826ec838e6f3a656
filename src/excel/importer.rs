//! Excel importer implementation - Excel (.xlsx) bytes → cell grid

use crate::error::{PortalError, PortalResult};
use crate::types::SheetGrid;
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use chrono::NaiveTime;
use std::io::Cursor;
use std::path::Path;

/// Reads the first worksheet of an .xlsx workbook into a `SheetGrid`
pub struct ExcelImporter {
    bytes: Vec<u8>,
}

impl ExcelImporter {
    /// Create an importer over workbook bytes (e.g. downloaded content)
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Create an importer over a local workbook file
    pub fn from_path<P: AsRef<Path>>(path: P) -> PortalResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(bytes))
    }

    /// Import the first worksheet as a grid anchored at A1
    pub fn import(self) -> PortalResult<SheetGrid> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(self.bytes))
            .map_err(|e| PortalError::Transcode(format!("Failed to open Excel data: {}", e)))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| {
                PortalError::Transcode(format!("Failed to read first worksheet: {}", e))
            })?,
            // Workbook without sheets: nothing occupied
            None => return Ok(SheetGrid::default()),
        };

        Ok(Self::grid_from_range(&range))
    }

    /// Lay the occupied range out by absolute position, so leading blank
    /// rows and columns keep their physical indices.
    fn grid_from_range(range: &Range<Data>) -> SheetGrid {
        let Some((end_row, end_col)) = range.end() else {
            return SheetGrid::default();
        };

        let rows = (0..=end_row)
            .map(|row| {
                (0..=end_col)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map(Self::cell_text)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        SheetGrid::new(rows)
    }

    /// Render a cell as the text a user sees in it
    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Data::DateTime(dt) if !dt.is_duration() => match dt.as_datetime() {
                Some(value) if value.time() == NaiveTime::MIN => {
                    value.format("%Y-%m-%d").to_string()
                }
                Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => dt.as_f64().to_string(),
            },
            Data::DateTimeIso(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_integral_float_has_no_fraction() {
        assert_eq!(ExcelImporter::cell_text(&Data::Float(12345.0)), "12345");
        assert_eq!(ExcelImporter::cell_text(&Data::Float(1.5)), "1.5");
    }

    #[test]
    fn test_cell_text_scalars() {
        assert_eq!(ExcelImporter::cell_text(&Data::Empty), "");
        assert_eq!(ExcelImporter::cell_text(&Data::Int(7)), "7");
        assert_eq!(ExcelImporter::cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(
            ExcelImporter::cell_text(&Data::String("Yes".to_string())),
            "Yes"
        );
    }

    #[test]
    fn test_cell_text_dates_render_as_dates() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};

        let date = Data::DateTime(ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false));
        let stamp = Data::DateTime(ExcelDateTime::new(45292.5, ExcelDateTimeType::DateTime, false));

        assert_eq!(ExcelImporter::cell_text(&date), "2024-01-01");
        assert_eq!(ExcelImporter::cell_text(&stamp), "2024-01-01 12:00:00");
        assert_eq!(
            ExcelImporter::cell_text(&Data::DateTimeIso("2024-01-01".to_string())),
            "2024-01-01"
        );
    }

    #[test]
    fn test_import_rejects_non_xlsx_bytes() {
        let importer = ExcelImporter::from_bytes(b"not a workbook".to_vec());
        assert!(matches!(
            importer.import(),
            Err(PortalError::Transcode(_))
        ));
    }
}
