//! Equipment sheet codec - cell grid ↔ equipment records
//!
//! Sheet layout (0-indexed physical rows):
//!
//! | Rows  | Content                                              |
//! |-------|------------------------------------------------------|
//! | 0..=4 | letterhead; client info in col 2, company in col 3   |
//! | 5     | blank                                                |
//! | 6     | column headers (`COLUMN_SCHEMA`)                     |
//! | 7..   | one equipment record per row                         |

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PortalResult;
use crate::types::{EquipmentRecord, HeaderBlock, SheetGrid};

/// Number of physical rows captured into the header block
pub const HEADER_ROWS: usize = 6;

/// Physical row holding the column headers
pub const COLUMN_HEADER_ROW: usize = 6;

/// Declared column order of the data region
pub const COLUMN_SCHEMA: [&str; 6] = [
    "Device Type",
    "Manufacturer",
    "Model",
    "Serial Number",
    "Notes",
    "Selected",
];

/// Columns that must be present in the header row; "Selected" is optional
const REQUIRED_COLUMNS: usize = 5;

/// Column carrying the caller-supplied client info
const CLIENT_INFO_COL: usize = 2;

/// Column carrying the fixed company letterhead
const LETTERHEAD_COL: usize = 3;

/// Minimum column width for every exported column
pub const MIN_COLUMN_WIDTH: f64 = 20.0;

/// Company letterhead written into output rows 2-5, column 3
pub const LETTERHEAD: [&str; 4] = [
    "Northern Office Equipment Ltd.",
    "1250 Industrial Parkway, Unit 4",
    "Mississauga, ON L5T 1V8",
    "Tel: (905) 555-0142",
];

const SELECTED_YES: &str = "Yes";
const SELECTED_NO: &str = "No";

/// Result of decoding an equipment sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedSheet {
    pub header_block: HeaderBlock,
    pub records: Vec<EquipmentRecord>,
}

/// Decode a cell grid into its header block and equipment records.
///
/// Grids shorter than the header region are not an error: they decode to
/// the rows that exist and no records. Data rows are always mapped by
/// column position; a header row that disagrees with `COLUMN_SCHEMA` is
/// only logged.
pub fn decode(grid: &SheetGrid) -> PortalResult<DecodedSheet> {
    let width = grid.width();

    let header_rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .take(HEADER_ROWS)
        .map(|row| {
            (0..width)
                .map(|col| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    let header_block = HeaderBlock::new(header_rows);

    if grid.height() <= COLUMN_HEADER_ROW {
        debug!(
            rows = grid.height(),
            "sheet ends before the column header row, no records"
        );
        return Ok(DecodedSheet {
            header_block,
            records: Vec::new(),
        });
    }

    let mismatches = check_column_headers(&grid.rows[COLUMN_HEADER_ROW]);
    if mismatches > 0 {
        warn!(mismatches, "column header row differs from the expected layout");
    }

    let records = grid.rows[COLUMN_HEADER_ROW + 1..]
        .iter()
        .map(|row| record_from_row(row))
        .filter(|record| !record.is_empty())
        .collect();

    Ok(DecodedSheet {
        header_block,
        records,
    })
}

/// Compare the header row with the declared schema, warning on each mismatch.
///
/// Returns the number of mismatched columns.
fn check_column_headers(row: &[String]) -> usize {
    if row.iter().all(|cell| cell.trim().is_empty()) {
        warn!("column header row is blank, mapping data columns by position");
        return 0;
    }

    let mut mismatches = 0;
    for (idx, expected) in COLUMN_SCHEMA.iter().enumerate() {
        let found = row.get(idx).map(|s| s.trim()).unwrap_or("");

        if found.is_empty() && idx >= REQUIRED_COLUMNS {
            continue;
        }

        if !found.eq_ignore_ascii_case(expected) {
            warn!(
                column = %column_letter(idx),
                found,
                expected,
                "unexpected column header, decoding by position"
            );
            mismatches += 1;
        }
    }

    mismatches
}

fn record_from_row(row: &[String]) -> EquipmentRecord {
    let field = |idx: usize| row.get(idx).cloned().unwrap_or_default();

    EquipmentRecord {
        device_type: field(0),
        manufacturer: field(1),
        model: field(2),
        serial: field(3),
        notes: field(4),
        selected: row.get(5).is_some_and(|s| s == SELECTED_YES),
    }
}

/// Encode records into the full sheet layout.
///
/// Only the client-info column (col 2) of the first four header rows
/// survives from `header`; everything else in the letterhead is fixed.
pub fn encode(header: Option<&HeaderBlock>, records: &[EquipmentRecord]) -> SheetGrid {
    let width = COLUMN_SCHEMA.len();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(COLUMN_HEADER_ROW + 1 + records.len());

    // Letterhead rows 1-5
    for _ in 0..5 {
        rows.push(vec![String::new(); width]);
    }

    if let Some(header) = header.filter(|h| h.len() >= 4) {
        for i in 0..4 {
            rows[i + 1][CLIENT_INFO_COL] = header.cell(i, CLIENT_INFO_COL).to_string();
        }
    }

    for (i, line) in LETTERHEAD.iter().enumerate() {
        rows[i + 1][LETTERHEAD_COL] = (*line).to_string();
    }

    // Row 6 spacer, row 7 column headers
    rows.push(vec![String::new(); width]);
    rows.push(COLUMN_SCHEMA.iter().map(|s| (*s).to_string()).collect());

    for record in records {
        rows.push(vec![
            record.device_type.clone(),
            record.manufacturer.clone(),
            record.model.clone(),
            record.serial.clone(),
            record.notes.clone(),
            if record.selected {
                SELECTED_YES
            } else {
                SELECTED_NO
            }
            .to_string(),
        ]);
    }

    SheetGrid {
        rows,
        column_widths: vec![MIN_COLUMN_WIDTH; width],
    }
}

/// Convert a 0-based column index to its letter (0 → A)
fn column_letter(idx: usize) -> String {
    let mut result = String::new();
    let mut n = idx + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    result
}
