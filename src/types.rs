use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PortalError, PortalResult};

//==============================================================================
// Equipment Records
//==============================================================================

/// One row of equipment inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentRecord {
    pub device_type: String,
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub notes: String,
    pub selected: bool,
}

impl EquipmentRecord {
    /// A record is empty when none of the identifying fields carry text.
    /// Notes and the selected flag alone do not make a row significant.
    pub fn is_empty(&self) -> bool {
        self.device_type.is_empty()
            && self.manufacturer.is_empty()
            && self.model.is_empty()
            && self.serial.is_empty()
    }
}

//==============================================================================
// Header Block
//==============================================================================

/// The first rows of a sheet, captured verbatim as cell text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderBlock {
    #[serde(deserialize_with = "deserialize_cell_rows")]
    pub rows: Vec<Vec<String>>,
}

impl HeaderBlock {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text at (row, col), or "" when the cell was never captured
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Accepts any JSON scalar as a header cell, since edited header rows may
/// round-trip through a browser as numbers or nulls.
fn deserialize_cell_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<serde_json::Value>> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(json_cell_to_text).collect())
        .collect())
}

fn json_cell_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

//==============================================================================
// Sheet Grid
//==============================================================================

/// Row/cell rectangle exchanged with the xlsx transcoder.
///
/// Rows are indexed physically from A1. Blank cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    pub rows: Vec<Vec<String>>,
    /// Column widths (in character units) applied on export, by column index
    pub column_widths: Vec<f64>,
}

impl SheetGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows,
            column_widths: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

//==============================================================================
// Remote Store Types
//==============================================================================

/// Slash-delimited logical path of a folder in the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderReference {
    segments: Vec<String>,
}

impl FolderReference {
    /// Parse a folder identifier, ignoring blank segments.
    ///
    /// Segment text is kept verbatim, surrounding spaces included.
    pub fn parse(raw: &str) -> PortalResult<Self> {
        let segments: Vec<String> = raw
            .split('/')
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(PortalError::MalformedInput(
                "folder identifier is missing or empty".to_string(),
            ));
        }

        Ok(Self { segments })
    }

    /// Last path segment, verbatim
    pub fn last_segment(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Normalized path without leading or trailing slashes
    pub fn as_path(&self) -> String {
        self.segments.join("/")
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for FolderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_path())
    }
}

/// Whether a remote entry is a file or a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// An entry as known to the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileDescriptor {
    pub id: String,
    pub name: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub kind: EntryKind,
}

impl RemoteFileDescriptor {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}
