use crate::error::{PortalError, PortalResult};
use crate::excel::{decode, encode, ExcelExporter, ExcelImporter};
use crate::types::{EquipmentRecord, HeaderBlock};
use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Input document for `export`; `inspect --output` writes the same shape
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(default)]
    pub header_block: Option<HeaderBlock>,
    #[serde(alias = "rows")]
    pub records: Vec<EquipmentRecord>,
}

/// Execute the inspect command
///
/// Without `output`, prints the decoded sheet as JSON and nothing else so
/// the result can be piped.
pub fn inspect(input: PathBuf, output: Option<PathBuf>, verbose: bool) -> PortalResult<()> {
    let grid = ExcelImporter::from_path(&input)?.import()?;
    let sheet = decode(&grid)?;

    let json = serde_json::to_string_pretty(&sheet)
        .map_err(|e| PortalError::Transcode(format!("Failed to serialize records: {}", e)))?;

    let Some(output) = output else {
        println!("{}", json);
        return Ok(());
    };

    println!("{}", "📋 Equipment Portal - Inspect".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!(
            "   Sheet: {} rows x {} columns",
            grid.height(),
            grid.width()
        );
        println!("   Header rows captured: {}", sheet.header_block.len());
        for record in &sheet.records {
            let marker = if record.selected { "●" } else { "○" };
            println!(
                "   {} {} / {} / {} / {}",
                marker, record.device_type, record.manufacturer, record.model, record.serial
            );
        }
        println!();
    }

    fs::write(&output, json)?;

    println!("{}", "✅ Inspect Complete!".bold().green());
    println!("   Records: {}\n", sheet.records.len());

    Ok(())
}

/// Execute the export command
pub fn export(input: PathBuf, output: PathBuf, verbose: bool) -> PortalResult<()> {
    println!("{}", "📊 Equipment Portal - Excel Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let content = fs::read_to_string(&input)?;
    let document: ExportDocument = serde_json::from_str(&content).map_err(|e| {
        PortalError::MalformedInput(format!("{}: {}", input.display(), e))
    })?;

    if verbose {
        println!("{}", "📖 Encoding records...".cyan());
        println!("   Found {} records", document.records.len());
        match &document.header_block {
            Some(header) => println!("   Header block: {} rows\n", header.len()),
            None => println!("   Header block: none\n"),
        }
    }

    let grid = encode(document.header_block.as_ref(), &document.records);
    ExcelExporter::new(grid).export(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());

    Ok(())
}
