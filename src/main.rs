use clap::{Parser, Subcommand};
use equipment_portal::api::run_api_server;
use equipment_portal::cli;
use equipment_portal::config::PortalConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "equipment-portal")]
#[command(about = "Browse, read and back up OneDrive equipment spreadsheets")]
#[command(long_about = "Equipment Portal - OneDrive equipment spreadsheet backend

Reads the newest *_equipment_data.xlsx workbook of a client folder and
writes edits back as timestamped backups. Originals are never overwritten.

COMMANDS:
  serve    - Run the authenticated HTTP server
  inspect  - Decode a local equipment workbook to JSON
  export   - Encode JSON records into an equipment workbook

CONFIGURATION:
  serve reads TENANT_ID, CLIENT_ID, CLIENT_SECRET, ONEDRIVE_USER,
  ONEDRIVE_FOLDER_PATH, LOGIN_USERNAME and LOGIN_PASSWORD from the
  environment (a .env file in the working directory is loaded first).

EXAMPLES:
  equipment-portal serve --port 3000
  equipment-portal inspect Acme_equipment_data.xlsx > acme.json
  equipment-portal export acme.json Acme_equipment_data.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the authenticated HTTP server
    Serve {
        #[command(flatten)]
        config: PortalConfig,
    },

    #[command(long_about = "Decode a local equipment workbook.

Prints {headerBlock, records} as JSON, or writes it to --output with a
summary. Data rows are read by position: Device Type, Manufacturer,
Model, Serial Number, Notes, Selected. A column header row (row 7) that
differs from these labels is only logged.")]
    /// Decode a local equipment workbook to JSON
    Inspect {
        /// Path to .xlsx file
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show each decoded record
        #[arg(short, long)]
        verbose: bool,
    },

    /// Encode JSON records into an equipment workbook
    Export {
        /// JSON file with {headerBlock?, records}
        input: PathBuf,

        /// Output .xlsx path
        output: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_api_server(config))
        }

        Commands::Inspect {
            input,
            output,
            verbose,
        } => Ok(cli::inspect(input, output, verbose)?),

        Commands::Export {
            input,
            output,
            verbose,
        } => Ok(cli::export(input, output, verbose)?),
    }
}
