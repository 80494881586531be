// src/cli.rs
//! Command line definition for the `sheets` binary

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sheets")]
#[command(
    version,
    about = "Read and append rows of a Google spreadsheet",
    after_help = "The spreadsheet comes from SHEETS_SPREADSHEET_KEY. Set SHEETS_AUTH_TOKEN or GOOGLE_SERVICE_ACCOUNT_FILE for private sheets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Show the spreadsheet title, author and worksheets
    Info,

    /// Print the rows of a worksheet
    Rows {
        /// Worksheet id, e.g. `od6` or `1`
        worksheet_id: String,

        /// Maximum number of rows
        #[arg(short, long)]
        num: Option<u32>,

        /// Structured query, e.g. `age > 25`
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Print every cell of a worksheet as `R<row>C<col> = value`
    Cells {
        /// Worksheet id
        worksheet_id: String,
    },

    /// Append a row
    AddRow {
        /// Worksheet id
        worksheet_id: String,

        /// Column values as `key=value`
        #[arg(required = true, value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(pair: &str) -> Result<(String, String), String> {
    pair.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got: {}", pair))
}
