// src/main.rs
use anyhow::{bail, Context};
use dotenv::dotenv;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sheets_feed::common::safe_token_log;
use sheets_feed::{CellQuery, RowQuery, ServiceAccountCredential, SheetsConfig, SpreadsheetService};

mod cli;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let key = env::var("SHEETS_SPREADSHEET_KEY").context("SHEETS_SPREADSHEET_KEY is not set")?;
    let auth_token = env::var("SHEETS_AUTH_TOKEN").ok().filter(|t| !t.is_empty());
    let service_account_file = env::var("GOOGLE_SERVICE_ACCOUNT_FILE").ok();
    let config = SheetsConfig::from_env();

    if let Some(token) = &auth_token {
        info!("Using auth token {}", safe_token_log(token));
    }

    let doc = SpreadsheetService::new(key, auth_token, config)?;

    if let Some(path) = service_account_file {
        let credential = ServiceAccountCredential::from_file(&path)
            .with_context(|| format!("Failed to load service account from {}", path))?;
        info!("Authorizing as {}", credential.client_email);
        doc.use_service_account_auth(credential).await?;
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    match cli.command {
        Commands::Info => {
            let info = doc.get_info().await?;
            println!("{}", info.title);
            if let Some(author) = &info.author {
                println!("  author: {} <{}>", author.name, author.email);
            }
            println!("  updated: {}", info.updated);
            for sheet in &info.worksheets {
                println!(
                    "  [{}] {} ({} x {})",
                    sheet.id, sheet.title, sheet.row_count, sheet.col_count
                );
            }
        }
        Commands::Rows {
            worksheet_id,
            num,
            query,
        } => {
            let mut options = RowQuery::new();
            if let Some(num) = num {
                options = options.num(num);
            }
            if let Some(query) = query {
                options = options.query(query);
            }

            let rows = doc.get_rows(&worksheet_id, &options).await?;
            if rows.is_empty() {
                warn!("Worksheet {} has no rows", worksheet_id);
            }
            for (i, row) in rows.iter().enumerate() {
                let fields = row
                    .fields()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}: {}", i + 1, fields);
            }
        }
        Commands::Cells { worksheet_id } => {
            for cell in doc.get_cells(&worksheet_id, &CellQuery::new()).await? {
                println!("R{}C{} = {}", cell.row, cell.col, cell.value);
            }
        }
        Commands::AddRow {
            worksheet_id,
            fields,
        } => {
            if doc.client().mode().await == sheets_feed::AuthMode::Anonymous {
                bail!("Adding rows needs SHEETS_AUTH_TOKEN or GOOGLE_SERVICE_ACCOUNT_FILE");
            }
            doc.add_row(&worksheet_id, fields).await?;
            info!("Row added to worksheet {}", worksheet_id);
        }
    }

    Ok(())
}
