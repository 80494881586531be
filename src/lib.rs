//! Client for the Google Sheets XML feeds
//!
//! Spreadsheet metadata, worksheets, rows and cells are exposed as plain
//! objects. Reads go through the worksheets, list and cells feeds; edits are
//! submitted to each entry's edit link.
//!
//! ```no_run
//! use sheets_feed::{RowQuery, SheetsConfig, SpreadsheetService};
//!
//! # async fn example() -> sheets_feed::SheetsResult<()> {
//! let doc = SpreadsheetService::new("spreadsheet-key", None, SheetsConfig::default())?;
//! let info = doc.get_info().await?;
//! println!("{} has {} worksheets", info.title, info.worksheets.len());
//!
//! for row in doc.get_rows("1", &RowQuery::new().num(10)).await? {
//!     println!("{:?}", row.get("name"));
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod common;
pub mod feed;
pub mod spreadsheet;
pub mod xml;

#[cfg(test)]
mod testing;

pub use auth::{AuthMode, BearerToken, Projection, ServiceAccountCredential, Visibility};
pub use common::{SheetsConfig, SheetsError, SheetsResult};
pub use spreadsheet::{
    CellEntity, CellQuery, NewWorksheet, RowEntity, RowQuery, SpreadsheetInfo, SpreadsheetService,
    WorksheetEntity,
};
