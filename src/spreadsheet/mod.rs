//! # Spreadsheet Module
//!
//! This module exposes a spreadsheet's feeds as plain objects including:
//! - Spreadsheet info and worksheet listing/creation
//! - Row listing, appending, saving and deleting
//! - Cell listing and value updates

pub mod cell;
pub mod models;
pub mod options;
pub mod row;
pub mod service;
pub mod worksheet;


pub use cell::CellEntity;
pub use models::{Author, SpreadsheetInfo};
pub use options::{CellQuery, NewWorksheet, RowQuery};
pub use row::RowEntity;
pub use service::SpreadsheetService;
pub use worksheet::WorksheetEntity;
