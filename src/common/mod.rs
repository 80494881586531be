// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod helpers;


// Re-export commonly used types for convenience
pub use config::SheetsConfig;
pub use error::{SheetsError, SheetsResult};
pub use helpers::{escape_text, normalize_column_name, safe_token_log};
