// Error types for feed requests and entity operations

use thiserror::Error;

/// Errors surfaced by the spreadsheet client
///
/// Every failure aborts the operation that produced it; nothing here is
/// retried by the client itself.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid authorization key.")]
    InvalidAuthorization,

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("HTTP error {status}: {reason} {body}")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Sheet is private. Use authentication or make public.")]
    PrivateSheet,

    #[error("No response to {0} call")]
    EmptyResponse(&'static str),

    #[error("XML parse error: {0}")]
    Parse(String),

    #[error("Spreadsheet key not provided.")]
    MissingSpreadsheetKey,

    #[error("Google has officially deprecated ClientLogin. Use a token or service account auth instead.")]
    LegacyLoginUnsupported,

    #[error("{0} has no edit link; fetch it through an authenticated full-projection feed first")]
    MissingEditLink(&'static str),

    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),
}

impl SheetsError {
    /// True for failures caused by missing or rejected credentials
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            SheetsError::InvalidAuthorization
                | SheetsError::AuthorizationFailed(_)
                | SheetsError::PrivateSheet
        )
    }

    /// True for caller mistakes rather than server or network failures
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            SheetsError::MissingSpreadsheetKey
                | SheetsError::LegacyLoginUnsupported
                | SheetsError::MissingEditLink(_)
        )
    }
}

impl From<quick_xml::Error> for SheetsError {
    fn from(e: quick_xml::Error) -> Self {
        SheetsError::Parse(e.to_string())
    }
}

pub type SheetsResult<T> = Result<T, SheetsError>;
