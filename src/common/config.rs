// Client configuration loaded from code or environment

use std::env;
use tracing::warn;

use crate::auth::models::{Projection, Visibility};

/// Base of every canonical feed URL
pub const GOOGLE_FEED_URL: &str = "https://spreadsheets.google.com/feeds/";

/// OAuth token endpoint used for the service account exchange
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Settings for a spreadsheet client
///
/// `visibility` and `projection` pin the feed URL segments. When left as
/// `None` they follow the credential state: private/full once any credential
/// is present, public/values otherwise.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub visibility: Option<Visibility>,
    pub projection: Option<Projection>,
    pub feed_base: String,
    pub token_url: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            visibility: None,
            projection: None,
            feed_base: GOOGLE_FEED_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }
}

impl SheetsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // SHEETS_VISIBILITY - "public" or "private"
        if let Ok(value) = env::var("SHEETS_VISIBILITY") {
            match value.parse::<Visibility>() {
                Ok(v) => config.visibility = Some(v),
                Err(_) => warn!(value = %value, "Ignoring invalid SHEETS_VISIBILITY"),
            }
        }

        // SHEETS_PROJECTION - "values" or "full"
        if let Ok(value) = env::var("SHEETS_PROJECTION") {
            match value.parse::<Projection>() {
                Ok(p) => config.projection = Some(p),
                Err(_) => warn!(value = %value, "Ignoring invalid SHEETS_PROJECTION"),
            }
        }

        if let Ok(base) = env::var("SHEETS_FEED_BASE") {
            if !base.trim().is_empty() {
                config.feed_base = base.trim().to_string();
            }
        }

        if let Ok(url) = env::var("SHEETS_TOKEN_URL") {
            if !url.trim().is_empty() {
                config.token_url = url.trim().to_string();
            }
        }

        config
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }
}
