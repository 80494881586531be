use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::common::{SheetsError, SheetsResult};

/// How the session authenticates its requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Anonymous,
    Token,
    Jwt,
}

/// Access level segment of a feed URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Detail level segment of a feed URL; edit links only come back with `Full`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Values,
    Full,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::Values => "values",
            Projection::Full => "full",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

impl FromStr for Projection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "values" => Ok(Projection::Values),
            "full" => Ok(Projection::Full),
            other => Err(format!("unknown projection: {}", other)),
        }
    }
}

/// Short-lived token minted by the service account flow
#[derive(Debug, Clone, PartialEq)]
pub struct BearerToken {
    pub token_type: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Credential attached to outgoing feed requests
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    /// Opaque login token sent as `GoogleLogin auth=<token>`
    Login(String),
    Bearer(BearerToken),
}

impl Credential {
    /// Value for the Authorization header
    pub fn header_value(&self) -> String {
        match self {
            Credential::Bearer(token) if token.token_type.eq_ignore_ascii_case("bearer") => {
                format!("Bearer {}", token.value)
            }
            Credential::Bearer(token) => format!("GoogleLogin auth={}", token.value),
            Credential::Login(token) => format!("GoogleLogin auth={}", token),
        }
    }
}

/// Service account key material, as found in a downloaded JSON key file
#[derive(Clone, Deserialize)]
pub struct ServiceAccountCredential {
    pub client_email: String,
    pub private_key: String,
}

impl fmt::Debug for ServiceAccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredential")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl ServiceAccountCredential {
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
        }
    }

    pub fn from_json(json: &str) -> SheetsResult<Self> {
        let credential: Self = serde_json::from_str(json)
            .map_err(|e| SheetsError::InvalidCredentials(e.to_string()))?;
        if credential.client_email.trim().is_empty() || credential.private_key.trim().is_empty() {
            return Err(SheetsError::InvalidCredentials(
                "client_email and private_key are required".to_string(),
            ));
        }
        Ok(credential)
    }

    pub fn from_file(path: impl AsRef<Path>) -> SheetsResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SheetsError::InvalidCredentials(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

/// Claims of the signed assertion sent to the token endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
