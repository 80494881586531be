// src/auth/authorizer.rs
//! Service account token exchange

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::models::{BearerToken, JwtClaims, ServiceAccountCredential, TokenResponse};
use crate::common::config::GOOGLE_TOKEN_URL;
use crate::common::{safe_token_log, SheetsError, SheetsResult};
use crate::feed::client::encode_query;
use crate::feed::{HttpRequest, HttpTransport};

/// Scope granting access to the spreadsheet feeds
pub const GOOGLE_AUTH_SCOPE: &str = "https://spreadsheets.google.com/feeds";

const ASSERTION_LIFETIME_SECS: i64 = 3600;
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Mints bearer tokens for a session
#[async_trait]
pub trait TokenAuthorizer: Send + Sync {
    async fn authorize(&self) -> SheetsResult<BearerToken>;
}

/// Signs a JWT assertion with the service account key and trades it for an
/// access token
pub struct ServiceAccountAuthorizer {
    transport: Arc<dyn HttpTransport>,
    client_email: String,
    key: EncodingKey,
    token_url: String,
}

impl std::fmt::Debug for ServiceAccountAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuthorizer")
            .field("client_email", &self.client_email)
            .field("key", &"<redacted>")
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl ServiceAccountAuthorizer {
    /// The private key is parsed here; the credential itself is not retained
    pub fn new(credential: ServiceAccountCredential, transport: Arc<dyn HttpTransport>) -> SheetsResult<Self> {
        let key = EncodingKey::from_rsa_pem(credential.private_key.as_bytes())
            .map_err(|e| SheetsError::InvalidCredentials(e.to_string()))?;

        Ok(Self {
            transport,
            client_email: credential.client_email,
            key,
            token_url: GOOGLE_TOKEN_URL.to_string(),
        })
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub(crate) fn signed_assertion(&self) -> SheetsResult<String> {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            iss: self.client_email.clone(),
            scope: GOOGLE_AUTH_SCOPE.to_string(),
            aud: self.token_url.clone(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| SheetsError::AuthorizationFailed(format!("failed to sign assertion: {}", e)))
    }
}

#[async_trait]
impl TokenAuthorizer for ServiceAccountAuthorizer {
    async fn authorize(&self) -> SheetsResult<BearerToken> {
        let assertion = self.signed_assertion()?;
        let form = encode_query(&[
            ("grant_type".to_string(), JWT_BEARER_GRANT.to_string()),
            ("assertion".to_string(), assertion),
        ]);

        debug!(
            client_email = %self.client_email,
            token_url = %self.token_url,
            "Requesting service account access token"
        );

        let response = self
            .transport
            .send(HttpRequest {
                method: Method::POST,
                url: self.token_url.clone(),
                headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
                body: Some(form),
            })
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send token request");
                SheetsError::AuthorizationFailed(e.to_string())
            })?;

        let status = response.status;
        debug!(status = %status, "Received token response");

        if !status.is_success() {
            error!(
                status = %status,
                error = %response.body,
                "Service account authorization failed - check the key and that the sheet is shared with the account"
            );
            return Err(SheetsError::AuthorizationFailed(format!(
                "HTTP {}: {}",
                status, response.body
            )));
        }

        let token_response: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            error!(error = %e, "Malformed token response");
            SheetsError::AuthorizationFailed(format!("malformed token response: {}", e))
        })?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        info!(
            token = %safe_token_log(&token_response.access_token),
            expires_at = %expires_at,
            "Obtained service account access token"
        );

        Ok(BearerToken {
            token_type: token_response.token_type,
            value: token_response.access_token,
            expires_at,
        })
    }
}
