// src/auth/session.rs
//! Authentication state owned by one spreadsheet client

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::authorizer::{ServiceAccountAuthorizer, TokenAuthorizer};
use super::models::{AuthMode, Credential, Projection, ServiceAccountCredential, Visibility};
use crate::common::{SheetsConfig, SheetsError, SheetsResult};
use crate::feed::HttpTransport;

/// Current credential plus the visibility/projection it implies
///
/// Moves from anonymous to token mode when a login token is supplied, and to
/// jwt mode once a service account authorization succeeds. In jwt mode the
/// bearer token is renewed on demand by [`AuthSession::ensure_fresh_token`].
pub struct AuthSession {
    mode: AuthMode,
    visibility: Visibility,
    projection: Projection,
    pinned_visibility: Option<Visibility>,
    pinned_projection: Option<Projection>,
    credential: Option<Credential>,
    authorizer: Option<Arc<dyn TokenAuthorizer>>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("mode", &self.mode)
            .field("visibility", &self.visibility)
            .field("projection", &self.projection)
            .field("has_credential", &self.credential.is_some())
            .finish()
    }
}

impl AuthSession {
    pub fn new(config: &SheetsConfig) -> Self {
        let mut session = Self {
            mode: AuthMode::Anonymous,
            visibility: Visibility::Public,
            projection: Projection::Values,
            pinned_visibility: config.visibility,
            pinned_projection: config.projection,
            credential: None,
            authorizer: None,
        };
        session.set_credential(None);
        session
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Records a credential and recomputes whatever visibility/projection
    /// configuration did not pin
    fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
        let authenticated = self.credential.is_some();

        self.visibility = self.pinned_visibility.unwrap_or(if authenticated {
            Visibility::Private
        } else {
            Visibility::Public
        });
        self.projection = self.pinned_projection.unwrap_or(if authenticated {
            Projection::Full
        } else {
            Projection::Values
        });
    }

    /// Uses a raw login token for subsequent requests
    ///
    /// A session already in jwt mode stays in jwt mode.
    pub fn set_token(&mut self, token: impl Into<String>) {
        if self.mode == AuthMode::Anonymous {
            self.mode = AuthMode::Token;
        }
        self.set_credential(Some(Credential::Login(token.into())));
        debug!(mode = ?self.mode, "Auth token set");
    }

    /// Authorizes through the given token source and switches to jwt mode
    ///
    /// On failure the session is left untouched.
    pub async fn authenticate(&mut self, authorizer: Arc<dyn TokenAuthorizer>) -> SheetsResult<()> {
        let token = authorizer.authorize().await.map_err(into_authorization_error)?;

        self.authorizer = Some(authorizer);
        self.mode = AuthMode::Jwt;
        self.set_credential(Some(Credential::Bearer(token)));
        info!(
            visibility = %self.visibility,
            projection = %self.projection,
            "Service account authorization succeeded"
        );
        Ok(())
    }

    /// Builds a JWT signer for the service account and authorizes with it
    pub async fn authenticate_as_service_account(
        &mut self,
        credential: ServiceAccountCredential,
        transport: Arc<dyn HttpTransport>,
        token_url: &str,
    ) -> SheetsResult<()> {
        let authorizer = ServiceAccountAuthorizer::new(credential, transport)?.with_token_url(token_url);
        self.authenticate(Arc::new(authorizer)).await
    }

    /// True when the next request must wait for a token renewal
    pub fn needs_renewal(&self) -> bool {
        if self.mode != AuthMode::Jwt {
            return false;
        }
        match &self.credential {
            Some(Credential::Bearer(token)) => token.is_expired(),
            _ => true,
        }
    }

    /// Renews the bearer token if it has expired; a no-op outside jwt mode
    pub async fn ensure_fresh_token(&mut self) -> SheetsResult<()> {
        if !self.needs_renewal() {
            return Ok(());
        }

        let authorizer = self.authorizer.clone().ok_or_else(|| {
            SheetsError::AuthorizationFailed("no service account configured for renewal".to_string())
        })?;

        warn!("Bearer token expired, renewing");
        let token = authorizer.authorize().await.map_err(into_authorization_error)?;
        self.set_credential(Some(Credential::Bearer(token)));
        info!("Bearer token renewed");
        Ok(())
    }

    /// Authorization header value for the current credential, if any
    pub fn authorization_header(&self) -> Option<String> {
        self.credential.as_ref().map(Credential::header_value)
    }
}

fn into_authorization_error(e: SheetsError) -> SheetsError {
    match e {
        SheetsError::AuthorizationFailed(_) | SheetsError::InvalidCredentials(_) => e,
        other => SheetsError::AuthorizationFailed(other.to_string()),
    }
}
