// src/feed/client.rs
//! Request orchestration for the spreadsheet feeds

use reqwest::{Method, StatusCode};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::auth::models::ServiceAccountCredential;
use crate::auth::{AuthMode, AuthSession, TokenAuthorizer};
use crate::common::{SheetsConfig, SheetsError, SheetsResult};
use crate::xml::{self, XmlElement};

pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// Where a request goes
#[derive(Debug, Clone, PartialEq)]
pub enum FeedTarget {
    /// Literal URL, typically an entry's edit link
    Url(String),
    /// Canonical feed path; visibility and projection are appended
    Feed(Vec<String>),
}

impl FeedTarget {
    pub fn feed<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FeedTarget::Feed(segments.into_iter().map(Into::into).collect())
    }
}

/// What goes with a request: query parameters for GET, XML for POST/PUT
#[derive(Debug, Clone, PartialEq)]
pub enum FeedPayload {
    None,
    Query(Vec<(String, String)>),
    Xml(String),
}

/// Outcome of a successful request
#[derive(Debug, Clone)]
pub enum FeedResponse {
    /// Parsed body alongside the raw text it came from
    Document { root: XmlElement, body: String },
    /// Success with an empty body, as DELETE returns
    NoContent,
}

impl FeedResponse {
    /// Parsed document, or the "no response" failure for `operation`
    pub fn into_document(self, operation: &'static str) -> SheetsResult<(XmlElement, String)> {
        match self {
            FeedResponse::Document { root, body } => Ok((root, body)),
            FeedResponse::NoContent => Err(SheetsError::EmptyResponse(operation)),
        }
    }
}

pub struct FeedClient {
    transport: Arc<dyn HttpTransport>,
    session: RwLock<AuthSession>,
    config: SheetsConfig,
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("feed_base", &self.config.feed_base)
            .finish()
    }
}

impl FeedClient {
    /// Feed traffic and the service account token exchange share `transport`
    pub fn new(config: SheetsConfig, transport: Arc<dyn HttpTransport>, session: AuthSession) -> Self {
        Self {
            transport,
            session: RwLock::new(session),
            config,
        }
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        self.session.write().await.set_token(token);
    }

    pub async fn use_service_account(&self, credential: ServiceAccountCredential) -> SheetsResult<()> {
        self.session
            .write()
            .await
            .authenticate_as_service_account(credential, self.transport.clone(), &self.config.token_url)
            .await
    }

    pub async fn use_authorizer(&self, authorizer: Arc<dyn TokenAuthorizer>) -> SheetsResult<()> {
        self.session.write().await.authenticate(authorizer).await
    }

    /// `<feed base><segments>/<visibility>/<projection>`
    pub fn feed_url(&self, segments: &[String], session: &AuthSession) -> String {
        let mut parts: Vec<&str> = segments.iter().map(String::as_str).collect();
        parts.push(session.visibility().as_str());
        parts.push(session.projection().as_str());
        format!("{}{}", self.config.feed_base, parts.join("/"))
    }

    /// Sends one authenticated request and interprets the response
    pub async fn request(
        &self,
        target: FeedTarget,
        method: Method,
        payload: FeedPayload,
    ) -> SheetsResult<FeedResponse> {
        // Renewal has to finish before headers are built
        let needs_renewal = self.session.read().await.needs_renewal();
        if needs_renewal {
            self.session.write().await.ensure_fresh_token().await?;
        }

        let (mut url, authorization) = {
            let session = self.session.read().await;
            let url = match &target {
                FeedTarget::Url(url) => url.clone(),
                FeedTarget::Feed(segments) => self.feed_url(segments, &session),
            };
            (url, session.authorization_header())
        };

        let mut headers = Vec::new();
        if let Some(value) = authorization {
            headers.push(("Authorization".to_string(), value));
        }

        let sends_body = method == Method::POST || method == Method::PUT;
        if sends_body {
            headers.push(("Content-Type".to_string(), ATOM_CONTENT_TYPE.to_string()));
        }

        let mut body = None;
        match payload {
            FeedPayload::Query(params) if method == Method::GET && !params.is_empty() => {
                let separator = if url.contains('?') { '&' } else { '?' };
                url.push(separator);
                url.push_str(&encode_query(&params));
            }
            FeedPayload::Xml(xml) if sends_body => body = Some(xml),
            _ => {}
        }

        debug!(method = %method, url = %url, "Sending feed request");

        let response = self
            .transport
            .send(HttpRequest {
                method: method.clone(),
                url: url.clone(),
                headers,
                body,
            })
            .await?;

        interpret_response(response, &method, &url)
    }

    pub async fn mode(&self) -> AuthMode {
        self.session.read().await.mode()
    }
}

fn interpret_response(response: HttpResponse, method: &Method, url: &str) -> SheetsResult<FeedResponse> {
    let status = response.status;
    debug!(status = %status, method = %method, url = %url, "Received feed response");

    if status == StatusCode::UNAUTHORIZED {
        warn!(url = %url, "Feed rejected the authorization");
        return Err(SheetsError::InvalidAuthorization);
    }

    if status.as_u16() >= 400 {
        warn!(status = %status, url = %url, "Feed request failed");
        return Err(SheetsError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: response.body,
        });
    }

    // Private sheets answer unauthenticated requests with an HTML login page
    let is_html = response
        .content_type
        .as_deref()
        .map_or(false, |ct| ct.contains("text/html"));
    if status == StatusCode::OK && is_html {
        return Err(SheetsError::PrivateSheet);
    }

    if response.body.is_empty() {
        return Ok(FeedResponse::NoContent);
    }

    let root = xml::parse(&response.body)?;
    Ok(FeedResponse::Document {
        root,
        body: response.body,
    })
}

/// `key=value&...` with both sides percent-encoded
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
