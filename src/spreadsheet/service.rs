// src/spreadsheet/service.rs
//! Top-level handle on one spreadsheet

use reqwest::{Client, Method};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::cell::CellEntity;
use super::models::{Author, SpreadsheetInfo};
use super::options::{
    CellQuery, NewWorksheet, RowQuery, DEFAULT_NEW_WORKSHEET_COLUMNS, DEFAULT_NEW_WORKSHEET_ROWS,
    DEFAULT_NEW_WORKSHEET_TITLE,
};
use super::row::RowEntity;
use super::worksheet::WorksheetEntity;
use crate::auth::{AuthSession, ServiceAccountCredential, TokenAuthorizer};
use crate::common::{escape_text, normalize_column_name, SheetsConfig, SheetsError, SheetsResult};
use crate::feed::entries::extract_raw_entries;
use crate::feed::{
    FeedClient, FeedPayload, FeedTarget, HttpTransport, ReqwestTransport, ATOM_NS, GSX_NS, GS_NS,
};
use crate::xml::force_array;

/// Field names that never become row columns when adding a row
const RESERVED_ROW_KEYS: [&str; 4] = ["id", "title", "content", "links"];

struct SpreadsheetInner {
    key: String,
    client: FeedClient,
    new_sheet_count: AtomicU32,
}

/// One spreadsheet, addressed by its key
///
/// Cheap to clone; clones share the same auth session. Entities fetched
/// through it keep a clone so they can submit their own edits.
#[derive(Clone)]
pub struct SpreadsheetService {
    inner: Arc<SpreadsheetInner>,
}

impl std::fmt::Debug for SpreadsheetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadsheetService")
            .field("key", &self.inner.key)
            .finish()
    }
}

impl SpreadsheetService {
    /// Client talking to Google over `reqwest`
    pub fn new(key: impl Into<String>, auth_token: Option<String>, config: SheetsConfig) -> SheetsResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(Client::new()));
        Self::build(key.into(), auth_token, config, transport)
    }

    /// Client over a caller-supplied transport
    pub fn with_transport(
        key: impl Into<String>,
        auth_token: Option<String>,
        config: SheetsConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> SheetsResult<Self> {
        Self::build(key.into(), auth_token, config, transport)
    }

    fn build(
        key: String,
        auth_token: Option<String>,
        config: SheetsConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> SheetsResult<Self> {
        if key.trim().is_empty() {
            return Err(SheetsError::MissingSpreadsheetKey);
        }

        let mut session = AuthSession::new(&config);
        if let Some(token) = auth_token {
            session.set_token(token);
        }

        Ok(Self {
            inner: Arc::new(SpreadsheetInner {
                key,
                client: FeedClient::new(config, transport, session),
                new_sheet_count: AtomicU32::new(1),
            }),
        })
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn client(&self) -> &FeedClient {
        &self.inner.client
    }

    pub async fn set_auth_token(&self, token: impl Into<String>) {
        self.inner.client.set_token(token).await;
    }

    pub async fn use_service_account_auth(&self, credential: ServiceAccountCredential) -> SheetsResult<()> {
        self.inner.client.use_service_account(credential).await
    }

    pub async fn use_authorizer(&self, authorizer: Arc<dyn TokenAuthorizer>) -> SheetsResult<()> {
        self.inner.client.use_authorizer(authorizer).await
    }

    /// Username/password login no longer exists upstream; always fails
    pub async fn set_auth(&self, _username: &str, _password: &str) -> SheetsResult<()> {
        Err(SheetsError::LegacyLoginUnsupported)
    }

    pub async fn get_info(&self) -> SheetsResult<SpreadsheetInfo> {
        let (root, body) = self
            .inner
            .client
            .request(
                FeedTarget::feed(["worksheets", self.key()]),
                Method::GET,
                FeedPayload::None,
            )
            .await?
            .into_document("getInfo")?;

        // entities keep their source text for later patch-based updates
        let raw_entries = extract_raw_entries(&body);
        let worksheets = force_array(root.get("entry"))
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                WorksheetEntity::from_entry(self, entry, raw_entries.get(i).copied().unwrap_or_default())
            })
            .collect::<Vec<_>>();

        debug!(key = %self.key(), worksheets = worksheets.len(), "Fetched spreadsheet info");

        Ok(SpreadsheetInfo {
            id: root.child_text("id").unwrap_or_default().to_string(),
            title: root.child_text("title").unwrap_or_default().to_string(),
            updated: root.child_text("updated").unwrap_or_default().to_string(),
            author: Author::from_feed(&root),
            worksheets,
        })
    }

    pub async fn add_worksheet(&self, options: NewWorksheet) -> SheetsResult<()> {
        let title = options.title.unwrap_or_else(|| {
            let n = self.inner.new_sheet_count.fetch_add(1, Ordering::SeqCst);
            format!("{}{}", DEFAULT_NEW_WORKSHEET_TITLE, n)
        });
        let rows = options.row_count.unwrap_or(DEFAULT_NEW_WORKSHEET_ROWS);
        let cols = options.col_count.unwrap_or(DEFAULT_NEW_WORKSHEET_COLUMNS);

        let xml = format!(
            "<entry xmlns=\"{}\" xmlns:gs=\"{}\"><title>{}</title><gs:rowCount>{}</gs:rowCount><gs:colCount>{}</gs:colCount></entry>",
            ATOM_NS,
            GS_NS,
            escape_text(Some(&title)),
            rows,
            cols
        );

        info!(title = %title, rows, cols, "Adding worksheet");
        self.inner
            .client
            .request(
                FeedTarget::feed(["worksheets", self.key()]),
                Method::POST,
                FeedPayload::Xml(xml),
            )
            .await?;
        Ok(())
    }

    /// Rows of a worksheet in document order; the header row is not a row
    pub async fn get_rows(&self, worksheet_id: &str, options: &RowQuery) -> SheetsResult<Vec<RowEntity>> {
        let (root, body) = self
            .inner
            .client
            .request(
                FeedTarget::feed(["list", self.key(), worksheet_id]),
                Method::GET,
                FeedPayload::Query(options.to_params()),
            )
            .await?
            .into_document("getRows")?;

        let raw_entries = extract_raw_entries(&body);
        let rows = force_array(root.get("entry"))
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RowEntity::from_entry(self, entry, raw_entries.get(i).copied().unwrap_or_default()))
            .collect::<Vec<_>>();

        debug!(worksheet_id = %worksheet_id, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// Appends a row; keys are column names, normalized the way the feed
    /// names its column elements
    pub async fn add_row<I, K, V>(&self, worksheet_id: &str, fields: I) -> SheetsResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let xml = build_row_xml(fields);
        self.inner
            .client
            .request(
                FeedTarget::feed(["list", self.key(), worksheet_id]),
                Method::POST,
                FeedPayload::Xml(xml),
            )
            .await?;
        Ok(())
    }

    pub async fn get_cells(&self, worksheet_id: &str, options: &CellQuery) -> SheetsResult<Vec<CellEntity>> {
        let (root, _) = self
            .inner
            .client
            .request(
                FeedTarget::feed(["cells", self.key(), worksheet_id]),
                Method::GET,
                FeedPayload::Query(options.to_params()),
            )
            .await?
            .into_document("getCells")?;

        let cells = force_array(root.get("entry"))
            .into_iter()
            .map(|entry| CellEntity::from_entry(self, worksheet_id, entry))
            .collect::<Vec<_>>();

        debug!(worksheet_id = %worksheet_id, cells = cells.len(), "Fetched cells");
        Ok(cells)
    }
}

fn build_row_xml<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToString,
{
    let mut xml = format!("<entry xmlns=\"{}\" xmlns:gsx=\"{}\">\n", ATOM_NS, GSX_NS);
    for (key, value) in fields {
        let key = key.as_ref();
        if RESERVED_ROW_KEYS.contains(&key) {
            continue;
        }
        let tag = normalize_column_name(key);
        xml.push_str(&format!(
            "<gsx:{0}>{1}</gsx:{0}>\n",
            tag,
            escape_text(Some(value.to_string()))
        ));
    }
    xml.push_str("</entry>");
    xml
}
