// src/spreadsheet/worksheet.rs
//! Worksheet entries of the worksheets feed

use reqwest::Method;
use tracing::info;

use super::cell::CellEntity;
use super::options::{CellQuery, RowQuery};
use super::row::RowEntity;
use super::service::SpreadsheetService;
use crate::common::{SheetsError, SheetsResult};
use crate::feed::entries::{extract_raw_entries, inject_namespaces, replace_element_text, replace_title};
use crate::feed::{extract_links, FeedPayload, FeedResponse, FeedTarget, LinkIndex, ATOM_NS, GS_NS};
use crate::xml::{XmlElement, XmlValue};

#[derive(Debug, Clone)]
pub struct WorksheetEntity {
    /// Last path segment of the entry id, e.g. `od6`
    pub id: String,
    pub title: String,
    pub row_count: u32,
    pub col_count: u32,
    links: LinkIndex,
    raw_xml: String,
    spreadsheet: SpreadsheetService,
}

impl WorksheetEntity {
    pub(crate) fn from_entry(spreadsheet: &SpreadsheetService, entry: &XmlValue, raw_xml: &str) -> Self {
        let mut worksheet = Self {
            id: String::new(),
            title: String::new(),
            row_count: 0,
            col_count: 0,
            links: LinkIndex::default(),
            raw_xml: String::new(),
            spreadsheet: spreadsheet.clone(),
        };
        let empty = XmlElement::default();
        worksheet.apply(entry.as_element().unwrap_or(&empty), raw_xml);
        worksheet
    }

    fn apply(&mut self, entry: &XmlElement, raw_xml: &str) {
        let full_id = entry.child_text("id").unwrap_or_default();
        self.id = full_id.rsplit('/').next().unwrap_or_default().to_string();
        self.title = entry.child_text("title").unwrap_or_default().to_string();
        self.row_count = parse_count(entry.child_text("gs:rowCount"));
        self.col_count = parse_count(entry.child_text("gs:colCount"));
        self.links = extract_links(entry.get("link"));
        self.raw_xml = raw_xml.to_string();
    }

    pub fn links(&self) -> &LinkIndex {
        &self.links
    }

    pub fn raw_xml(&self) -> &str {
        &self.raw_xml
    }

    /// Source entry with the current title and dimensions written in
    pub fn patched_xml(&self) -> SheetsResult<String> {
        let xml = inject_namespaces(&self.raw_xml, &[("xmlns", ATOM_NS), ("xmlns:gs", GS_NS)]);
        let xml = replace_title(&xml, &self.title);
        let xml = replace_element_text(&xml, "gs:rowCount", &self.row_count.to_string())?;
        replace_element_text(&xml, "gs:colCount", &self.col_count.to_string())
    }

    /// Submits title/size changes and refreshes from the server's copy
    pub async fn update(&mut self) -> SheetsResult<()> {
        let edit = self
            .links
            .edit()
            .ok_or(SheetsError::MissingEditLink("worksheet"))?
            .to_string();
        let xml = self.patched_xml()?;

        info!(worksheet_id = %self.id, title = %self.title, "Updating worksheet");
        let response = self
            .spreadsheet
            .client()
            .request(FeedTarget::Url(edit), Method::PUT, FeedPayload::Xml(xml))
            .await?;

        if let FeedResponse::Document { root, body } = response {
            let raw = extract_raw_entries(&body).first().map(|s| s.to_string());
            self.apply(&root, raw.as_deref().unwrap_or(&body));
        }
        Ok(())
    }

    /// Removes the worksheet; the entity is consumed
    pub async fn delete(self) -> SheetsResult<()> {
        let edit = self
            .links
            .edit()
            .ok_or(SheetsError::MissingEditLink("worksheet"))?;

        info!(worksheet_id = %self.id, "Deleting worksheet");
        self.spreadsheet
            .client()
            .request(FeedTarget::Url(edit.to_string()), Method::DELETE, FeedPayload::None)
            .await?;
        Ok(())
    }

    pub async fn get_rows(&self, options: &RowQuery) -> SheetsResult<Vec<RowEntity>> {
        self.spreadsheet.get_rows(&self.id, options).await
    }

    pub async fn get_cells(&self, options: &CellQuery) -> SheetsResult<Vec<CellEntity>> {
        self.spreadsheet.get_cells(&self.id, options).await
    }

    pub async fn add_row<I, K, V>(&self, fields: I) -> SheetsResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        self.spreadsheet.add_row(&self.id, fields).await
    }
}

fn parse_count(value: Option<&str>) -> u32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
