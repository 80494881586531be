// src/spreadsheet/cell.rs
//! Cell entries of the cells feed

use reqwest::Method;
use tracing::debug;

use super::service::SpreadsheetService;
use crate::common::{escape_text, SheetsError, SheetsResult};
use crate::feed::{extract_links, FeedPayload, FeedResponse, FeedTarget, LinkIndex, ATOM_NS, GS_NS};
use crate::xml::XmlValue;

#[derive(Debug, Clone)]
pub struct CellEntity {
    pub id: String,
    /// 1-based
    pub row: u32,
    /// 1-based
    pub col: u32,
    pub value: String,
    pub numeric_value: Option<String>,
    worksheet_id: String,
    links: LinkIndex,
    spreadsheet: SpreadsheetService,
}

impl CellEntity {
    pub(crate) fn from_entry(spreadsheet: &SpreadsheetService, worksheet_id: &str, entry: &XmlValue) -> Self {
        let entry = entry.as_element();
        let cell = entry.and_then(|e| e.get("gs:cell"));
        let coordinate = |name: &str| {
            cell.and_then(|c| c.attr(name))
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };

        Self {
            id: entry.and_then(|e| e.child_text("id")).unwrap_or_default().to_string(),
            row: coordinate("row"),
            col: coordinate("col"),
            value: cell.and_then(XmlValue::text).unwrap_or_default().to_string(),
            numeric_value: cell.and_then(|c| c.attr("numericValue")).map(str::to_string),
            worksheet_id: worksheet_id.to_string(),
            links: extract_links(entry.and_then(|e| e.get("link"))),
            spreadsheet: spreadsheet.clone(),
        }
    }

    pub fn worksheet_id(&self) -> &str {
        &self.worksheet_id
    }

    pub fn links(&self) -> &LinkIndex {
        &self.links
    }

    /// Full edit entry for the current value
    ///
    /// Built from scratch rather than patched, mirroring the shape the feed
    /// expects for cell edits.
    pub fn edit_xml(&self) -> String {
        let edit_id = format!(
            "{}cells/{}/{}/private/full/R{}C{}",
            self.spreadsheet.client().config().feed_base,
            self.spreadsheet.key(),
            self.worksheet_id,
            self.row,
            self.col
        );

        format!(
            "<entry xmlns='{atom}' xmlns:gs='{gs}'><id>{id}</id>\
             <link rel=\"edit\" type=\"application/atom+xml\" href=\"{id}\"/>\
             <gs:cell row=\"{row}\" col=\"{col}\" inputValue=\"{value}\"/></entry>",
            atom = ATOM_NS,
            gs = GS_NS,
            id = edit_id,
            row = self.row,
            col = self.col,
            value = escape_text(Some(&self.value)),
        )
    }

    pub async fn set_value(&mut self, value: impl Into<String>) -> SheetsResult<()> {
        self.value = value.into();
        self.save().await
    }

    pub async fn save(&mut self) -> SheetsResult<()> {
        let edit = self
            .links
            .edit()
            .ok_or(SheetsError::MissingEditLink("cell"))?
            .to_string();

        debug!(row = self.row, col = self.col, "Saving cell");
        let response = self
            .spreadsheet
            .client()
            .request(FeedTarget::Url(edit), Method::PUT, FeedPayload::Xml(self.edit_xml()))
            .await?;

        if let FeedResponse::Document { root, .. } = response {
            if let Some(cell) = root.get("gs:cell") {
                self.value = cell.text().unwrap_or_default().to_string();
                self.numeric_value = cell.attr("numericValue").map(str::to_string);
            }
            let links = extract_links(root.get("link"));
            if links.edit().is_some() {
                self.links = links;
            }
        }
        Ok(())
    }

    /// Blanks the cell; a cell is a coordinate, not a deletable resource
    pub async fn delete(&mut self) -> SheetsResult<()> {
        self.set_value("").await
    }
}
