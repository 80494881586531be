// src/spreadsheet/row.rs
//! Row entries of the list feed

use reqwest::Method;
use tracing::{debug, info};

use super::service::SpreadsheetService;
use crate::common::{normalize_column_name, SheetsError, SheetsResult};
use crate::feed::entries::{extract_raw_entries, inject_namespaces, replace_element_text};
use crate::feed::{extract_links, FeedPayload, FeedResponse, FeedTarget, LinkIndex, ATOM_NS, GSX_NS};
use crate::xml::{XmlElement, XmlValue};

/// Prefix of the extended-namespace elements that hold column values
const COLUMN_PREFIX: &str = "gsx:";

/// Columns starting with this are never written back on save
const INTERNAL_PREFIX: char = '_';

#[derive(Debug, Clone)]
pub struct RowEntity {
    pub id: String,
    pub updated: String,
    pub title: String,
    pub content: String,
    fields: Vec<(String, String)>,
    links: LinkIndex,
    raw_xml: String,
    spreadsheet: SpreadsheetService,
}

impl RowEntity {
    pub(crate) fn from_entry(spreadsheet: &SpreadsheetService, entry: &XmlValue, raw_xml: &str) -> Self {
        let mut row = Self {
            id: String::new(),
            updated: String::new(),
            title: String::new(),
            content: String::new(),
            fields: Vec::new(),
            links: LinkIndex::default(),
            raw_xml: String::new(),
            spreadsheet: spreadsheet.clone(),
        };
        let empty = XmlElement::default();
        row.apply(entry.as_element().unwrap_or(&empty), raw_xml);
        row
    }

    fn apply(&mut self, entry: &XmlElement, raw_xml: &str) {
        self.id = entry.child_text("id").unwrap_or_default().to_string();
        self.updated = entry.child_text("updated").unwrap_or_default().to_string();
        self.title = entry.child_text("title").unwrap_or_default().to_string();
        self.content = entry.child_text("content").unwrap_or_default().to_string();
        self.links = extract_links(entry.get("link"));
        self.raw_xml = raw_xml.to_string();

        self.fields = entry
            .children
            .iter()
            .filter_map(|(key, value)| {
                let column = key.strip_prefix(COLUMN_PREFIX)?;
                if column.is_empty() {
                    return None;
                }
                Some((column.to_string(), value.text().unwrap_or_default().to_string()))
            })
            .collect();
    }

    /// Column values in document order, keyed by normalized column name
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.position(column).map(|i| self.fields[i].1.as_str())
    }

    /// Index of a column; the key as the feed spelled it wins over its
    /// normalized form, so `_`-prefixed columns stay reachable
    fn position(&self, column: &str) -> Option<usize> {
        if let Some(i) = self.fields.iter().position(|(key, _)| key == column) {
            return Some(i);
        }
        let normalized = normalize_column_name(column);
        self.fields.iter().position(|(key, _)| *key == normalized)
    }

    /// Changes a value locally; call [`RowEntity::save`] to submit it
    ///
    /// A column the entry never had cannot be patched in and is ignored on
    /// save.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(column) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((normalize_column_name(column), value)),
        }
    }

    pub fn links(&self) -> &LinkIndex {
        &self.links
    }

    pub fn raw_xml(&self) -> &str {
        &self.raw_xml
    }

    /// Source entry with every current column value written in
    pub fn patched_xml(&self) -> SheetsResult<String> {
        let mut xml = inject_namespaces(&self.raw_xml, &[("xmlns", ATOM_NS), ("xmlns:gsx", GSX_NS)]);
        for (column, value) in &self.fields {
            if column.starts_with(INTERNAL_PREFIX) {
                continue;
            }
            let tag = format!("{}{}", COLUMN_PREFIX, normalize_column_name(column));
            xml = replace_element_text(&xml, &tag, value)?;
        }
        Ok(xml)
    }

    pub async fn save(&mut self) -> SheetsResult<()> {
        let edit = self
            .links
            .edit()
            .ok_or(SheetsError::MissingEditLink("row"))?
            .to_string();
        let xml = self.patched_xml()?;

        debug!(row_id = %self.id, "Saving row");
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

    /// Removes the row from the sheet; the entity is consumed
    pub async fn delete(self) -> SheetsResult<()> {
        let edit = self.links.edit().ok_or(SheetsError::MissingEditLink("row"))?;

        info!(row_id = %self.id, "Deleting row");
        self.spreadsheet
            .client()
            .request(FeedTarget::Url(edit.to_string()), Method::DELETE, FeedPayload::None)
            .await?;
        Ok(())
    }
}
