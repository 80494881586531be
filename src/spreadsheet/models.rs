use super::worksheet::WorksheetEntity;
use crate::xml::{force_array, XmlElement};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Snapshot of a spreadsheet's worksheets feed, rebuilt on every fetch
#[derive(Debug)]
pub struct SpreadsheetInfo {
    pub id: String,
    pub title: String,
    pub updated: String,
    pub author: Option<Author>,
    pub worksheets: Vec<WorksheetEntity>,
}

impl Author {
    pub(crate) fn from_feed(root: &XmlElement) -> Option<Self> {
        let author = force_array(root.get("author")).into_iter().next()?.as_element()?;
        Some(Self {
            name: author.child_text("name").unwrap_or_default().to_string(),
            email: author.child_text("email").unwrap_or_default().to_string(),
        })
    }
}
