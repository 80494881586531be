use std::collections::HashMap;

use crate::xml::{force_array, XmlValue};

/// Relation name to URL, taken from an entry's `<link>` elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkIndex {
    links: HashMap<String, String>,
}

impl LinkIndex {
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    /// URL to PUT/DELETE against when mutating the entry
    pub fn edit(&self) -> Option<&str> {
        self.get("edit")
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Builds a [`LinkIndex`] from one link element or a list of them
///
/// Later links win when two share a relation. Links missing either `rel` or
/// `href` are skipped.
pub fn extract_links(links: Option<&XmlValue>) -> LinkIndex {
    let mut index = LinkIndex::default();
    for link in force_array(links) {
        if let (Some(rel), Some(href)) = (link.attr("rel"), link.attr("href")) {
            index.links.insert(rel.to_string(), href.to_string());
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    #[test]
    fn test_extract_links_from_list() {
        let entry = xml::parse(
            r#"<entry>
                <link rel="self" href="https://example.com/self"/>
                <link rel="edit" href="https://example.com/edit/1"/>
                <link rel="edit" href="https://example.com/edit/2"/>
            </entry>"#,
        )
        .unwrap();

        let links = extract_links(entry.get("link"));
        assert_eq!(links.len(), 2);
        assert_eq!(links.get("self"), Some("https://example.com/self"));
        assert_eq!(links.edit(), Some("https://example.com/edit/2"));
    }

    #[test]
    fn test_extract_single_link() {
        let entry = xml::parse(r#"<entry><link rel="edit" href="https://example.com/e"/></entry>"#)
            .unwrap();
        assert_eq!(extract_links(entry.get("link")).edit(), Some("https://example.com/e"));
    }

    #[test]
    fn test_extract_links_missing() {
        assert!(extract_links(None).is_empty());

        let entry = xml::parse(r#"<entry><link href="https://example.com/no-rel"/></entry>"#).unwrap();
        assert!(extract_links(entry.get("link")).is_empty());
    }
}
