// src/feed/entries.rs
//! Raw entry XML handling
//!
//! The edit endpoint only accepts payloads shaped exactly like the entries it
//! served, so updates are built by patching the original entry text rather
//! than serializing a tree.

use regex::{NoExpand, Regex};
use std::sync::OnceLock;

use crate::common::{escape_text, SheetsError, SheetsResult};

/// Every `<entry>...</entry>` block of a feed body, in document order
///
/// Entry content containing a literal `</entry>` would cut a block short;
/// the feed never produces that.
pub fn extract_raw_entries(body: &str) -> Vec<&str> {
    static ENTRY_RE: OnceLock<Regex> = OnceLock::new();
    let entry_re = ENTRY_RE
        .get_or_init(|| Regex::new(r"<entry[^>]*>[\s\S]*?</entry>").expect("valid entry regex"));
    entry_re.find_iter(body).map(|m| m.as_str()).collect()
}

/// Adds namespace declarations to the first `<entry>` start tag
///
/// Declarations the tag already carries are left alone.
pub fn inject_namespaces(xml: &str, declarations: &[(&str, &str)]) -> String {
    static START_TAG_RE: OnceLock<Regex> = OnceLock::new();
    let start_tag_re = START_TAG_RE
        .get_or_init(|| Regex::new(r"<entry(\s[^>]*)?>").expect("valid start tag regex"));

    let Some(caps) = start_tag_re.captures(xml) else {
        return xml.to_string();
    };
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let existing = caps.get(1).map_or("", |m| m.as_str());

    let mut tag = String::from("<entry");
    for (name, uri) in declarations {
        if !existing.contains(&format!("{}=", name)) {
            tag.push_str(&format!(" {}='{}'", name, uri));
        }
    }
    tag.push_str(existing);
    tag.push('>');

    let mut patched = String::with_capacity(xml.len() + tag.len());
    patched.push_str(&xml[..whole.start]);
    patched.push_str(&tag);
    patched.push_str(&xml[whole.end..]);
    patched
}

/// Replaces the content of the first `<tag>...</tag>` with the escaped value
///
/// Each tag occurs at most once per entry, so only the first match is
/// touched. A tag that is absent leaves the XML unchanged.
pub fn replace_element_text(xml: &str, tag: &str, value: &str) -> SheetsResult<String> {
    let escaped_tag = regex::escape(tag);
    let pattern = format!(r"<{0}>[\s\S]*?</{0}>", escaped_tag);
    let re = Regex::new(&pattern).map_err(|e| SheetsError::Parse(e.to_string()))?;

    let replacement = format!("<{0}>{1}</{0}>", tag, escape_text(Some(value)));
    Ok(re.replacen(xml, 1, NoExpand(&replacement)).into_owned())
}

/// Replaces the Atom `<title>` element, which carries a `type` attribute
pub fn replace_title(xml: &str, title: &str) -> String {
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();
    let title_re = TITLE_RE
        .get_or_init(|| Regex::new(r"<title[^>/]*>[\s\S]*?</title>").expect("valid title regex"));

    let replacement = format!("<title type='text'>{}</title>", escape_text(Some(title)));
    title_re
        .replacen(xml, 1, NoExpand(&replacement))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "<feed><id>x</id>\
        <entry><id>1</id><gsx:col1>a</gsx:col1></entry>\
        <entry gd:etag='&quot;abc&quot;'><id>2</id><gsx:col1>c</gsx:col1></entry>\
        </feed>";

    #[test]
    fn test_extract_raw_entries_in_order() {
        let entries = extract_raw_entries(FEED);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "<entry><id>1</id><gsx:col1>a</gsx:col1></entry>");
        assert!(entries[1].starts_with("<entry gd:etag="));
        assert!(entries[1].ends_with("</entry>"));
    }

    #[test]
    fn test_inject_namespaces() {
        let patched = inject_namespaces(
            "<entry><id>1</id></entry>",
            &[("xmlns", "http://www.w3.org/2005/Atom"), ("xmlns:gsx", "urn:gsx")],
        );
        assert_eq!(
            patched,
            "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:gsx='urn:gsx'><id>1</id></entry>"
        );
    }

    #[test]
    fn test_inject_namespaces_keeps_existing() {
        let patched = inject_namespaces(
            "<entry xmlns='urn:atom' gd:etag='x'><id>1</id></entry>",
            &[("xmlns", "urn:other"), ("xmlns:gs", "urn:gs")],
        );
        assert_eq!(patched, "<entry xmlns:gs='urn:gs' xmlns='urn:atom' gd:etag='x'><id>1</id></entry>");
    }

    #[test]
    fn test_replace_element_text_first_match_only() {
        let xml = "<entry><gsx:a>1</gsx:a><gsx:ab>2</gsx:ab><gsx:a>3</gsx:a></entry>";
        let patched = replace_element_text(xml, "gsx:a", "x & y").unwrap();
        assert_eq!(
            patched,
            "<entry><gsx:a>x &amp; y</gsx:a><gsx:ab>2</gsx:ab><gsx:a>3</gsx:a></entry>"
        );
    }

    #[test]
    fn test_replace_element_text_literal_dollar() {
        let patched = replace_element_text("<entry><gsx:price>1</gsx:price></entry>", "gsx:price", "$1.00")
            .unwrap();
        assert_eq!(patched, "<entry><gsx:price>$1.00</gsx:price></entry>");
    }

    #[test]
    fn test_replace_element_text_absent_tag() {
        let xml = "<entry><gsx:a>1</gsx:a></entry>";
        assert_eq!(replace_element_text(xml, "gsx:missing", "x").unwrap(), xml);
    }

    #[test]
    fn test_replace_title() {
        let xml = "<entry><title type='text'>Sheet1</title><gs:rowCount>10</gs:rowCount></entry>";
        assert_eq!(
            replace_title(xml, "Budget <2024>"),
            "<entry><title type='text'>Budget &lt;2024&gt;</title><gs:rowCount>10</gs:rowCount></entry>"
        );
    }
}
