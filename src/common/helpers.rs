// Helper functions for XML-safe values and safe logging

/// Escapes a value for embedding in XML text content or attribute values
///
/// `&` goes first so entities introduced by the later substitutions are not
/// escaped twice.
///
/// # Example
/// ```
/// use sheets_feed::common::escape_text;
/// assert_eq!(escape_text(Some("a < b & \"c\"")), "a &lt; b &amp; &quot;c&quot;");
/// assert_eq!(escape_text(None::<&str>), "");
/// ```
pub fn escape_text<T: ToString>(value: Option<T>) -> String {
    match value {
        Some(v) => v
            .to_string()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;"),
        None => String::new(),
    }
}

/// Folds a column name into the tag fragment the feed uses for it
///
/// Whitespace and underscores are stripped and the rest is lowercased, so
/// "My Col_Name" becomes "mycolname".
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
///
/// # Example
/// ```
/// use sheets_feed::common::safe_token_log;
/// assert_eq!(safe_token_log("ya29.a0AfH6SMBexample"), "ya29...mple");
/// ```
pub fn safe_token_log(token: &str) -> String {
    if token.chars().count() > 8 {
        let head: String = token.chars().take(4).collect();
        let tail: String = token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}
