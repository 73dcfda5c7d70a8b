//! Parsed HTML document

use scraper::Html;

/// An immutable parsed response body
///
/// Built once per fetch and only read afterwards.
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document, tolerating malformed markup
    ///
    /// # Example
    ///
    /// ```
    /// use prefix_census::crawler::Document;
    ///
    /// let document = Document::parse(r#"<div id="thread-1"></div>"#);
    /// let selector = scraper::Selector::parse("#thread-1").unwrap();
    /// assert_eq!(document.html().select(&selector).count(), 1);
    /// ```
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}
