//! Queryable HTML documents
//!
//! A thin wrapper over `scraper::Html` exposing the lookups the extractors
//! need: all matches, first match, trimmed text, and the per-text-node
//! fragments of an element.

use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML page
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw markup into a document
    ///
    /// The HTML parser recovers from malformed markup, so the only input that
    /// is rejected is a body without any content.
    ///
    /// # Example
    ///
    /// ```
    /// use ke_ershoufang::crawler::Document;
    /// use scraper::Selector;
    ///
    /// let doc = Document::parse("<span class='total'> 350 </span>").unwrap();
    /// let total = doc.select_one(&Selector::parse("span.total").unwrap()).unwrap();
    /// assert_eq!(Document::text(total), "350");
    /// ```
    pub fn parse(markup: &str) -> Result<Self, ScrapeError> {
        if markup.trim().is_empty() {
            return Err(ScrapeError::Parse {
                url: String::new(),
                message: "empty document".to_string(),
            });
        }

        let html = Html::parse_document(markup);
        if !html.errors.is_empty() {
            tracing::trace!("Recovered from {} markup errors", html.errors.len());
        }

        Ok(Self { html })
    }

    /// Parses markup fetched from `url`, tagging parse errors with the URL
    pub fn parse_from(url: &str, markup: &str) -> Result<Self, ScrapeError> {
        Self::parse(markup).map_err(|e| match e {
            ScrapeError::Parse { message, .. } => ScrapeError::Parse {
                url: url.to_string(),
                message,
            },
            other => other,
        })
    }

    /// All elements matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.html.select(selector).collect()
    }

    /// First element matching `selector`
    pub fn select_one<'a>(&'a self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }

    /// Descendants of `element` matching `selector`
    pub fn select_within<'a>(element: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
        element.select(selector).collect()
    }

    /// All text under `element`, trimmed at both ends
    ///
    /// Text nodes are joined as they appear and only the result is trimmed,
    /// so whitespace between child nodes survives: `<span> 350 <i> 万 </i></span>`
    /// yields `"350  万"`. Use [`Document::stripped_strings`] for per-node
    /// trimming.
    pub fn text(element: ElementRef<'_>) -> String {
        element.text().collect::<String>().trim().to_string()
    }

    /// One trimmed fragment per non-blank text node under `element`
    pub fn stripped_strings(element: ElementRef<'_>) -> Vec<String> {
        element
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
