//! Detail link extraction from list pages

use crate::config::{compile_selector, SelectorConfig};
use crate::crawler::document::Document;
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;

/// Extracts detail page links from a parsed list page
pub struct ListPageExtractor {
    detail_link: Selector,
}

impl ListPageExtractor {
    pub fn new(selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detail_link: compile_selector(&selectors.detail_link)?,
        })
    }

    /// Returns the detail links of a list page
    ///
    /// # Rules
    ///
    /// - Anchors without an `href` (or with a blank one) are skipped
    /// - An href without a URI scheme gets `https:` prepended, so
    ///   protocol-relative links such as `//cd.ke.com/...` become absolute
    /// - Duplicates are dropped, keeping the position of the first occurrence
    ///
    /// An empty result is not an error: the page simply listed nothing.
    pub fn extract_links(&self, document: &Document) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in document.select(&self.detail_link) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let href = href.trim();
            if href.is_empty() {
                continue;
            }

            let link = absolutize(href);
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }

        links
    }
}

/// Prefixes `https:` to hrefs that do not start with a URI scheme
fn absolutize(href: &str) -> String {
    if has_scheme(href) {
        href.to_string()
    } else {
        format!("https:{}", href)
    }
}

/// Checks for a leading `scheme:` as defined by RFC 3986
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
        _ => false,
    }
}
