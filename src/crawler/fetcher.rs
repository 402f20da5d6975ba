//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with the browser-like header set
//! - GET requests returning page markup
//! - Classifying failures into transport and status errors
//!
//! There is no retry. A failed fetch is reported to the caller, which decides
//! whether to skip the page.

use crate::config::RequestConfig;
use crate::ScrapeError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client sending the configured headers with every request
///
/// # Example
///
/// ```no_run
/// use ke_ershoufang::config::RequestConfig;
/// use ke_ershoufang::crawler::build_http_client;
///
/// let client = build_http_client(&RequestConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RequestConfig) -> Result<Client, ScrapeError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("user_agent", &config.user_agent)?);
    headers.insert(REFERER, header_value("referer", &config.referer)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept_language", &config.accept_language)?,
    );

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ScrapeError> {
    HeaderValue::from_str(value).map_err(|e| {
        crate::ConfigError::Validation(format!("{} is not a valid header value: {}", name, e))
            .into()
    })
}

/// Issues GET requests for list and detail pages
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &RequestConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches a URL and returns the response body
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Connection refused, DNS or TLS failure | `Transport` |
    /// | Timeout | `Transport` |
    /// | Non-2xx status | `HttpStatus` |
    /// | Body could not be read | `Transport` |
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
