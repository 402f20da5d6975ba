use serde::Deserialize;

/// Placeholder substituted with the page number in the list URL template
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Main configuration structure for the scraper
///
/// Every section falls back to its defaults, so an empty document is a
/// complete configuration targeting the Chengdu second-hand listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub request: RequestConfig,
    pub pacing: PacingConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Which pages to walk
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// List page URL with a `{page}` placeholder
    #[serde(rename = "list-url-template")]
    pub list_url_template: String,

    /// Number of list pages to walk, starting at page 1
    pub pages: u32,
}

impl SiteConfig {
    /// Builds the list page URL for a 1-based page number
    pub fn list_url(&self, page: u32) -> String {
        self.list_url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            list_url_template: "https://cd.ke.com/ershoufang/pg{page}/".to_string(),
            pages: 10,
        }
    }
}

/// Headers and timeout sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub referer: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            referer: "https://cd.ke.com/".to_string(),
            accept_language: "zh-CN,zh;q=0.9".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Randomized delay inserted after each request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Lower bound of the delay (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the delay (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1200,
            max_delay_ms: 2800,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file, replaced on every run
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "chengdu_ke_ershoufang.csv".to_string(),
        }
    }
}

/// CSS selectors locating the scraped values in the site markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Anchors on a list page leading to detail pages
    #[serde(rename = "detail-link")]
    pub detail_link: String,

    #[serde(rename = "total-price")]
    pub total_price: String,

    #[serde(rename = "unit-price")]
    pub unit_price: String,

    /// Container whose presence marks a page carrying a community name
    #[serde(rename = "community-section")]
    pub community_section: String,

    #[serde(rename = "community-name")]
    pub community_name: String,

    /// Container holding the district and sub-area anchors
    #[serde(rename = "area-section")]
    pub area_section: String,

    /// Containers of the label/value attribute lists
    #[serde(rename = "attribute-sections")]
    pub attribute_sections: String,

    #[serde(rename = "attribute-item")]
    pub attribute_item: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            detail_link: "div.clear a.maidian-detail".to_string(),
            total_price: "span.total".to_string(),
            unit_price: "span.unitPriceValue".to_string(),
            community_section: "div.aroundInfo".to_string(),
            community_name: "a.info".to_string(),
            area_section: "div.areaName".to_string(),
            attribute_sections: "div.base, div.transaction".to_string(),
            attribute_item: "li".to_string(),
        }
    }
}
