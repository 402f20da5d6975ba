//! Scrape coordinator - main orchestration logic
//!
//! This module walks list pages 1..=N in order. For each list page it fetches
//! the page, extracts the detail links and then fetches and extracts every
//! detail page, pacing after each request. Failures are isolated to the page
//! or link that caused them. Once every page has been visited, the collected
//! records are written to the CSV file in one go.

use crate::config::Config;
use crate::crawler::detail_page::DetailPageExtractor;
use crate::crawler::document::Document;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::list_page::ListPageExtractor;
use crate::crawler::pacer::Pacer;
use crate::output::{write_records, RunStats};
use crate::record::Record;
use crate::ScrapeError;
use std::path::{Path, PathBuf};

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Data rows written to the output file
    pub records_written: usize,

    /// Absolute path of the output file
    pub output_path: PathBuf,

    pub stats: RunStats,
}

/// Main scraper coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    pacer: Pacer,
    list_extractor: ListPageExtractor,
    detail_extractor: DetailPageExtractor,
    records: Vec<Record>,
    stats: RunStats,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and compiles the page selectors.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - A selector or request header is invalid
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let fetcher = Fetcher::new(&config.request)?;
        let pacer = Pacer::new(&config.pacing);
        let list_extractor = ListPageExtractor::new(&config.selectors)?;
        let detail_extractor = DetailPageExtractor::new(&config.selectors)?;

        Ok(Self {
            config,
            fetcher,
            pacer,
            list_extractor,
            detail_extractor,
            records: Vec::new(),
            stats: RunStats::new(),
        })
    }

    /// Replaces the pacer, e.g. with [`Pacer::disabled`] in tests
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Records collected so far, in extraction order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Runs the whole scrape and writes the output file
    ///
    /// Only a failure to write the output file is returned as an error; list
    /// and detail page failures are logged and skipped.
    pub async fn run(&mut self) -> Result<RunSummary, ScrapeError> {
        let pages = self.config.site.pages;
        tracing::info!("Scraping the first {} list pages", pages);

        // Reset state from any previous run
        self.records.clear();
        self.stats = RunStats::new();

        // Walk the list pages in order
        for page in 1..=pages {
            self.scrape_list_page(page).await;
        }

        // Write everything collected in one go
        let output_path = PathBuf::from(&self.config.output.csv_path);
        let records_written = write_records(&self.records, &output_path)?;
        self.stats.finish();

        let output_path = resolve_path(&output_path);
        tracing::info!(
            "Wrote {} records to {}",
            records_written,
            output_path.display()
        );

        Ok(RunSummary {
            records_written,
            output_path,
            stats: self.stats.clone(),
        })
    }

    /// Scrapes one list page and all detail pages it links to
    ///
    /// Paces after every detail attempt, once more at the end of the batch,
    /// and once after a failed list fetch.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based list page number
    async fn scrape_list_page(&mut self, page: u32) {
        let list_url = self.config.site.list_url(page);
        tracing::info!("[list] page {} -> {}", page, list_url);
        self.stats.pages_attempted += 1;

        // Fetch and parse the list page
        let links = match self.fetch_links(&list_url).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("List page {} failed ({}): {}", page, failure_kind(&e), e);
                self.stats.pages_failed += 1;
                self.pacer.pace().await;
                return;
            }
        };

        tracing::info!("  found {} listings", links.len());
        self.stats.links_found += links.len() as u64;

        // Visit each detail page
        let total = links.len();
        for (idx, link) in links.iter().enumerate() {
            tracing::info!("    ({}/{}) detail -> {}", idx + 1, total, link);
            self.stats.details_attempted += 1;

            match self.scrape_detail(link).await {
                Ok(record) => {
                    tracing::debug!("Extracted {} fields from {}", record.filled_count(), link);
                    self.records.push(record);
                    self.stats.records += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Detail page {} failed ({}): {}",
                        link,
                        failure_kind(&e),
                        e
                    );
                    self.stats.details_failed += 1;
                }
            }

            self.pacer.pace().await;
        }

        self.pacer.pace().await;
    }

    async fn fetch_links(&self, url: &str) -> Result<Vec<String>, ScrapeError> {
        let markup = self.fetcher.fetch(url).await?;
        let document = Document::parse_from(url, &markup)?;
        Ok(self.list_extractor.extract_links(&document))
    }

    async fn scrape_detail(&self, url: &str) -> Result<Record, ScrapeError> {
        let markup = self.fetcher.fetch(url).await?;
        let document = Document::parse_from(url, &markup)?;
        Ok(self.detail_extractor.extract_record(&document))
    }
}

/// Short label for a page failure in log lines
fn failure_kind(error: &ScrapeError) -> &'static str {
    if error.is_transport() {
        "transport"
    } else if error.is_parse() {
        "parse"
    } else {
        "other"
    }
}

/// Returns the absolute form of `path`, or `path` itself if it cannot be resolved
fn resolve_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Runs a complete scrape with the given configuration
///
/// # Example
///
/// ```no_run
/// use ke_ershoufang::config::Config;
/// use ke_ershoufang::crawler::run_scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_scrape(Config::default()).await?;
/// println!("{} records", summary.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config) -> Result<RunSummary, ScrapeError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
