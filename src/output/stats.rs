//! Run statistics
//!
//! Counters collected while the coordinator walks the list pages, plus the
//! end-of-run report printed to the operator.

use chrono::{DateTime, Utc};

/// Counters for a single scraping run
#[derive(Debug, Clone)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// List pages requested
    pub pages_attempted: u64,

    /// List pages that could not be fetched or parsed
    pub pages_failed: u64,

    /// Detail links found across all list pages
    pub links_found: u64,

    /// Detail pages requested
    pub details_attempted: u64,

    /// Detail pages that could not be fetched or parsed
    pub details_failed: u64,

    /// Records extracted (one per successful detail page)
    pub records: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_attempted: 0,
            pages_failed: 0,
            links_found: 0,
            details_attempted: 0,
            details_failed: 0,
            records: 0,
        }
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Share of detail pages that produced a record, as a percentage
    pub fn detail_success_rate(&self) -> f64 {
        if self.details_attempted == 0 {
            return 0.0;
        }
        (self.records as f64 / self.details_attempted as f64) * 100.0
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints run statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStats) {
    println!("=== Scrape Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(duration) = stats.duration_seconds() {
        println!(
            "  Duration: {} seconds ({:.2} minutes)",
            duration,
            duration as f64 / 60.0
        );
    }
    println!();

    println!("List pages:");
    println!("  Attempted: {}", stats.pages_attempted);
    println!("  Failed: {}", stats.pages_failed);
    println!("  Detail links found: {}", stats.links_found);
    println!();

    println!("Detail pages:");
    println!("  Attempted: {}", stats.details_attempted);
    println!("  Failed: {}", stats.details_failed);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} detail pages extracted)",
        stats.detail_success_rate(),
        stats.records,
        stats.details_attempted
    );
}
