//! Output module for writing scrape results
//!
//! This module handles:
//! - Serializing records to the CSV output file
//! - Recording run statistics and printing the final report

mod csv_writer;
pub mod stats;

pub use csv_writer::{write_records, write_records_to, UTF8_BOM};
pub use stats::{print_statistics, RunStats};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
