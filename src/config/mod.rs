//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every setting has a default, so the scraper also runs without a
//! configuration file.
//!
//! # Example
//!
//! ```no_run
//! use ke_ershoufang::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Walking {} list pages", config.site.pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, PacingConfig, RequestConfig, SelectorConfig, SiteConfig,
    PAGE_PLACEHOLDER,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{compile_selector, validate};
