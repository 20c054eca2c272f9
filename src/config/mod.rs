//! Configuration module for Page Analyzer
//!
//! Settings come from two places: an optional TOML file for the fetcher,
//! and the mandatory `DATABASE_URL` environment variable for storage.
//!
//! # Example
//!
//! ```no_run
//! use page_analyzer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Some(Path::new("analyzer.toml"))).unwrap();
//! println!("User agent: {}", config.fetcher.user_agent);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DatabaseConfig, DatabaseLocation, FetcherConfig, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_with_database_url, parse_database_url, DATABASE_URL_VAR};
