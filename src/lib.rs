//! Page Analyzer: on-demand site checks
//!
//! This crate registers web addresses and checks them on demand: it fetches
//! the page over HTTP, records the status code, and extracts the H1 heading,
//! title and meta description for display.

pub mod checker;
pub mod config;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Page Analyzer operations
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("Invalid DATABASE_URL '{0}': expected sqlite://<path> or sqlite::memory:")]
    InvalidDatabaseUrl(String),
}

/// Rejections produced by the URL validator
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("invalid URL")]
    Malformed,

    #[error("invalid URL: no host")]
    MissingHost,

    #[error("invalid URL: host must not end with a dot")]
    TrailingDot,

    #[error("invalid URL: top-level domain too short")]
    TopLevelDomainTooShort,
}

/// Result type alias for Page Analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use checker::{CheckOutcome, CheckService, Pipeline};
pub use config::Config;
pub use url::{validate_url, CanonicalUrl};
