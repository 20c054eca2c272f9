use serde::Deserialize;
use std::path::PathBuf;

/// User agent sent with every check
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; Page Analyzer Bot)";

/// Seconds before an outbound fetch is abandoned
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for Page Analyzer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Filled from `DATABASE_URL`, never from the file
    #[serde(skip)]
    pub database: DatabaseConfig,
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub location: DatabaseLocation,
}

/// Where the SQLite database lives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A database file on disk
    File(PathBuf),
    /// A private in-memory database
    #[default]
    Memory,
}
