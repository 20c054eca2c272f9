use crate::config::types::{Config, DatabaseConfig, DatabaseLocation};
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Environment variable holding the database connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Loads the configuration from an optional TOML file and the environment
///
/// `DATABASE_URL` must be set; its absence is fatal.
///
/// # Example
///
/// ```no_run
/// use page_analyzer::config::load_config;
///
/// let config = load_config(None).unwrap();
/// println!("Timeout: {}s", config.fetcher.timeout_secs);
/// ```
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    let database_url = std::env::var(DATABASE_URL_VAR).ok();
    load_config_with_database_url(path, database_url.as_deref())
}

/// Same as [`load_config`], with the connection string passed explicitly
pub fn load_config_with_database_url(
    path: Option<&Path>,
    database_url: Option<&str>,
) -> ConfigResult<Config> {
    let mut config = match path {
        Some(path) => parse_config_file(path)?,
        None => Config::default(),
    };

    let database_url = database_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(ConfigError::MissingDatabaseUrl)?;
    config.database = DatabaseConfig {
        location: parse_database_url(database_url)?,
    };

    validate(&config)?;

    Ok(config)
}

/// Reads and parses a TOML configuration file
fn parse_config_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Parses a connection string into a database location
///
/// Accepted forms: `sqlite://<path>` and `sqlite::memory:`
/// (`sqlite://:memory:` is accepted as well).
pub fn parse_database_url(raw: &str) -> ConfigResult<DatabaseLocation> {
    let raw = raw.trim();
    if raw == "sqlite::memory:" {
        return Ok(DatabaseLocation::Memory);
    }

    match raw.strip_prefix("sqlite://") {
        Some(":memory:") => Ok(DatabaseLocation::Memory),
        Some(path) if !path.is_empty() => Ok(DatabaseLocation::File(PathBuf::from(path))),
        _ => Err(ConfigError::InvalidDatabaseUrl(raw.to_string())),
    }
}
