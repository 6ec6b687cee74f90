//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Application configuration, loaded once at session start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default page size for the workout feed.
    pub feed_page_size: u32,
    /// Hard cap on requested page sizes.
    pub max_page_size: u32,
    /// Per-request timeout for document store calls.
    pub store_timeout: Duration,
    /// Group every new account is suggested into (optional).
    pub default_group_id: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            feed_page_size: 12,
            max_page_size: 100,
            store_timeout: Duration::from_secs(10),
            default_group_id: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional; missing values fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let feed_page_size = parse_var("FITCREW_FEED_PAGE_SIZE", 12)?;
        let max_page_size = parse_var("FITCREW_MAX_PAGE_SIZE", 100)?;
        let timeout_secs: u64 = parse_var("FITCREW_STORE_TIMEOUT_SECS", 10)?;

        if feed_page_size == 0 || max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive"));
        }

        Ok(Self {
            feed_page_size,
            max_page_size,
            store_timeout: Duration::from_secs(timeout_secs),
            default_group_id: env::var("FITCREW_DEFAULT_GROUP_ID").ok(),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = Config::default();
        assert_eq!(config.feed_page_size, 12);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.store_timeout, Duration::from_secs(10));
    }
}
