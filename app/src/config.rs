//! Application configuration.
//!
//! Built with `AppConfig::new()` and `with_*` builders, or read from the
//! environment with [`AppConfig::from_env`]:
//!
//! | variable | field | default |
//! |---|---|---|
//! | `ECOLESSON_API_URL` | `api_base_url` | `http://localhost:5030/api/v1` |
//! | `ECOLESSON_PAGE_SIZE` | `page_size` | `20` |
//! | `ECOLESSON_CATALOG_DELAY_MS` | `catalog_delay` | `500` |
//! | `ECOLESSON_FIREBASE_API_KEY` | `firebase` | unset (in-memory provider) |

use ecolesson_auth::FirebaseConfig;
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the course REST API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5030/api/v1";

/// Environment variable names.
pub mod vars {
    /// Course API base URL.
    pub const API_URL: &str = "ECOLESSON_API_URL";
    /// Course page size.
    pub const PAGE_SIZE: &str = "ECOLESSON_PAGE_SIZE";
    /// Simulated load time of static lists, in milliseconds.
    pub const CATALOG_DELAY_MS: &str = "ECOLESSON_CATALOG_DELAY_MS";
    /// Firebase Web API key.
    pub const FIREBASE_API_KEY: &str = "ECOLESSON_FIREBASE_API_KEY";
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric variable did not parse.
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A variable that must not be empty was empty.
    #[error("{var} must not be empty")]
    Empty {
        /// Variable name.
        var: &'static str,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the course REST API, without trailing slash.
    pub api_base_url: String,
    /// Course page to request.
    pub page: u32,
    /// Courses per page.
    pub page_size: u32,
    /// Simulated load time of the jobs, companies and certificates lists.
    pub catalog_delay: Duration,
    /// Firebase settings; `None` selects the in-memory provider.
    pub firebase: Option<FirebaseConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page: 1,
            page_size: 20,
            catalog_delay: Duration::from_millis(500),
            firebase: None,
        }
    }
}

impl AppConfig {
    /// Configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the course API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the course page and page size.
    #[must_use]
    pub const fn with_paging(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Set the simulated catalog load time.
    #[must_use]
    pub const fn with_catalog_delay(mut self, delay: Duration) -> Self {
        self.catalog_delay = delay;
        self
    }

    /// Use Firebase as identity provider.
    #[must_use]
    pub fn with_firebase(mut self, firebase: FirebaseConfig) -> Self {
        self.firebase = Some(firebase);
        self
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, starting from defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(vars::API_URL) {
            if url.trim().is_empty() {
                return Err(ConfigError::Empty { var: vars::API_URL });
            }
            config = config.with_api_base_url(url.trim());
        }
        if let Some(raw) = lookup(vars::PAGE_SIZE) {
            config.page_size = parse_number(vars::PAGE_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(vars::CATALOG_DELAY_MS) {
            config.catalog_delay = Duration::from_millis(parse_number(vars::CATALOG_DELAY_MS, &raw)?);
        }
        if let Some(key) = lookup(vars::FIREBASE_API_KEY).filter(|key| !key.trim().is_empty()) {
            config.firebase = Some(FirebaseConfig::new(key.trim()));
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}
