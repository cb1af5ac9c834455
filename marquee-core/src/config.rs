//! Centralized configuration for Marquee.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

use crate::MarqueeError;

/// Central configuration for all Marquee components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub development: DevelopmentConfig,
}

/// Remote movie catalog (OMDb) connection settings.
///
/// The access key and endpoint are opaque to the search controller; only the
/// catalog provider reads them.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base endpoint of the catalog API
    pub base_url: String,
    /// Access key appended to every request (None = keyless requests)
    pub api_key: Option<String>,
    /// Transport-level timeout for a single HTTP request
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.omdbapi.com/".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            user_agent: "marquee/0.1.0",
        }
    }
}

/// Search interaction tuning.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiescence window before a typed query triggers a search
    pub debounce_delay: Duration,
    /// Titles per page served by the demo catalog (OMDb fixes its own at 10)
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(500),
            page_size: 10,
        }
    }
}

/// Development mode settings.
#[derive(Debug, Clone, Default)]
pub struct DevelopmentConfig {
    /// Serve the built-in demo catalog instead of calling the network
    pub use_demo_data: bool,
}

impl MarqueeConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration reading overrides through `lookup`.
    ///
    /// Values that fail to parse leave the default in place.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Catalog configuration overrides
        if let Some(url) = lookup("MARQUEE_OMDB_URL")
            && !url.trim().is_empty()
        {
            config.catalog.base_url = url.trim().to_string();
        }

        if let Some(key) = lookup("OMDB_API_KEY")
            && !key.trim().is_empty()
        {
            config.catalog.api_key = Some(key.trim().to_string());
        }

        if let Some(timeout) = lookup("MARQUEE_REQUEST_TIMEOUT")
            && let Ok(seconds) = timeout.trim().parse::<u64>()
        {
            config.catalog.request_timeout = Duration::from_secs(seconds);
        }

        // Search configuration overrides
        if let Some(delay) = lookup("MARQUEE_DEBOUNCE_MS")
            && let Ok(millis) = delay.trim().parse::<u64>()
        {
            config.search.debounce_delay = Duration::from_millis(millis);
        }

        if let Some(size) = lookup("MARQUEE_PAGE_SIZE")
            && let Ok(size) = size.trim().parse::<usize>()
            && size > 0
        {
            config.search.page_size = size;
        }

        if let Some(demo) = lookup("MARQUEE_USE_DEMO_DATA") {
            config.development.use_demo_data = demo.parse().unwrap_or(false);
        }

        config
    }

    /// Creates a configuration for offline development against demo data.
    pub fn for_development() -> Self {
        Self {
            development: DevelopmentConfig {
                use_demo_data: true,
            },
            ..Default::default()
        }
    }

    /// Checks that the configuration can drive a catalog client.
    ///
    /// # Errors
    ///
    /// - `MarqueeError::Configuration` - If the base URL does not parse or the
    ///   debounce window is zero
    pub fn validate(&self) -> Result<(), MarqueeError> {
        url::Url::parse(&self.catalog.base_url).map_err(|e| MarqueeError::Configuration {
            reason: format!("invalid catalog URL '{}': {e}", self.catalog.base_url),
        })?;

        if self.search.debounce_delay.is_zero() {
            return Err(MarqueeError::Configuration {
                reason: "debounce delay must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
