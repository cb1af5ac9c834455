//! Catalog provider implementations.

use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::MarqueeConfig;

use crate::errors::FetchError;
use crate::types::{MovieDetail, SearchPage};

pub mod demo;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod omdb;

pub use demo::DemoProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockCatalog;
pub use omdb::OmdbProvider;

/// Client for the remote movie catalog.
///
/// Implementations provide catalog access through different backends
/// (the OMDb HTTP API, built-in demo data, scripted mocks for testing).
#[async_trait]
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    /// Fetch one page of titles matching `query`. Pages are 1-indexed.
    ///
    /// # Errors
    /// - `FetchError::NetworkError` - Transport failure
    /// - `FetchError::ParseError` - Malformed response body
    /// - `FetchError::ProviderError` - Catalog reported a failure, including "no results"
    async fn search_catalog(&self, query: &str, page: u32) -> Result<SearchPage, FetchError>;

    /// Fetch the full record for one catalog id.
    ///
    /// # Errors
    /// - `FetchError::NetworkError` - Transport failure
    /// - `FetchError::ParseError` - Malformed response body
    /// - `FetchError::ProviderError` - Unknown id or other catalog failure
    /// - `FetchError::InvalidRequest` - Blank id
    async fn fetch_details(&self, id: &str) -> Result<MovieDetail, FetchError>;
}

/// Builds the provider selected by configuration.
///
/// # Errors
/// - `FetchError::InvalidRequest` - Catalog URL is invalid or the HTTP client cannot be built
pub fn provider_from_config(
    config: &MarqueeConfig,
) -> Result<Arc<dyn CatalogProvider>, FetchError> {
    if config.development.use_demo_data {
        tracing::info!(
            "Using built-in demo catalog ({} per page)",
            config.search.page_size
        );
        return Ok(Arc::new(DemoProvider::with_page_size(
            config.search.page_size,
        )));
    }

    Ok(Arc::new(OmdbProvider::from_config(&config.catalog)?))
}
