//! Scripted provider implementation for testing.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::CatalogProvider;
use crate::errors::FetchError;
use crate::types::{MediaType, MovieDetail, MovieSummary, SearchPage};

#[derive(Debug, Clone)]
struct ScriptedResponse {
    result: Result<SearchPage, FetchError>,
    latency: Duration,
}

/// Mock catalog with scripted responses and a call log.
///
/// Unscripted `(query, page)` pairs answer with an empty page and a total of
/// zero. Latency is simulated with `tokio::time::sleep`, so tests running on
/// a paused clock stay deterministic.
#[derive(Debug, Default)]
pub struct MockCatalog {
    responses: Mutex<HashMap<(String, u32), ScriptedResponse>>,
    details: Mutex<HashMap<String, MovieDetail>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl MockCatalog {
    /// Creates an empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful page.
    pub fn with_page(self, query: &str, page: u32, result: SearchPage) -> Self {
        self.script_page(query, page, result);
        self
    }

    /// Scripts a failure.
    pub fn with_failure(self, query: &str, page: u32, error: FetchError) -> Self {
        self.script_failure(query, page, error);
        self
    }

    /// Delays the scripted response for `(query, page)`.
    pub fn with_latency(self, query: &str, page: u32, latency: Duration) -> Self {
        self.responses
            .lock()
            .entry((query.to_string(), page))
            .or_insert_with(|| ScriptedResponse {
                result: Ok(SearchPage::default()),
                latency: Duration::ZERO,
            })
            .latency = latency;
        self
    }

    /// Scripts every page of a result set of `total` synthetic titles.
    pub fn with_paged_results(self, query: &str, total: u64, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let mut index = 0u64;
        let mut page = 1u32;

        while index < total {
            let movies: Vec<MovieSummary> = (index..total)
                .take(page_size)
                .map(|n| sample_movie(query, n))
                .collect();
            index += movies.len() as u64;
            self.script_page(
                query,
                page,
                SearchPage {
                    movies,
                    total_results: total,
                },
            );
            page += 1;
        }
        self
    }

    /// Registers a detail record.
    pub fn with_detail(self, detail: MovieDetail) -> Self {
        self.details.lock().insert(detail.id.clone(), detail);
        self
    }

    /// Replaces the response for `(query, page)` with a successful page.
    pub fn script_page(&self, query: &str, page: u32, result: SearchPage) {
        self.script(query, page, Ok(result));
    }

    /// Replaces the response for `(query, page)` with a failure.
    pub fn script_failure(&self, query: &str, page: u32, error: FetchError) {
        self.script(query, page, Err(error));
    }

    fn script(&self, query: &str, page: u32, result: Result<SearchPage, FetchError>) {
        let mut responses = self.responses.lock();
        let latency = responses
            .get(&(query.to_string(), page))
            .map(|scripted| scripted.latency)
            .unwrap_or(Duration::ZERO);
        responses.insert((query.to_string(), page), ScriptedResponse { result, latency });
    }

    /// All search requests received so far, in order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }

    /// Number of search requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

/// Synthetic title `n` for `query`, with a stable id.
pub fn sample_movie(query: &str, n: u64) -> MovieSummary {
    MovieSummary {
        id: format!("{}-{n:04}", query.replace(' ', "-")),
        poster_url: "N/A".to_string(),
        title: format!("{query} #{n}"),
        year: (1980 + n % 40).to_string(),
        media_type: MediaType::Movie,
    }
}

/// Minimal detail record matching a summary, for `with_detail`.
pub fn sample_detail(movie: &MovieSummary) -> MovieDetail {
    MovieDetail {
        id: movie.id.clone(),
        title: movie.title.clone(),
        year: movie.year.clone(),
        media_type: movie.media_type,
        rated: None,
        released: None,
        runtime: None,
        genre: None,
        director: None,
        writer: None,
        actors: Vec::new(),
        plot: Some(format!("Plot of {}", movie.title)),
        language: None,
        country: None,
        awards: None,
        poster_url: None,
        imdb_rating: None,
        imdb_votes: None,
        box_office: None,
    }
}

#[async_trait]
impl CatalogProvider for MockCatalog {
    async fn search_catalog(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        self.calls.lock().push((query.to_string(), page));

        let scripted = self
            .responses
            .lock()
            .get(&(query.to_string(), page))
            .cloned();

        match scripted {
            Some(scripted) => {
                if !scripted.latency.is_zero() {
                    tokio::time::sleep(scripted.latency).await;
                }
                scripted.result
            }
            None => Ok(SearchPage::default()),
        }
    }

    async fn fetch_details(&self, id: &str) -> Result<MovieDetail, FetchError> {
        self.details
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::ProviderError {
                reason: "Incorrect IMDb ID.".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_paged_results_split_evenly() {
        let catalog = MockCatalog::new().with_paged_results("batman", 25, 10);

        let first = catalog.search_catalog("batman", 1).await.unwrap();
        let third = catalog.search_catalog("batman", 3).await.unwrap();
        let fourth = catalog.search_catalog("batman", 4).await.unwrap();

        assert_eq!(first.movies.len(), 10);
        assert_eq!(first.total_results, 25);
        assert_eq!(third.movies.len(), 5);
        assert_eq!(third.movies[0].id, "batman-0020");
        assert!(fourth.movies.is_empty());
        assert_eq!(catalog.call_count(), 3);
    }

    #[tokio::test]
    async fn test_rescripting_keeps_latency() {
        let catalog = MockCatalog::new().with_latency("q", 1, Duration::from_millis(5));
        catalog.script_failure(
            "q",
            1,
            FetchError::NetworkError {
                reason: "offline".to_string(),
            },
        );

        let scripted = catalog
            .responses
            .lock()
            .get(&("q".to_string(), 1))
            .cloned()
            .unwrap();
        assert_eq!(scripted.latency, Duration::from_millis(5));
        assert!(scripted.result.is_err());
    }

    #[tokio::test]
    async fn test_registered_details() {
        let movie = sample_movie("heat", 0);
        let catalog = MockCatalog::new().with_detail(sample_detail(&movie));

        let detail = catalog.fetch_details("heat-0000").await.unwrap();
        assert_eq!(detail.title, "heat #0");
        assert_eq!(detail.plot.as_deref(), Some("Plot of heat #0"));

        let missing = catalog.fetch_details("heat-0001").await.unwrap_err();
        assert_eq!(missing.user_message(), "Incorrect IMDb ID.");
        assert_eq!(catalog.call_count(), 0);
    }
}
