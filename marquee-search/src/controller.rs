//! Search-and-pagination controller.
//!
//! Couples a query to incremental page fetches, accumulates results across
//! pages and publishes a single [`SearchState`] for rendering. Fetch failures
//! never escape: they become `SearchStatus::Error` with a message.
//!
//! Every dispatched fetch takes a request id. A response is applied only if
//! its id is still the latest when it settles, so a slow page can never
//! overwrite the state of a newer search. `clear()` invalidates in-flight
//! requests the same way.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;

use crate::debounce::QueryDebouncer;
use crate::providers::CatalogProvider;
use crate::types::MovieSummary;

/// Rendering status of the current search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// No search has been made since start or the last clear
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded and results are non-empty
    Success,
    /// The last fetch failed; see `error_message`
    Error,
    /// The last fetch succeeded with no results
    Empty,
}

/// Snapshot consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    /// Trimmed query of the latest dispatched search
    pub query: String,
    /// Page of the latest dispatched search, 1-indexed
    pub page: u32,
    /// Titles accumulated across pages in arrival order
    pub results: Vec<MovieSummary>,
    /// Total matches reported by the catalog
    pub total_available: u64,
    /// Where the state machine currently is
    pub status: SearchStatus,
    /// Failure description, set only in `SearchStatus::Error`
    pub error_message: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            results: Vec::new(),
            total_available: 0,
            status: SearchStatus::Idle,
            error_message: None,
        }
    }
}

impl SearchState {
    /// Whether the catalog reports more titles than have been loaded.
    ///
    /// Trusts `total_available` as reported.
    pub fn has_more(&self) -> bool {
        (self.results.len() as u64) < self.total_available
    }
}

/// How a controller call settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Nothing was dispatched (blank query or guard not satisfied)
    Skipped,
    /// The response was applied and left the state in this status
    Completed(SearchStatus),
    /// A newer request or a clear happened first; the response was dropped
    Superseded,
}

#[derive(Debug, Default)]
struct Session {
    has_searched: bool,
    latest_request: u64,
}

/// Owns the paging state machine on top of a catalog provider.
///
/// Methods take `&self`; share the controller behind an `Arc` to drive it
/// from several tasks. The session lock is never held across a fetch.
#[derive(Debug)]
pub struct SearchController {
    catalog: Arc<dyn CatalogProvider>,
    session: Mutex<Session>,
    state: watch::Sender<SearchState>,
}

impl SearchController {
    /// Creates an idle controller.
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            catalog,
            session: Mutex::new(Session::default()),
            state,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Whether a search has been dispatched since start or the last clear.
    ///
    /// Typing only triggers debounced searches once this is set.
    pub fn has_searched(&self) -> bool {
        self.session.lock().has_searched
    }

    /// See [`SearchState::has_more`].
    pub fn has_more(&self) -> bool {
        self.state.borrow().has_more()
    }

    /// The catalog this controller fetches from.
    pub fn catalog(&self) -> &Arc<dyn CatalogProvider> {
        &self.catalog
    }

    /// Searches `query` at `page`.
    ///
    /// Blank queries are skipped without any state change. Page 1 replaces
    /// the accumulated results, later pages append. A failure resets results
    /// and `total_available` and records the message.
    pub async fn search(&self, query: &str, page: u32) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Skipping search for blank query");
            return SearchOutcome::Skipped;
        }
        let page = page.max(1);

        let request_id = {
            let mut session = self.session.lock();
            session.has_searched = true;
            session.latest_request += 1;
            self.state.send_modify(|state| {
                state.query = query.to_string();
                state.page = page;
                state.status = SearchStatus::Loading;
                state.error_message = None;
            });
            session.latest_request
        };

        tracing::info!("Searching '{query}' page {page} (request #{request_id})");

        let result = self.catalog.search_catalog(query, page).await;

        let session = self.session.lock();
        if session.latest_request != request_id {
            tracing::debug!(
                "Dropping stale response for '{query}' page {page} (request #{request_id}, latest #{})",
                session.latest_request
            );
            return SearchOutcome::Superseded;
        }

        let mut status = SearchStatus::Idle;
        match result {
            Ok(found) => {
                tracing::debug!(
                    "Received {} titles for '{query}' page {page} ({} total)",
                    found.movies.len(),
                    found.total_results
                );
                self.state.send_modify(|state| {
                    if page == 1 {
                        state.results.clear();
                    }
                    state.results.extend(found.movies);
                    state.total_available = found.total_results;
                    state.status = if state.results.is_empty() {
                        SearchStatus::Empty
                    } else {
                        SearchStatus::Success
                    };
                    state.error_message = None;
                    status = state.status;
                });
            }
            Err(error) => {
                tracing::warn!("Search for '{query}' page {page} failed: {error}");
                self.state.send_modify(|state| {
                    state.results.clear();
                    state.total_available = 0;
                    state.status = SearchStatus::Error;
                    state.error_message = Some(error.user_message());
                    status = state.status;
                });
            }
        }
        drop(session);

        SearchOutcome::Completed(status)
    }

    /// Fetches the next page when idle and more titles are available.
    ///
    /// This guard is the only protection against overlapping requests for
    /// the same page; a duplicate that slips through is dropped as stale.
    pub async fn load_more(&self) -> SearchOutcome {
        let next = {
            let state = self.state.borrow();
            if state.status == SearchStatus::Loading || state.query.is_empty() || !state.has_more()
            {
                None
            } else {
                state
                    .page
                    .checked_add(1)
                    .map(|page| (state.query.clone(), page))
            }
        };

        match next {
            Some((query, page)) => self.search(&query, page).await,
            None => {
                tracing::debug!("Load more skipped");
                SearchOutcome::Skipped
            }
        }
    }

    /// Re-issues the last attempted search.
    ///
    /// After a failure the results were discarded, so this restarts at the
    /// failed page rather than resuming.
    pub async fn retry(&self) -> SearchOutcome {
        let (query, page) = {
            let state = self.state.borrow();
            (state.query.clone(), state.page)
        };
        self.search(&query, page).await
    }

    /// Returns to the initial idle state. In-flight responses are dropped.
    pub fn clear(&self) {
        let mut session = self.session.lock();
        session.has_searched = false;
        session.latest_request += 1;
        self.state.send_replace(SearchState::default());
        tracing::debug!("Search cleared");
    }

    /// Feeds a query edit into the debounced auto-search path.
    ///
    /// Arms `debouncer` with `(text, 1)` only after an explicit search has
    /// been made and when the text is not blank. Blank input cancels any
    /// pending trigger. Returns whether the debouncer was armed.
    pub fn on_query_input(&self, text: &str, debouncer: &mut QueryDebouncer) -> bool {
        let query = text.trim();
        if query.is_empty() {
            debouncer.cancel();
            return false;
        }
        if !self.has_searched() {
            return false;
        }

        debouncer.notify(query, 1);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;
    use crate::errors::FetchError;
    use crate::providers::MockCatalog;
    use crate::providers::mock::sample_movie;
    use crate::types::SearchPage;

    fn controller_with(catalog: MockCatalog) -> (Arc<SearchController>, Arc<MockCatalog>) {
        let catalog = Arc::new(catalog);
        let controller = Arc::new(SearchController::new(catalog.clone()));
        (controller, catalog)
    }

    fn not_found() -> FetchError {
        FetchError::ProviderError {
            reason: "Movie not found!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_query_is_a_no_op() {
        let (controller, catalog) = controller_with(MockCatalog::new());

        assert_eq!(controller.search("", 1).await, SearchOutcome::Skipped);
        assert_eq!(controller.search("   \t", 1).await, SearchOutcome::Skipped);

        assert_eq!(controller.state(), SearchState::default());
        assert!(!controller.has_searched());
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test]
    async fn test_first_page_then_load_more_accumulates() {
        let (controller, catalog) =
            controller_with(MockCatalog::new().with_paged_results("batman", 50, 10));

        let outcome = controller.search("batman", 1).await;
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));
        let state = controller.state();
        assert_eq!(state.results.len(), 10);
        assert_eq!(state.total_available, 50);
        assert!(controller.has_searched());

        controller.load_more().await;
        let state = controller.state();
        assert_eq!(state.status, SearchStatus::Success);
        assert_eq!(state.page, 2);
        assert_eq!(state.results.len(), 20);
        assert_eq!(state.results[0], sample_movie("batman", 0));
        assert_eq!(state.results[10], sample_movie("batman", 10));
        assert_eq!(
            catalog.calls(),
            vec![("batman".to_string(), 1), ("batman".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_query_is_trimmed_before_fetch() {
        let (controller, catalog) =
            controller_with(MockCatalog::new().with_paged_results("alien", 3, 10));

        controller.search("  alien ", 1).await;
        assert_eq!(controller.state().query, "alien");
        assert_eq!(catalog.calls(), vec![("alien".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_empty_response_is_not_an_error() {
        let (controller, _) = controller_with(MockCatalog::new().with_page(
            "zzzqqqnoresult",
            1,
            SearchPage::default(),
        ));

        let outcome = controller.search("zzzqqqnoresult", 1).await;
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Empty));
        let state = controller.state();
        assert!(state.results.is_empty());
        assert!(state.error_message.is_none());
    }

    #[tokio::test]
    async fn test_empty_later_page_keeps_success() {
        let (controller, catalog) = controller_with(
            MockCatalog::new()
                .with_paged_results("batman", 30, 10)
                .with_page(
                    "batman",
                    2,
                    SearchPage {
                        movies: Vec::new(),
                        total_results: 30,
                    },
                ),
        );
        controller.search("batman", 1).await;

        let outcome = controller.load_more().await;

        // Status follows the merged results, not the page just received
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));
        let state = controller.state();
        assert_eq!(state.status, SearchStatus::Success);
        assert_eq!(state.results.len(), 10);
        assert_eq!(state.page, 2);
        assert!(state.error_message.is_none());
        assert_eq!(catalog.calls().last(), Some(&("batman".to_string(), 2)));
    }

    #[tokio::test]
    async fn test_load_more_stops_at_last_page_number() {
        let (controller, catalog) = controller_with(MockCatalog::new().with_page(
            "endless",
            u32::MAX,
            SearchPage {
                movies: vec![sample_movie("endless", 0)],
                total_results: 100,
            },
        ));
        controller.search("endless", u32::MAX).await;
        assert!(controller.has_more());

        assert_eq!(controller.load_more().await, SearchOutcome::Skipped);
        assert_eq!(catalog.call_count(), 1);
        assert_eq!(controller.state().page, u32::MAX);
    }

    #[tokio::test]
    async fn test_failure_discards_results_and_retry_recovers() {
        let (controller, catalog) =
            controller_with(MockCatalog::new().with_paged_results("batman", 30, 10));

        controller.search("batman", 1).await;
        controller.load_more().await;
        assert_eq!(controller.state().results.len(), 20);

        catalog.script_failure("batman", 3, not_found());
        let outcome = controller.load_more().await;
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Error));

        let state = controller.state();
        assert_eq!(state.error_message.as_deref(), Some("Movie not found!"));
        assert!(state.results.is_empty());
        assert_eq!(state.total_available, 0);
        assert_eq!(state.page, 3);

        catalog.script_page(
            "batman",
            3,
            SearchPage {
                movies: (20..30).map(|n| sample_movie("batman", n)).collect(),
                total_results: 30,
            },
        );
        let outcome = controller.retry().await;
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));

        let state = controller.state();
        assert!(state.error_message.is_none());
        // Retry restarts at the failed page instead of resuming
        assert_eq!(state.results.len(), 10);
        assert_eq!(state.results[0], sample_movie("batman", 20));
        assert_eq!(catalog.calls().last(), Some(&("batman".to_string(), 3)));
    }

    #[tokio::test]
    async fn test_new_first_page_replaces_results() {
        let (controller, _) = controller_with(
            MockCatalog::new()
                .with_paged_results("matrix", 4, 10)
                .with_paged_results("inception", 2, 10),
        );

        controller.search("matrix", 1).await;
        controller.search("inception", 1).await;

        let state = controller.state();
        assert_eq!(state.results.len(), 2);
        assert!(state.results.iter().all(|m| m.title.starts_with("inception")));
    }

    #[tokio::test]
    async fn test_load_more_skips_when_everything_is_loaded() {
        let (controller, catalog) =
            controller_with(MockCatalog::new().with_paged_results("heat", 7, 10));

        assert_eq!(controller.load_more().await, SearchOutcome::Skipped);

        controller.search("heat", 1).await;
        assert!(!controller.has_more());
        assert_eq!(controller.load_more().await, SearchOutcome::Skipped);
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_more_skips_while_loading() {
        let (controller, catalog) = controller_with(
            MockCatalog::new()
                .with_paged_results("dune", 40, 10)
                .with_latency("dune", 2, Duration::from_millis(200)),
        );
        controller.search("dune", 1).await;

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.load_more().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(controller.state().status, SearchStatus::Loading);

        assert_eq!(controller.load_more().await, SearchOutcome::Skipped);

        let outcome = background.await.unwrap();
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));
        assert_eq!(controller.state().results.len(), 20);
        assert_eq!(catalog.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_dropped() {
        let (controller, _) = controller_with(
            MockCatalog::new()
                .with_paged_results("bat", 12, 10)
                .with_latency("bat", 1, Duration::from_millis(300))
                .with_paged_results("batman", 3, 10)
                .with_latency("batman", 1, Duration::from_millis(10)),
        );

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.search("bat", 1).await })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;

        let fast = controller.search("batman", 1).await;
        assert_eq!(fast, SearchOutcome::Completed(SearchStatus::Success));

        assert_eq!(slow.await.unwrap(), SearchOutcome::Superseded);
        let state = controller.state();
        assert_eq!(state.query, "batman");
        assert_eq!(state.results.len(), 3);
        assert_eq!(state.total_available, 3);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let (controller, _) = controller_with(MockCatalog::new().with_failure(
            "robocop",
            1,
            not_found(),
        ));

        controller.search("robocop", 1).await;
        assert_eq!(controller.state().status, SearchStatus::Error);

        controller.clear();
        let once = controller.state();
        controller.clear();

        assert_eq!(controller.state(), once);
        assert_eq!(once.status, SearchStatus::Idle);
        assert!(once.results.is_empty());
        assert!(once.query.is_empty());
        assert!(once.error_message.is_none());
        assert!(!controller.has_searched());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_drops_in_flight_response() {
        let (controller, _) = controller_with(
            MockCatalog::new()
                .with_paged_results("tron", 5, 10)
                .with_latency("tron", 1, Duration::from_millis(100)),
        );

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.search("tron", 1).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.clear();

        assert_eq!(pending.await.unwrap(), SearchOutcome::Superseded);
        assert_eq!(controller.state(), SearchState::default());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let (controller, _) =
            controller_with(MockCatalog::new().with_paged_results("up", 1, 10));
        let mut updates = controller.subscribe();

        controller.search("up", 1).await;

        assert!(updates.has_changed().unwrap());
        let latest = updates.borrow_and_update().clone();
        assert_eq!(latest.status, SearchStatus::Success);
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_input_arms_debounce_only_after_search() {
        let (controller, _) =
            controller_with(MockCatalog::new().with_paged_results("jaws", 2, 10));
        let (mut debouncer, mut requests) = QueryDebouncer::new(Duration::from_millis(500));

        assert!(!controller.on_query_input("jaw", &mut debouncer));
        assert!(!debouncer.is_pending());

        controller.search("jaws", 1).await;
        assert!(controller.on_query_input("jaws 2", &mut debouncer));
        assert!(debouncer.is_pending());

        assert!(!controller.on_query_input("   ", &mut debouncer));
        assert!(!debouncer.is_pending());

        assert!(controller.on_query_input(" jaws 3 ", &mut debouncer));
        tokio::time::sleep(Duration::from_millis(600)).await;
        let request = requests.try_recv().unwrap();
        assert_eq!(request.query, "jaws 3");
        assert_eq!(request.page, 1);
    }

    proptest! {
        #[test]
        fn prop_pages_append_in_order(sizes in proptest::collection::vec(1usize..12, 1..6)) {
            let total: u64 = sizes.iter().map(|&n| n as u64).sum();
            let mut catalog = MockCatalog::new();
            let mut next = 0u64;
            for (index, &size) in sizes.iter().enumerate() {
                let movies = (next..next + size as u64)
                    .map(|n| sample_movie("prop", n))
                    .collect();
                next += size as u64;
                catalog = catalog.with_page(
                    "prop",
                    index as u32 + 1,
                    SearchPage { movies, total_results: total },
                );
            }
            let (controller, _) = controller_with(catalog);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                controller.search("prop", 1).await;
                let mut previous = controller.state().results.len();
                for &size in &sizes[1..] {
                    controller.load_more().await;
                    let len = controller.state().results.len();
                    assert_eq!(len, previous + size);
                    previous = len;
                }
            });

            let ids: Vec<String> = controller.state().results.into_iter().map(|m| m.id).collect();
            let expected: Vec<String> = (0..total).map(|n| sample_movie("prop", n).id).collect();
            prop_assert_eq!(ids, expected);
            prop_assert!(!controller.has_more());
        }
    }
}
