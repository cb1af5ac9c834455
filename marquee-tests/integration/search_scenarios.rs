//! End-to-end search scenarios against a scripted catalog.

use std::sync::Arc;
use std::time::Duration;

use marquee_search::providers::MockCatalog;
use marquee_search::providers::mock::{sample_detail, sample_movie};
use marquee_search::{
    FetchError, SearchController, SearchOutcome, SearchPage, SearchState, SearchStatus,
};
use proptest::prelude::*;

/// Test fixture pairing a controller with the mock it fetches from.
struct SearchFixture {
    controller: SearchController,
    catalog: Arc<MockCatalog>,
}

impl SearchFixture {
    fn new(catalog: MockCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let controller = SearchController::new(catalog.clone());
        Self {
            controller,
            catalog,
        }
    }
}

#[tokio::test]
async fn test_batman_first_page_then_load_more() {
    let fixture = SearchFixture::new(MockCatalog::new().with_paged_results("batman", 50, 10));

    fixture.controller.search("batman", 1).await;
    let state = fixture.controller.state();
    assert_eq!(state.status, SearchStatus::Success);
    assert_eq!(state.results.len(), 10);
    assert!(fixture.controller.has_more());

    fixture.controller.load_more().await;
    let state = fixture.controller.state();
    assert_eq!(state.status, SearchStatus::Success);
    assert_eq!(state.results.len(), 20);
    assert_eq!(state.page, 2);

    // Arrival order: every page-1 title precedes every page-2 title
    let expected: Vec<_> = (0..20).map(|n| sample_movie("batman", n)).collect();
    assert_eq!(state.results, expected);
}

#[tokio::test]
async fn test_no_result_query_is_empty_not_error() {
    let fixture = SearchFixture::new(MockCatalog::new().with_page(
        "zzzqqqnoresult",
        1,
        SearchPage {
            movies: Vec::new(),
            total_results: 0,
        },
    ));

    let outcome = fixture.controller.search("zzzqqqnoresult", 1).await;

    assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Empty));
    assert!(fixture.controller.state().error_message.is_none());
}

#[tokio::test]
async fn test_backend_failure_clears_results() {
    let fixture = SearchFixture::new(
        MockCatalog::new()
            .with_paged_results("batman", 50, 10)
            .with_failure(
                "batmna",
                1,
                FetchError::ProviderError {
                    reason: "Movie not found!".to_string(),
                },
            ),
    );

    fixture.controller.search("batman", 1).await;
    assert_eq!(fixture.controller.state().results.len(), 10);

    fixture.controller.search("batmna", 1).await;
    let state = fixture.controller.state();
    assert_eq!(state.status, SearchStatus::Error);
    assert_eq!(state.error_message.as_deref(), Some("Movie not found!"));
    assert!(state.results.is_empty());
    assert_eq!(fixture.controller.load_more().await, SearchOutcome::Skipped);
}

#[tokio::test]
async fn test_network_failure_message_and_retry() {
    let fixture = SearchFixture::new(MockCatalog::new().with_failure(
        "heat",
        1,
        FetchError::NetworkError {
            reason: "connection reset".to_string(),
        },
    ));

    fixture.controller.search("heat", 1).await;
    assert_eq!(
        fixture.controller.state().error_message.as_deref(),
        Some("Network error: connection reset")
    );

    fixture.catalog.script_page(
        "heat",
        1,
        SearchPage {
            movies: vec![sample_movie("heat", 0)],
            total_results: 1,
        },
    );
    let outcome = fixture.controller.retry().await;

    assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));
    let state = fixture.controller.state();
    assert!(state.error_message.is_none());
    assert_eq!(state.results.len(), 1);
    assert_eq!(fixture.catalog.call_count(), 2);
}

#[tokio::test]
async fn test_blank_search_changes_nothing() {
    let fixture = SearchFixture::new(MockCatalog::new());

    let outcome = fixture.controller.search("", 1).await;

    assert_eq!(outcome, SearchOutcome::Skipped);
    assert_eq!(fixture.controller.state(), SearchState::default());
    assert_eq!(fixture.controller.state().status, SearchStatus::Idle);
    assert_eq!(fixture.catalog.call_count(), 0);
}

#[tokio::test]
async fn test_retry_when_idle_is_skipped() {
    let fixture = SearchFixture::new(MockCatalog::new());

    assert_eq!(fixture.controller.retry().await, SearchOutcome::Skipped);
    assert_eq!(fixture.catalog.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_load_more_issues_one_request() {
    let fixture = SearchFixture::new(
        MockCatalog::new()
            .with_paged_results("alien", 30, 10)
            .with_latency("alien", 2, Duration::from_millis(50)),
    );
    fixture.controller.search("alien", 1).await;

    let (first, second) = futures::join!(
        fixture.controller.load_more(),
        fixture.controller.load_more()
    );

    assert_eq!(first, SearchOutcome::Completed(SearchStatus::Success));
    assert_eq!(second, SearchOutcome::Skipped);
    assert_eq!(fixture.controller.state().results.len(), 20);
    assert_eq!(fixture.catalog.call_count(), 2);
}

#[tokio::test]
async fn test_open_details_from_results() {
    let fixture = SearchFixture::new(
        MockCatalog::new()
            .with_paged_results("heat", 3, 10)
            .with_detail(sample_detail(&sample_movie("heat", 1))),
    );
    fixture.controller.search("heat", 1).await;

    let picked = fixture.controller.state().results[1].clone();
    let detail = fixture.controller.catalog().fetch_details(&picked.id).await;
    let detail = tokio_test::assert_ok!(detail);

    assert_eq!(detail.id, picked.id);
    assert_eq!(detail.title, picked.title);
    // Details lookups never go through the search log
    assert_eq!(fixture.catalog.call_count(), 1);
}

#[tokio::test]
async fn test_clear_after_results_and_errors() {
    let fixture = SearchFixture::new(MockCatalog::new().with_paged_results("up", 3, 10));

    fixture.controller.search("up", 1).await;
    fixture.controller.clear();
    fixture.controller.clear();

    assert_eq!(fixture.controller.state(), SearchState::default());
    assert!(!fixture.controller.has_searched());
}

proptest! {
    #[test]
    fn prop_load_more_never_fetches_when_exhausted(total in 0u64..45, page_size in 1usize..15, extra in 1usize..4) {
        let fixture = SearchFixture::new(
            MockCatalog::new().with_paged_results("prop", total, page_size),
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let calls_when_exhausted = runtime.block_on(async {
            fixture.controller.search("prop", 1).await;
            while fixture.controller.has_more() {
                fixture.controller.load_more().await;
            }
            let calls = fixture.catalog.call_count();
            for _ in 0..extra {
                assert_eq!(fixture.controller.load_more().await, SearchOutcome::Skipped);
            }
            calls
        });

        prop_assert_eq!(fixture.catalog.call_count(), calls_when_exhausted);
        prop_assert_eq!(fixture.controller.state().results.len() as u64, total);
    }
}
