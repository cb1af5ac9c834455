//! Controller against the built-in demo catalog.

use marquee_core::MarqueeConfig;
use marquee_search::{SearchController, SearchOutcome, SearchStatus, provider_from_config};
use tokio_test::assert_ok;

fn demo_controller() -> SearchController {
    let provider = assert_ok!(provider_from_config(&MarqueeConfig::for_development()));
    SearchController::new(provider)
}

#[tokio::test]
async fn test_demo_batman_pages() {
    let controller = demo_controller();

    controller.search("Batman", 1).await;
    let state = controller.state();
    assert_eq!(state.status, SearchStatus::Success);
    assert_eq!(state.results.len(), 10);
    assert_eq!(state.total_available, 15);

    controller.load_more().await;
    assert_eq!(controller.state().results.len(), 15);
    assert!(!controller.has_more());
    assert_eq!(controller.load_more().await, SearchOutcome::Skipped);
}

#[tokio::test]
async fn test_demo_pages_by_configured_size() {
    let mut config = MarqueeConfig::for_development();
    config.search.page_size = 6;
    let controller = SearchController::new(assert_ok!(provider_from_config(&config)));

    controller.search("batman", 1).await;
    assert_eq!(controller.state().results.len(), 6);

    while controller.has_more() {
        controller.load_more().await;
    }
    let state = controller.state();
    assert_eq!(state.results.len(), 15);
    assert_eq!(state.page, 3);
    assert_eq!(state.status, SearchStatus::Success);
}

#[tokio::test]
async fn test_demo_not_found_surfaces_as_error() {
    let controller = demo_controller();

    let outcome = controller.search("zzzqqqnoresult", 1).await;

    assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Error));
    let state = controller.state();
    assert_eq!(state.error_message.as_deref(), Some("Movie not found!"));
    assert!(state.results.is_empty());
}

#[tokio::test]
async fn test_demo_details_for_listed_title() {
    let controller = demo_controller();
    controller.search("matrix", 1).await;

    let first = controller.state().results[0].clone();
    let detail = assert_ok!(controller.catalog().fetch_details(&first.id).await);

    assert_eq!(detail.title, first.title);
    assert_eq!(detail.year, first.year);
}
