//! Typing flows through the debouncer into the controller.

use std::sync::Arc;
use std::time::Duration;

use marquee_search::providers::MockCatalog;
use marquee_search::{DebouncedRequests, QueryDebouncer, SearchController, SearchStatus};
use tokio::task::JoinHandle;

const WINDOW: Duration = Duration::from_millis(500);

/// Forwards every debounced request to the controller, like the view's event loop.
fn spawn_search_loop(
    controller: Arc<SearchController>,
    mut requests: DebouncedRequests,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            controller.search(&request.query, request.page).await;
        }
    })
}

#[tokio::test(start_paused = true)]
async fn test_typing_after_first_search_fetches_once() {
    let catalog = Arc::new(
        MockCatalog::new()
            .with_paged_results("bat", 5, 10)
            .with_paged_results("batman begins", 1, 10),
    );
    let controller = Arc::new(SearchController::new(catalog.clone()));
    let (mut debouncer, requests) = QueryDebouncer::new(WINDOW);
    let search_loop = spawn_search_loop(controller.clone(), requests);

    controller.search("bat", 1).await;

    for text in ["batm", "batma", "batman", "batman b", "batman begins"] {
        assert!(controller.on_query_input(text, &mut debouncer));
        tokio::time::sleep(Duration::from_millis(80)).await;
    }
    tokio::time::sleep(WINDOW * 2).await;

    assert_eq!(
        catalog.calls(),
        vec![("bat".to_string(), 1), ("batman begins".to_string(), 1)]
    );
    let state = controller.state();
    assert_eq!(state.query, "batman begins");
    assert_eq!(state.status, SearchStatus::Success);
    assert_eq!(state.results.len(), 1);

    search_loop.abort();
}

#[tokio::test(start_paused = true)]
async fn test_typing_before_any_search_never_fetches() {
    let catalog = Arc::new(MockCatalog::new().with_paged_results("dune", 3, 10));
    let controller = Arc::new(SearchController::new(catalog.clone()));
    let (mut debouncer, requests) = QueryDebouncer::new(WINDOW);
    let search_loop = spawn_search_loop(controller.clone(), requests);

    for text in ["d", "du", "dun", "dune"] {
        assert!(!controller.on_query_input(text, &mut debouncer));
    }
    tokio::time::sleep(WINDOW * 3).await;

    assert_eq!(catalog.call_count(), 0);
    assert_eq!(controller.state().status, SearchStatus::Idle);

    search_loop.abort();
}

#[tokio::test(start_paused = true)]
async fn test_teardown_cancels_pending_search() {
    let catalog = Arc::new(MockCatalog::new().with_paged_results("jaws", 4, 10));
    let controller = Arc::new(SearchController::new(catalog.clone()));
    let (mut debouncer, requests) = QueryDebouncer::new(WINDOW);
    let search_loop = spawn_search_loop(controller.clone(), requests);

    controller.search("jaws", 1).await;
    assert!(controller.on_query_input("jaws 2", &mut debouncer));
    tokio::time::sleep(Duration::from_millis(200)).await;

    // View torn down before the window elapsed
    debouncer.cancel();
    tokio::time::sleep(WINDOW * 2).await;

    assert_eq!(catalog.calls(), vec![("jaws".to_string(), 1)]);
    assert_eq!(controller.state().query, "jaws");

    search_loop.abort();
}

#[tokio::test(start_paused = true)]
async fn test_clear_disarms_auto_search() {
    let catalog = Arc::new(MockCatalog::new().with_paged_results("alien", 2, 10));
    let controller = Arc::new(SearchController::new(catalog.clone()));
    let (mut debouncer, _requests) = QueryDebouncer::new(WINDOW);

    controller.search("alien", 1).await;
    assert!(controller.on_query_input("aliens", &mut debouncer));

    debouncer.cancel();
    controller.clear();

    assert!(!controller.on_query_input("aliens", &mut debouncer));
    assert!(!debouncer.is_pending());
}
