//! OMDb provider against a local HTTP responder.

use std::net::SocketAddr;
use std::sync::Arc;

use marquee_core::CatalogConfig;
use marquee_search::{
    CatalogProvider, FetchError, MediaType, OmdbProvider, SearchController, SearchStatus,
};
use marquee_tests::fixtures::{
    BATMAN_BEGINS_DETAIL, BATMAN_PAGE_ONE, INVALID_KEY, NOT_FOUND, serve_once,
};
use tokio_test::{assert_err, assert_ok};

const OK: &str = "HTTP/1.1 200 OK";

fn provider_for(addr: SocketAddr, api_key: Option<&str>) -> OmdbProvider {
    let config = CatalogConfig {
        base_url: format!("http://{addr}/"),
        api_key: api_key.map(str::to_string),
        ..CatalogConfig::default()
    };
    assert_ok!(OmdbProvider::from_config(&config))
}

#[test]
fn test_fixtures_are_valid_json() {
    for body in [BATMAN_PAGE_ONE, NOT_FOUND, INVALID_KEY, BATMAN_BEGINS_DETAIL] {
        assert_ok!(serde_json::from_str::<serde_json::Value>(body));
    }
}

#[tokio::test]
async fn test_search_sends_query_page_and_key() {
    let (addr, request_line) = serve_once(OK, BATMAN_PAGE_ONE).await;
    let provider = provider_for(addr, Some("k3y"));

    let page = assert_ok!(provider.search_catalog("batman", 2).await);

    let request_line = assert_ok!(request_line.await);
    assert!(request_line.starts_with("GET /?"), "{request_line}");
    assert!(request_line.contains("apikey=k3y"), "{request_line}");
    assert!(request_line.contains("s=batman"), "{request_line}");
    assert!(request_line.contains("page=2"), "{request_line}");

    assert_eq!(page.total_results, 587);
    assert_eq!(page.movies.len(), 4);
    assert_eq!(page.movies[0].title, "Batman Begins");
    assert_eq!(page.movies[0].id, "tt0372784");
    assert!(page.movies[0].has_poster());

    let series = &page.movies[3];
    assert_eq!(series.media_type, MediaType::Series);
    assert_eq!(series.year, "1992-1995");
    assert!(!series.has_poster());
}

#[tokio::test]
async fn test_not_found_is_provider_error() {
    let (addr, _request_line) = serve_once(OK, NOT_FOUND).await;
    let provider = provider_for(addr, Some("k3y"));

    let error = assert_err!(provider.search_catalog("zzzqqqnoresult", 1).await);

    assert_eq!(
        error,
        FetchError::ProviderError {
            reason: "Movie not found!".to_string()
        }
    );
    assert_eq!(error.user_message(), "Movie not found!");
}

#[tokio::test]
async fn test_rejected_key_reports_catalog_message() {
    let (addr, _request_line) = serve_once("HTTP/1.1 401 Unauthorized", INVALID_KEY).await;
    let provider = provider_for(addr, None);

    let error = assert_err!(provider.search_catalog("batman", 1).await);

    assert_eq!(error.user_message(), "Invalid API key!");
}

#[tokio::test]
async fn test_server_error_without_json_is_network_error() {
    let (addr, _request_line) = serve_once("HTTP/1.1 503 Service Unavailable", "busy").await;
    let provider = provider_for(addr, Some("k3y"));

    let error = assert_err!(provider.search_catalog("batman", 1).await);

    assert!(matches!(error, FetchError::NetworkError { .. }), "{error:?}");
}

#[tokio::test]
async fn test_unreachable_catalog_is_network_error() {
    let addr = {
        let listener = assert_ok!(std::net::TcpListener::bind("127.0.0.1:0"));
        assert_ok!(listener.local_addr())
    };
    let provider = provider_for(addr, Some("k3y"));

    let error = assert_err!(provider.search_catalog("batman", 1).await);

    assert!(matches!(error, FetchError::NetworkError { .. }), "{error:?}");
}

#[tokio::test]
async fn test_details_lookup() {
    let (addr, request_line) = serve_once(OK, BATMAN_BEGINS_DETAIL).await;
    let provider = provider_for(addr, Some("k3y"));

    let detail = assert_ok!(provider.fetch_details("tt0372784").await);

    let request_line = assert_ok!(request_line.await);
    assert!(request_line.contains("i=tt0372784"), "{request_line}");

    assert_eq!(detail.title, "Batman Begins");
    assert_eq!(detail.media_type, MediaType::Movie);
    assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
    assert_eq!(
        detail.released.map(|date| date.to_string()).as_deref(),
        Some("2005-06-15")
    );
    assert_eq!(detail.actors.len(), 3);
    assert_eq!(detail.imdb_rating, Some(8.2));
}

#[tokio::test]
async fn test_controller_surfaces_catalog_message() {
    let (addr, _request_line) = serve_once(OK, NOT_FOUND).await;
    let controller = SearchController::new(Arc::new(provider_for(addr, Some("k3y"))));

    controller.search("batmna", 1).await;

    let state = controller.state();
    assert_eq!(state.status, SearchStatus::Error);
    assert_eq!(state.error_message.as_deref(), Some("Movie not found!"));
    assert!(state.results.is_empty());
    assert_eq!(state.total_available, 0);
}

#[tokio::test]
async fn test_controller_search_through_http() {
    let (addr, _request_line) = serve_once(OK, BATMAN_PAGE_ONE).await;
    let controller = SearchController::new(Arc::new(provider_for(addr, Some("k3y"))));

    controller.search("  batman ", 1).await;

    let state = controller.state();
    assert_eq!(state.status, SearchStatus::Success);
    assert_eq!(state.query, "batman");
    assert_eq!(state.results.len(), 4);
    assert!(controller.has_more());
}
