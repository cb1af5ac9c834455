//! Integration tests for Marquee
//!
//! These tests drive the public API of the search crate the way the
//! presentation layer does: explicit searches, paging, retries, debounced
//! typing and the catalog providers behind them.

#[path = "integration/search_scenarios.rs"]
mod search_scenarios;

#[path = "integration/debounced_search.rs"]
mod debounced_search;

#[path = "integration/demo_catalog.rs"]
mod demo_catalog;

#[path = "integration/omdb_client.rs"]
mod omdb_client;
