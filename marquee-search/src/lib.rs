//! Marquee Search - Movie catalog search and pagination

#![warn(missing_docs)]
#![deny(clippy::missing_errors_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Couples a debounced text query to incremental page fetches against a
//! remote movie catalog, and exposes the accumulated results as a single
//! observable state for rendering.

pub mod controller;
pub mod debounce;
pub mod errors;
pub mod providers;
pub mod types;

// Re-export main types
pub use controller::{SearchController, SearchOutcome, SearchState, SearchStatus};
pub use debounce::{DebouncedRequests, QueryDebouncer, SearchRequest};
pub use errors::FetchError;
pub use providers::{CatalogProvider, DemoProvider, OmdbProvider, provider_from_config};
pub use types::{MediaType, MovieDetail, MovieSummary, POSTER_UNAVAILABLE, SearchPage};
