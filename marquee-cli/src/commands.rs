//! CLI command implementations

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::bail;
use clap::Subcommand;
use marquee_core::MarqueeConfig;
use marquee_search::{
    CatalogProvider, DebouncedRequests, MovieDetail, QueryDebouncer, SearchController,
    SearchOutcome, SearchRequest, SearchState, SearchStatus, provider_from_config,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog and print the results
    Search {
        /// Title to search for
        query: String,
        /// Number of result pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },
    /// Show the details view for one catalog id
    Details {
        /// Catalog id, e.g. tt0372784
        id: String,
    },
    /// Interactive search session with debounced typing
    Interactive,
}

/// Handle the CLI command
///
/// # Errors
/// Returns an error when the catalog cannot be reached or reports a failure
pub async fn handle_command(command: Commands, config: MarqueeConfig) -> anyhow::Result<()> {
    match command {
        Commands::Search { query, pages } => search(&query, pages, &config).await,
        Commands::Details { id } => details(&id, &config).await,
        Commands::Interactive => interactive(config).await,
    }
}

/// Run one search and load up to `pages` pages.
///
/// # Errors
/// - Catalog provider could not be built
/// - The search ended in the error state
pub async fn search(query: &str, pages: u32, config: &MarqueeConfig) -> anyhow::Result<()> {
    let controller = SearchController::new(provider_from_config(config)?);

    controller.search(query, 1).await;
    for _ in 1..pages.max(1) {
        if !controller.has_more() {
            break;
        }
        controller.load_more().await;
    }

    let state = controller.state();
    print!("{}", render_state(&state));

    if state.status == SearchStatus::Error {
        bail!(
            "{}",
            state
                .error_message
                .unwrap_or_else(|| "Search failed".to_string())
        );
    }
    Ok(())
}

/// Print the details view for one id.
///
/// # Errors
/// - Catalog provider could not be built or the lookup failed
pub async fn details(id: &str, config: &MarqueeConfig) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let detail = provider.fetch_details(id).await?;
    print!("{}", render_detail(&detail));
    Ok(())
}

/// A line typed in interactive mode.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    /// Query text edit
    Text(String),
    /// Explicit search for the current text
    Go,
    More,
    Retry,
    Clear,
    Open(String),
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return Input::Text(line.to_string());
    };

    let mut parts = command.trim().splitn(2, char::is_whitespace);
    match (parts.next().unwrap_or(""), parts.next().map(str::trim)) {
        ("go" | "g", _) => Input::Go,
        ("more" | "m", _) => Input::More,
        ("retry" | "r", _) => Input::Retry,
        ("clear" | "c", _) => Input::Clear,
        ("open" | "o", Some(id)) if !id.is_empty() => Input::Open(id.to_string()),
        ("help" | "h" | "?", _) => Input::Help,
        ("quit" | "q", _) => Input::Quit,
        (other, _) => Input::Unknown(other.to_string()),
    }
}

const HELP: &str = "\
Type a title to search. After the first search, new text is searched
automatically once you stop typing.
  :go        search the current text
  :more      load the next page
  :retry     repeat the last failed search
  :clear     reset the search
  :open ID   show details for a title
  :quit      leave
";

/// Interactive session: typed text flows through the debouncer, commands
/// drive the controller, and a render task redraws on every state change.
async fn interactive(config: MarqueeConfig) -> anyhow::Result<()> {
    let controller = Arc::new(SearchController::new(provider_from_config(&config)?));
    let (mut debouncer, mut debounced) = QueryDebouncer::new(config.search.debounce_delay);
    let renderer = tokio::spawn(render_updates(controller.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current_text = String::new();
    print!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Text(text) => {
                        current_text = text;
                        if controller.has_searched() {
                            controller.on_query_input(&current_text, &mut debouncer);
                        } else if !current_text.trim().is_empty() {
                            // First query is an explicit search; typing is debounced afterwards
                            let controller = controller.clone();
                            let query = current_text.clone();
                            tokio::spawn(async move { controller.search(&query, 1).await });
                        }
                    }
                    Input::Go => {
                        disarm(&mut debouncer, &mut debounced);
                        let controller = controller.clone();
                        let query = current_text.clone();
                        tokio::spawn(async move { controller.search(&query, 1).await });
                    }
                    Input::More => {
                        let controller = controller.clone();
                        tokio::spawn(async move { controller.load_more().await });
                    }
                    Input::Retry => {
                        let controller = controller.clone();
                        tokio::spawn(async move { controller.retry().await });
                    }
                    Input::Clear => {
                        disarm(&mut debouncer, &mut debounced);
                        current_text.clear();
                        controller.clear();
                    }
                    Input::Open(id) => {
                        let catalog = controller.catalog().clone();
                        tokio::spawn(async move {
                            match catalog.fetch_details(&id).await {
                                Ok(detail) => print!("{}", render_detail(&detail)),
                                Err(e) => println!("Could not load {id}: {}", e.user_message()),
                            }
                        });
                    }
                    Input::Help => print!("{HELP}"),
                    Input::Quit => break,
                    Input::Unknown(command) => println!("Unknown command :{command} (try :help)"),
                }
            }
            Some(request) = debounced.recv() => {
                dispatch_debounced(&controller, request);
            }
        }
    }

    debouncer.cancel();
    renderer.abort();
    Ok(())
}

/// Cancels the pending trigger and discards a request already delivered.
fn disarm(debouncer: &mut QueryDebouncer, debounced: &mut DebouncedRequests) {
    debouncer.cancel();
    while debounced.try_recv().is_ok() {}
}

/// Runs a debounced search unless the session was cleared after it was armed.
fn dispatch_debounced(
    controller: &Arc<SearchController>,
    request: SearchRequest,
) -> Option<JoinHandle<SearchOutcome>> {
    if !controller.has_searched() {
        tracing::debug!("Dropping debounced search for '{}' after clear", request.query);
        return None;
    }

    let controller = controller.clone();
    Some(tokio::spawn(async move {
        controller.search(&request.query, request.page).await
    }))
}

async fn render_updates(mut updates: watch::Receiver<SearchState>) {
    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        print!("{}", render_state(&state));
    }
}

fn render_state(state: &SearchState) -> String {
    let mut out = String::new();
    match state.status {
        SearchStatus::Idle => out.push_str("Ready.\n"),
        SearchStatus::Loading => {
            let _ = writeln!(out, "Searching '{}' (page {})...", state.query, state.page);
        }
        SearchStatus::Empty => {
            let _ = writeln!(out, "No results for '{}'.", state.query);
        }
        SearchStatus::Error => {
            let _ = writeln!(
                out,
                "Error: {} (:retry to try again)",
                state.error_message.as_deref().unwrap_or("Search failed")
            );
        }
        SearchStatus::Success => {
            for (index, movie) in state.results.iter().enumerate() {
                let poster = if movie.has_poster() { "" } else { " (no poster)" };
                let _ = writeln!(
                    out,
                    "{:>4}. {} ({}) [{}] {}{poster}",
                    index + 1,
                    movie.title,
                    movie.year,
                    movie.id,
                    movie.media_type
                );
            }
            let _ = write!(
                out,
                "Showing {} of {} for '{}'",
                state.results.len(),
                state.total_available,
                state.query
            );
            if state.has_more() {
                out.push_str(" (:more for next page)");
            }
            out.push('\n');
        }
    }
    out
}

fn render_detail(detail: &MovieDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", detail.title, detail.year);
    let _ = writeln!(out, "  id:       {}", detail.id);
    let _ = writeln!(out, "  type:     {}", detail.media_type);

    let optional = [
        ("rated", detail.rated.clone()),
        ("released", detail.released.map(|d| d.format("%Y-%m-%d").to_string())),
        ("runtime", detail.runtime.clone()),
        ("genre", detail.genre.clone()),
        ("director", detail.director.clone()),
        ("writer", detail.writer.clone()),
        ("language", detail.language.clone()),
        ("country", detail.country.clone()),
        ("awards", detail.awards.clone()),
        ("rating", detail.imdb_rating.map(|r| format!("{r:.1}/10"))),
        ("votes", detail.imdb_votes.clone()),
        ("box office", detail.box_office.clone()),
        ("poster", detail.poster_url.clone()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = writeln!(out, "  {:<9} {value}", format!("{label}:"));
        }
    }
    if !detail.actors.is_empty() {
        let _ = writeln!(out, "  cast:     {}", detail.actors.join(", "));
    }
    if let Some(ref plot) = detail.plot {
        let _ = writeln!(out, "\n{plot}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use marquee_search::providers::MockCatalog;
    use marquee_search::{MediaType, MovieSummary};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_disarm_discards_delivered_request() {
        let (mut debouncer, mut debounced) = QueryDebouncer::new(Duration::from_millis(500));
        debouncer.notify("heat", 1);
        tokio::time::sleep(Duration::from_millis(600)).await;

        disarm(&mut debouncer, &mut debounced);

        assert!(debounced.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test]
    async fn test_debounced_request_after_clear_is_dropped() {
        let catalog = Arc::new(MockCatalog::new().with_paged_results("heat", 3, 10));
        let controller = Arc::new(SearchController::new(catalog.clone()));
        let request = |query: &str| SearchRequest {
            query: query.to_string(),
            page: 1,
        };

        controller.search("heat", 1).await;
        let handle = dispatch_debounced(&controller, request("heat"));
        let outcome = handle.unwrap().await.unwrap();
        assert_eq!(outcome, SearchOutcome::Completed(SearchStatus::Success));

        controller.clear();
        assert!(dispatch_debounced(&controller, request("heat 2")).is_none());
        assert_eq!(catalog.call_count(), 2);
        assert!(!controller.has_searched());
        assert_eq!(controller.state().status, SearchStatus::Idle);
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("batman"), Input::Text("batman".to_string()));
        assert_eq!(parse_input(":go"), Input::Go);
        assert_eq!(parse_input(":m"), Input::More);
        assert_eq!(parse_input(":open tt0372784"), Input::Open("tt0372784".to_string()));
        assert_eq!(parse_input(":open"), Input::Unknown("open".to_string()));
        assert_eq!(parse_input(":quit\r\n"), Input::Quit);
        assert_eq!(parse_input(":dance"), Input::Unknown("dance".to_string()));
    }

    #[test]
    fn test_render_success_lists_results() {
        let state = SearchState {
            query: "batman".to_string(),
            page: 1,
            results: vec![MovieSummary {
                id: "tt0372784".to_string(),
                poster_url: "N/A".to_string(),
                title: "Batman Begins".to_string(),
                year: "2005".to_string(),
                media_type: MediaType::Movie,
            }],
            total_available: 15,
            status: SearchStatus::Success,
            error_message: None,
        };

        let rendered = render_state(&state);
        assert!(rendered.contains("1. Batman Begins (2005) [tt0372784] movie (no poster)"));
        assert!(rendered.contains("Showing 1 of 15 for 'batman' (:more for next page)"));
    }

    #[test]
    fn test_render_error_offers_retry() {
        let state = SearchState {
            status: SearchStatus::Error,
            error_message: Some("Movie not found!".to_string()),
            ..SearchState::default()
        };
        assert_eq!(
            render_state(&state),
            "Error: Movie not found! (:retry to try again)\n"
        );
    }
}
