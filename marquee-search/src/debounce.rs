//! Debounced search triggering.
//!
//! Typing produces a burst of query changes; only the last one should reach
//! the catalog, and only once input has been quiet for the debounce window.
//! The pending timer is an owned task handle, so tearing down the view is a
//! single `cancel()` (or drop).

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Query and page waiting to be searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Query text as last notified
    pub query: String,
    /// Page to fetch, 1-indexed
    pub page: u32,
}

/// Receiving end for requests whose quiescence window elapsed.
pub type DebouncedRequests = mpsc::UnboundedReceiver<SearchRequest>;

/// Delays search triggers until input has been stable for a fixed window.
///
/// The debouncer does not inspect queries; blank-query filtering is the
/// caller's job. Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct QueryDebouncer {
    delay: Duration,
    sender: mpsc::UnboundedSender<SearchRequest>,
    pending: Option<JoinHandle<()>>,
}

impl QueryDebouncer {
    /// Creates a debouncer and the channel its deliveries arrive on.
    pub fn new(delay: Duration) -> (Self, DebouncedRequests) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            sender,
            pending: None,
        };
        (debouncer, receiver)
    }

    /// Records the latest `(query, page)` and restarts the window.
    ///
    /// A previously pending request is discarded.
    pub fn notify(&mut self, query: impl Into<String>, page: u32) {
        let request = SearchRequest {
            query: query.into(),
            page,
        };
        self.arm(request, self.delay);
    }

    /// Schedules `request` for delivery after `delay`, replacing any pending one.
    pub fn arm(&mut self, request: SearchRequest, delay: Duration) {
        self.cancel();

        tracing::trace!(
            "Debounce armed for '{}' page {} ({:?})",
            request.query,
            request.page,
            delay
        );

        let sender = self.sender.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!("Debounce window elapsed for '{}'", request.query);
            // Receiver gone means the view was torn down
            let _ = sender.send(request);
        }));
    }

    /// Drops the pending request without delivering it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                tracing::trace!("Debounce cancelled");
            }
            handle.abort();
        }
    }

    /// Whether a request is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
