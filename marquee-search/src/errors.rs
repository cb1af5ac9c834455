//! Error types for catalog fetches.

use thiserror::Error;

/// Errors that can occur while talking to the movie catalog.
///
/// Blank queries are not represented here: the controller skips them without
/// producing an error, and a successful response with zero titles is a normal
/// empty result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Network communication failed before a response was received.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// The response body could not be decoded.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },

    /// The catalog answered but reported a logical failure.
    #[error("Provider error: {reason}")]
    ProviderError {
        /// Message reported by the catalog, e.g. "Movie not found!"
        reason: String,
    },

    /// The request could not be built from the given input.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected before being sent
        reason: String,
    },
}

impl FetchError {
    /// Returns the message shown to the user next to the retry affordance.
    ///
    /// Catalog-reported failures are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::ProviderError { reason } => reason.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::ParseError {
                reason: error.to_string(),
            }
        } else {
            FetchError::NetworkError {
                reason: error.to_string(),
            }
        }
    }
}
