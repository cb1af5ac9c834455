//! Marquee Core - Configuration, logging and shared error types
//!
//! This crate holds the pieces every Marquee component needs regardless of
//! which catalog it talks to: environment-driven configuration, tracing
//! installation, and the top-level error type.

pub mod config;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{CatalogConfig, DevelopmentConfig, MarqueeConfig, SearchConfig};
pub use tracing_setup::{CliLogLevel, init_tracing};

/// Errors raised while bootstrapping Marquee.
#[derive(Debug, thiserror::Error)]
pub enum MarqueeError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {reason}")]
    Logging { reason: String },
}

impl MarqueeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            MarqueeError::Configuration { reason } => format!("Invalid configuration: {reason}"),
            MarqueeError::Io(_) => "File system error occurred".to_string(),
            MarqueeError::Logging { .. } => "Could not start logging".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(self, MarqueeError::Configuration { .. })
    }
}
