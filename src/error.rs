//! Error types for the agent-permissions crate

use thiserror::Error;

/// Result type for agent-permissions operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent-permissions operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or unsupported target URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Missing or invalid process configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Page crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Policy document error
    #[error("Policy error: {0}")]
    Policy(String),

    /// Policy drafting error
    #[error("Draft error: {0}")]
    Draft(String),
}
