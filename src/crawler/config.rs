//! # Crawler Configuration Module
//!
//! This module provides configuration options for the page snapshot crawler:
//! the identity it presents, the robots gate, and the size ceilings applied to
//! extracted content. It uses a builder pattern for flexible configuration.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The main configuration struct with crawler parameters
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration
//! - `ExtractOptions`: The truncation ceilings used by extraction

use std::time::Duration;

use reqwest::Client;

use crate::crawler::error::CrawlError;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Product token matched against robots `User-agent` lines
    pub robots_agent_token: String,

    /// Accept header for page requests
    pub accept: String,

    /// Maximum characters of body markup kept
    pub max_html_chars: usize,

    /// Maximum characters of body text kept
    pub max_text_chars: usize,

    /// Whether to honor robots.txt
    pub respect_robots: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "agent-permissions/{} (+single-page policy snapshot)",
                env!("CARGO_PKG_VERSION")
            ),
            robots_agent_token: "agent-permissions".to_string(),
            accept: "text/html,application/xhtml+xml;q=0.9,*/*;q=0.1".to_string(),
            max_html_chars: 20_000,
            max_text_chars: 8_000,
            respect_robots: true,
            timeout_secs: 20,
        }
    }
}

/// Truncation ceilings for page extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Maximum characters of body markup kept
    pub max_html_chars: usize,

    /// Maximum characters of body text kept
    pub max_text_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        CrawlerConfig::default().extract_options()
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the token matched against robots user-agent lines
    pub fn robots_agent_token(mut self, token: impl Into<String>) -> Self {
        self.config.robots_agent_token = token.into();
        self
    }

    /// Set the maximum characters of markup to keep
    pub fn max_html_chars(mut self, max_html_chars: usize) -> Self {
        self.config.max_html_chars = max_html_chars;
        self
    }

    /// Set the maximum characters of text to keep
    pub fn max_text_chars(mut self, max_text_chars: usize) -> Self {
        self.config.max_text_chars = max_text_chars;
        self
    }

    /// Set whether to respect robots.txt
    pub fn respect_robots(mut self, respect_robots: bool) -> Self {
        self.config.respect_robots = respect_robots;
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Truncation ceilings for extraction
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_html_chars: self.max_html_chars,
            max_text_chars: self.max_text_chars,
        }
    }

    /// Build an HTTP client presenting this configuration's identity
    pub fn http_client(&self) -> Result<Client, CrawlError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout())
            .build()
            .map_err(CrawlError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CrawlerConfig::default();

        assert!(config.respect_robots);
        assert!(config.user_agent.starts_with("agent-permissions/"));
        assert!(config.accept.starts_with("text/html"));
        assert_eq!(config.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_builder_overrides() {
        let config = CrawlerConfig::builder()
            .user_agent("test-bot/1.0")
            .robots_agent_token("test-bot")
            .max_html_chars(100)
            .max_text_chars(50)
            .respect_robots(false)
            .timeout_secs(3)
            .build();

        assert_eq!(config.user_agent, "test-bot/1.0");
        assert_eq!(config.robots_agent_token, "test-bot");
        assert!(!config.respect_robots);
        assert_eq!(
            config.extract_options(),
            ExtractOptions {
                max_html_chars: 100,
                max_text_chars: 50
            }
        );
        assert!(config.http_client().is_ok());
    }
}
