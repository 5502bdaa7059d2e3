//! # Page Snapshot Module
//!
//! This module fetches a single page of a website, gated by its robots rules,
//! and reduces it to a sanitized [`PageSummary`] that is safe to hand to a
//! language model. It never follows links: one call produces at most one page.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: User agent, size ceilings, robots gate and timeout
//! - `PageSummary`: Sanitized, truncated page content plus classification flags
//! - `CrawlLogEntry`: One diagnostic line per attempted fetch
//! - `crawl_page`: Normalize, gate, fetch and extract
//! - `extract_page`: Pure HTML-to-summary extraction
//!
//! ## Features
//!
//! - Script, style and noscript content is stripped before anything is read
//! - Character-based truncation with an explicit marker and truncation flags
//! - Heuristic detection of forms, search boxes and login pages
//! - Expected failures become log entries instead of errors

mod config;
mod content_extraction;
mod error;
mod snapshot;

pub use config::{CrawlerConfig, CrawlerConfigBuilder, ExtractOptions};
pub use content_extraction::{TRUNCATION_MARKER, extract_page};
pub use error::CrawlError;
pub use snapshot::{
    ROBOTS_SKIP_REASON, SNAPSHOT_NOTE, crawl_page, crawl_page_with_client, normalize_url,
};

use serde::{Deserialize, Serialize};

/// A sanitized snapshot of one HTML page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    /// URL of the page
    pub url: String,

    /// Trimmed text of the first `<title>`, if non-empty
    pub title: Option<String>,

    /// Whitespace-collapsed body text, possibly truncated
    pub text_content: String,

    /// Inner markup of `<body>`, possibly truncated
    pub html_content: String,

    /// Whether `text_content` was cut
    pub is_text_truncated: bool,

    /// Whether `html_content` was cut
    pub is_html_truncated: bool,

    /// Word count of the untruncated text
    pub word_count: usize,

    /// Page contains at least one form
    pub has_forms: bool,

    /// A form contains a search input
    pub has_search: bool,

    /// Page looks like it offers a login
    pub contains_login: bool,
}

/// Diagnostic record for one attempted page fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlLogEntry {
    /// URL that was attempted
    pub url: String,

    /// Final HTTP status, when a response was received
    pub status: Option<u16>,

    /// Why the page was skipped or what happened
    pub reason: Option<String>,
}

/// Pages and diagnostics from a single crawl invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// Zero or one extracted page
    pub pages: Vec<PageSummary>,

    /// One entry per attempted fetch
    pub log: Vec<CrawlLogEntry>,
}

impl CrawlOutcome {
    /// The extracted page, if the crawl produced one
    pub fn page(&self) -> Option<&PageSummary> {
        self.pages.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_page_accessor() {
        let mut outcome = CrawlOutcome::default();
        assert!(outcome.page().is_none());

        outcome.pages.push(PageSummary {
            url: "https://example.com/".to_string(),
            title: Some("Example".to_string()),
            text_content: "Hello".to_string(),
            html_content: "<p>Hello</p>".to_string(),
            is_text_truncated: false,
            is_html_truncated: false,
            word_count: 1,
            has_forms: false,
            has_search: false,
            contains_login: false,
        });

        assert_eq!(outcome.page().unwrap().title.as_deref(), Some("Example"));
    }
}
