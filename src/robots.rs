//! # Robots Directive Module
//!
//! This module turns a site's `robots.txt` into a [`RuleSet`] for one agent
//! identity and answers allow/deny questions for request paths. It is the gate
//! the crawler consults before fetching a page.
//!
//! ## Key Components
//!
//! - `RuleSet`: The allow/disallow patterns and crawl delay that apply to us
//! - `parse_robots`: Block-scoped parser for raw directive text
//! - `is_allowed` / `matches_rule`: Allow-priority, first-match path checks
//! - `fetch_robots`: Fetches `/robots.txt` for an origin, mapping any failure to `None`

mod fetch;
mod matcher;
mod parser;

pub use fetch::{fetch_robots, robots_url};
pub use matcher::{is_allowed, matches_rule};
pub use parser::parse_robots;

use serde::{Deserialize, Serialize};

/// Rules from one robots file that apply to the configured agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Disallow patterns in file order
    pub disallow: Vec<String>,

    /// Allow patterns in file order
    pub allow: Vec<String>,

    /// Requested delay between requests, in seconds
    pub crawl_delay: Option<f64>,
}

impl RuleSet {
    /// True when no directive applied to the agent
    pub fn is_empty(&self) -> bool {
        self.disallow.is_empty() && self.allow.is_empty() && self.crawl_delay.is_none()
    }

    /// Check a path against this rule set
    pub fn allows(&self, path: &str) -> bool {
        is_allowed(path, Some(self))
    }
}
