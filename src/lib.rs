//! # agent-permissions - Access Policies for Autonomous Agents
//!
//! This crate drafts an access-policy document that tells autonomous agents
//! what they may do on a website. It inspects the site's `robots.txt` and a
//! sanitized snapshot of its landing page, and hands a structured summary to
//! a language model.
//!
//! ## Features
//!
//! - Robots rule engine: block-scoped parsing and allow-priority path checks
//! - Single-page snapshot crawler gated by robots rules, with sanitizing,
//!   truncation and form/search/login heuristics
//! - Canonical policy schema with a toggle-driven builder and a tolerant parser
//! - Lookup of policies published at `/.well-known/agent-permissions.json`
//! - Rate-limited model client and a drafting agent built on `rig`
//!
//! ## Example
//!
//! ```rust
//! use agent_permissions::policy::{build_policy, parse_policy, PolicyConfig};
//! use agent_permissions::robots::parse_robots;
//!
//! let rules = parse_robots("User-agent: *\nDisallow: /admin", "agent-permissions");
//! assert!(!rules.allows("/admin/users"));
//!
//! let document = build_policy(&PolicyConfig::default());
//! let parsed = parse_policy(&document.to_json_pretty().unwrap()).unwrap();
//! assert_eq!(parsed.resource_rules.len(), document.resource_rules.len());
//! ```

mod error;

pub mod analysis;
pub mod crawler;
pub mod drafter;
pub mod model;
pub mod policy;
pub mod robots;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::analysis::{SiteAnalysis, analyze_site};
    pub use crate::crawler::{CrawlOutcome, CrawlerConfig, PageSummary, crawl_page};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::policy::{ParsedPolicy, PolicyConfig, PolicyDocument, build_policy, parse_policy};
    pub use crate::robots::{RuleSet, is_allowed, parse_robots};
}
