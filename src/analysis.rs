//! Site analysis: robots rules, published policy and a landing-page snapshot
//!
//! The robots fetch and the published-policy lookup run concurrently; the page
//! crawl waits for the robots result because it is gated on it.

use serde::Serialize;
use tracing::{info, instrument};
use url::Url;

use crate::crawler::{CrawlOutcome, CrawlerConfig, crawl_page_with_client, normalize_url};
use crate::error::{Error, Result};
use crate::policy::{ExistingPolicy, fetch_existing_policy};
use crate::robots::{RuleSet, fetch_robots};

/// Everything gathered about a site before drafting a policy
#[derive(Debug, Clone, Serialize)]
pub struct SiteAnalysis {
    /// Normalized target URL
    pub target: Url,

    /// Robots rules for our agent; `None` when the site has no robots file
    pub rules: Option<RuleSet>,

    /// Policy already published at the well-known location
    pub existing_policy: Option<ExistingPolicy>,

    /// Snapshot of the target page
    pub crawl: CrawlOutcome,
}

/// Gather robots rules, any published policy and a page snapshot for `target`
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when `target` is not an http(s) URL.
#[instrument(skip(config))]
pub async fn analyze_site(target: &str, config: &CrawlerConfig) -> Result<SiteAnalysis> {
    let url = normalize_url(target)
        .ok_or_else(|| Error::InvalidUrl(format!("'{}' is not an http(s) URL", target)))?;
    let client = config.http_client()?;

    let (rules, existing_policy) = futures::join!(
        fetch_robots(&client, &url, &config.robots_agent_token),
        fetch_existing_policy(&client, &url),
    );
    info!(
        "Robots rules {}, published policy {}",
        if rules.is_some() { "found" } else { "absent" },
        if existing_policy.is_some() { "found" } else { "absent" }
    );

    let crawl = crawl_page_with_client(&client, url.as_str(), rules.as_ref(), config).await;

    Ok(SiteAnalysis {
        target: url,
        rules,
        existing_policy,
        crawl,
    })
}
