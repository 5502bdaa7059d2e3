//! Single-page crawl: normalize, gate on robots, fetch, extract

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::crawler::content_extraction::extract_page;
use crate::crawler::error::CrawlError;
use crate::crawler::{CrawlLogEntry, CrawlOutcome, CrawlerConfig};
use crate::robots::{RuleSet, is_allowed};

/// Log reason for a page the robots rules disallow
pub const ROBOTS_SKIP_REASON: &str = "skipped: disallowed by robots.txt";

/// Annotation on every fetched page; discovered links are never queued
pub const SNAPSHOT_NOTE: &str = "single-page snapshot, links not followed";

/// Parse `target`, keep only http(s) URLs, and drop the fragment
pub fn normalize_url(target: &str) -> Option<Url> {
    let mut url = Url::parse(target.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Crawl a single page with a client built from `config`
///
/// # Arguments
///
/// * `target` - The URL to snapshot
/// * `rules` - Robots rules for the target's origin, if any were found
/// * `config` - The crawler configuration
///
/// # Returns
///
/// The crawl outcome; expected failures are recorded in its log
pub async fn crawl_page(
    target: &str,
    rules: Option<&RuleSet>,
    config: &CrawlerConfig,
) -> Result<CrawlOutcome, CrawlError> {
    let client = config.http_client()?;
    Ok(crawl_page_with_client(&client, target, rules, config).await)
}

/// Crawl a single page with an existing client
///
/// Fetch errors, extraction faults, non-success statuses and non-HTML
/// responses yield an outcome without pages, noted in its log.
#[instrument(skip(client, rules, config))]
pub async fn crawl_page_with_client(
    client: &Client,
    target: &str,
    rules: Option<&RuleSet>,
    config: &CrawlerConfig,
) -> CrawlOutcome {
    let mut outcome = CrawlOutcome::default();

    let Some(url) = normalize_url(target) else {
        warn!("Refusing to crawl {}: not an http(s) URL", target);
        return outcome;
    };

    if config.respect_robots && !is_allowed(url.path(), rules) {
        info!("Robots rules disallow {}", url);
        outcome.log.push(CrawlLogEntry {
            url: url.to_string(),
            status: None,
            reason: Some(ROBOTS_SKIP_REASON.to_string()),
        });
        return outcome;
    }

    match fetch_html(client, &url, config).await {
        Ok((status, body)) => {
            let mut entry = CrawlLogEntry {
                url: url.to_string(),
                status: Some(status),
                reason: Some(SNAPSHOT_NOTE.to_string()),
            };
            if let Some(html) = body {
                match extract_page(url.as_str(), &html, &config.extract_options()) {
                    Ok(page) => {
                        debug!("Extracted {} words from {}", page.word_count, url);
                        outcome.pages.push(page);
                    }
                    Err(e) => {
                        warn!("Failed to extract {}: {}", url, e);
                        entry.reason = Some(e.to_string());
                    }
                }
            }
            outcome.log.push(entry);
        }
        Err(e) => {
            warn!("Failed to fetch {}: {}", url, e);
            outcome.log.push(CrawlLogEntry {
                url: url.to_string(),
                status: None,
                reason: Some(e.to_string()),
            });
        }
    }

    outcome
}

/// Fetch `url`, returning the status and the body when it is a successful HTML page
async fn fetch_html(
    client: &Client,
    url: &Url,
    config: &CrawlerConfig,
) -> Result<(u16, Option<String>), reqwest::Error> {
    let response = client
        .get(url.clone())
        .header(USER_AGENT, &config.user_agent)
        .header(ACCEPT, &config.accept)
        .send()
        .await?;

    let status = response.status();
    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("html"));

    if !status.is_success() || !is_html {
        debug!("Not extracting {}: status {}, html {}", url, status, is_html);
        return Ok((status.as_u16(), None));
    }

    let body = response.text().await?;
    Ok((status.as_u16(), Some(body)))
}
