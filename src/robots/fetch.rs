//! Fetching robots.txt for an origin

use super::{RuleSet, parse_robots};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

/// Location of the robots file for the origin of `target`
pub fn robots_url(target: &Url) -> Result<Url, url::ParseError> {
    target.join("/robots.txt")
}

/// Fetch and parse the robots file that governs `target`
///
/// A missing file, any non-success status and any transport error all
/// mean "no applicable rules" and yield `None`.
#[instrument(skip(client))]
pub async fn fetch_robots(client: &Client, target: &Url, agent_token: &str) -> Option<RuleSet> {
    let robots_url = match robots_url(target) {
        Ok(url) => url,
        Err(e) => {
            warn!("Cannot derive robots.txt location for {}: {}", target, e);
            return None;
        }
    };

    let response = match client.get(robots_url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch {}: {}", robots_url, e);
            return None;
        }
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!("No robots.txt at {}", robots_url);
        return None;
    }
    if !status.is_success() {
        warn!("Unexpected status {} for {}", status, robots_url);
        return None;
    }

    match response.text().await {
        Ok(body) => Some(parse_robots(&body, agent_token)),
        Err(e) => {
            warn!("Failed to read {}: {}", robots_url, e);
            None
        }
    }
}
