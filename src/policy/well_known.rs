//! Lookup of a policy a site already publishes

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::PolicyError;
use super::parser::{ParsedPolicy, parse_policy, parse_policy_value};

/// Path of a published policy, relative to the origin
pub const WELL_KNOWN_PATH: &str = "/.well-known/agent-permissions.json";

/// A policy found at the well-known location
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum ExistingPolicy {
    /// The body decoded as JSON
    Json(Value),
    /// The body was not valid JSON
    Raw(String),
}

impl ExistingPolicy {
    /// Parse the published policy; raw text yields the JSON error
    pub fn parse(&self) -> Result<ParsedPolicy, PolicyError> {
        match self {
            ExistingPolicy::Json(value) => Ok(parse_policy_value(value)),
            ExistingPolicy::Raw(text) => parse_policy(text),
        }
    }

    /// The body as text, pretty-printed when it is JSON
    pub fn to_text(&self) -> String {
        match self {
            ExistingPolicy::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ExistingPolicy::Raw(text) => text.clone(),
        }
    }
}

/// Well-known policy location for the origin of `target`
pub fn well_known_url(target: &Url) -> Result<Url, url::ParseError> {
    target.join(WELL_KNOWN_PATH)
}

/// Fetch the policy the site publishes, if any
///
/// A 404, any other non-success status and transport errors all yield `None`.
#[instrument(skip(client))]
pub async fn fetch_existing_policy(client: &Client, target: &Url) -> Option<ExistingPolicy> {
    let url = match well_known_url(target) {
        Ok(url) => url,
        Err(e) => {
            warn!("Cannot derive policy location for {}: {}", target, e);
            return None;
        }
    };

    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch {}: {}", url, e);
            return None;
        }
    };

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!("No published policy at {}", url);
        return None;
    }
    if !status.is_success() {
        warn!("Unexpected status {} for {}", status, url);
        return None;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read {}: {}", url, e);
            return None;
        }
    };

    Some(match serde_json::from_str(&body) {
        Ok(value) => ExistingPolicy::Json(value),
        Err(_) => ExistingPolicy::Raw(body),
    })
}
