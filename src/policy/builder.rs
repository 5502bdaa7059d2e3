//! Building a policy document from a handful of toggles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schema::{
    ActionGuideline, Directive, Modifiers, PolicyDocument, PolicyMetadata, RateLimit, ResourceRule,
    SCHEMA_VERSION, Verb,
};

/// Fixed selector for each verb the builder emits, in output order
const RULE_TEMPLATES: [(Verb, &str); 8] = [
    (Verb::ReadContent, "body"),
    (Verb::ReadMetadata, "head"),
    (Verb::FollowLink, "a[href]"),
    (Verb::SetInputValue, "input, textarea, select"),
    (Verb::SubmitForm, "form"),
    (Verb::DownloadFile, "a[download]"),
    (Verb::ExecuteScript, "*"),
    (Verb::UploadFile, "input[type=\"file\"]"),
];

const BLOCK_LOGIN_GUIDELINE: &str = "Submit login credentials or session tokens on this site";

/// How hard agents may hit the site when navigating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitPreset {
    /// One request per second
    Gentle,
    /// Five requests per ten seconds
    #[default]
    Standard,
    /// No rate limit
    Open,
}

impl RateLimitPreset {
    /// The rate limit modifier for this preset, if any
    pub fn rate_limit(&self) -> Option<RateLimit> {
        match self {
            RateLimitPreset::Gentle => Some(RateLimit {
                max_requests: 1,
                window_seconds: 1,
            }),
            RateLimitPreset::Standard => Some(RateLimit {
                max_requests: 5,
                window_seconds: 10,
            }),
            RateLimitPreset::Open => None,
        }
    }
}

/// Toggles a site owner picks to derive a policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Written to `metadata.author` when non-empty
    pub site_name: Option<String>,
    pub allow_read_content: bool,
    pub allow_read_metadata: bool,
    pub allow_navigation: bool,
    pub allow_forms: bool,
    pub allow_downloads: bool,
    /// Only meaningful when forms are allowed
    pub require_human_for_forms: bool,
    pub rate_limit: RateLimitPreset,
    pub block_login: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            site_name: None,
            allow_read_content: true,
            allow_read_metadata: true,
            allow_navigation: true,
            allow_forms: false,
            allow_downloads: false,
            require_human_for_forms: true,
            rate_limit: RateLimitPreset::Standard,
            block_login: true,
        }
    }
}

/// Build a policy document stamped with the current time
pub fn build_policy(config: &PolicyConfig) -> PolicyDocument {
    build_policy_at(config, Utc::now())
}

/// Build a policy document stamped with `now`
///
/// Script execution and file upload are always emitted as disallowed.
pub fn build_policy_at(config: &PolicyConfig, now: DateTime<Utc>) -> PolicyDocument {
    let author = config
        .site_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let navigation_modifiers = if config.allow_navigation {
        config.rate_limit.rate_limit().map(|rate_limit| Modifiers {
            rate_limit: Some(rate_limit),
            ..Default::default()
        })
    } else {
        None
    };

    let form_modifiers = if config.allow_forms && config.require_human_for_forms {
        Some(Modifiers {
            human_in_the_loop: Some(true),
            ..Default::default()
        })
    } else {
        None
    };

    let resource_rules = RULE_TEMPLATES
        .iter()
        .map(|&(verb, selector)| {
            let (allowed, modifiers) = match verb {
                Verb::ReadContent => (config.allow_read_content, None),
                Verb::ReadMetadata => (config.allow_read_metadata, None),
                Verb::FollowLink => (config.allow_navigation, navigation_modifiers.clone()),
                Verb::SetInputValue | Verb::SubmitForm => {
                    (config.allow_forms, form_modifiers.clone())
                }
                Verb::DownloadFile => (config.allow_downloads, None),
                // Script execution, upload and anything else stay disallowed
                _ => (false, None),
            };
            ResourceRule {
                verb,
                selector: selector.to_string(),
                allowed,
                modifiers,
            }
        })
        .collect();

    let mut action_guidelines = Vec::new();
    if config.block_login {
        action_guidelines.push(ActionGuideline {
            directive: Directive::MustNot,
            description: BLOCK_LOGIN_GUIDELINE.to_string(),
            exceptions: None,
        });
    }

    PolicyDocument {
        metadata: PolicyMetadata {
            schema_version: SCHEMA_VERSION.to_string(),
            last_updated: now,
            author,
        },
        resource_rules,
        action_guidelines,
    }
}
