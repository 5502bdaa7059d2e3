//! Canonical policy document schema
//!
//! Field names and enum spellings here are the serialized format and must not
//! change without bumping [`SCHEMA_VERSION`].

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Version written into `metadata.schema_version`
pub const SCHEMA_VERSION: &str = "1.0";

/// Actions an agent may take on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    ReadContent,
    ReadMetadata,
    FollowLink,
    ClickElement,
    ScrollPage,
    SetInputValue,
    SubmitForm,
    ExecuteScript,
    PlayMedia,
    PauseMedia,
    MuteMedia,
    UnmuteMedia,
    UploadFile,
    DownloadFile,
    CopyToClipboard,
}

impl Verb {
    /// Every verb, in schema order
    pub const ALL: [Verb; 15] = [
        Verb::ReadContent,
        Verb::ReadMetadata,
        Verb::FollowLink,
        Verb::ClickElement,
        Verb::ScrollPage,
        Verb::SetInputValue,
        Verb::SubmitForm,
        Verb::ExecuteScript,
        Verb::PlayMedia,
        Verb::PauseMedia,
        Verb::MuteMedia,
        Verb::UnmuteMedia,
        Verb::UploadFile,
        Verb::DownloadFile,
        Verb::CopyToClipboard,
    ];

    /// Serialized token
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::ReadContent => "read_content",
            Verb::ReadMetadata => "read_metadata",
            Verb::FollowLink => "follow_link",
            Verb::ClickElement => "click_element",
            Verb::ScrollPage => "scroll_page",
            Verb::SetInputValue => "set_input_value",
            Verb::SubmitForm => "submit_form",
            Verb::ExecuteScript => "execute_script",
            Verb::PlayMedia => "play_media",
            Verb::PauseMedia => "pause_media",
            Verb::MuteMedia => "mute_media",
            Verb::UnmuteMedia => "unmute_media",
            Verb::UploadFile => "upload_file",
            Verb::DownloadFile => "download_file",
            Verb::CopyToClipboard => "copy_to_clipboard",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Verb::ReadContent => "Read page content",
            Verb::ReadMetadata => "Read page metadata",
            Verb::FollowLink => "Follow links",
            Verb::ClickElement => "Click elements",
            Verb::ScrollPage => "Scroll the page",
            Verb::SetInputValue => "Fill in form fields",
            Verb::SubmitForm => "Submit forms",
            Verb::ExecuteScript => "Execute scripts",
            Verb::PlayMedia => "Play media",
            Verb::PauseMedia => "Pause media",
            Verb::MuteMedia => "Mute media",
            Verb::UnmuteMedia => "Unmute media",
            Verb::UploadFile => "Upload files",
            Verb::DownloadFile => "Download files",
            Verb::CopyToClipboard => "Copy to clipboard",
        }
    }

    /// Look up a serialized token
    pub fn from_token(token: &str) -> Option<Verb> {
        Verb::ALL.into_iter().find(|verb| verb.as_str() == token)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of an action guideline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Directive {
    #[serde(rename = "MUST NOT")]
    MustNot,
    #[serde(rename = "MUST")]
    Must,
    #[serde(rename = "SHOULD")]
    Should,
    #[serde(rename = "SHOULD NOT")]
    ShouldNot,
}

impl Directive {
    /// Serialized token
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::MustNot => "MUST NOT",
            Directive::Must => "MUST",
            Directive::Should => "SHOULD",
            Directive::ShouldNot => "SHOULD NOT",
        }
    }

    /// Look up a serialized token
    pub fn from_token(token: &str) -> Option<Directive> {
        [
            Directive::MustNot,
            Directive::Must,
            Directive::Should,
            Directive::ShouldNot,
        ]
        .into_iter()
        .find(|directive| directive.as_str() == token)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyMetadata {
    pub schema_version: String,

    pub last_updated: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Request budget over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window_seconds: u32,
}

/// Optional constraints on a resource rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Modifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_in_the_loop: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,
}

/// Permission for one verb on one selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResourceRule {
    pub verb: Verb,

    /// Opaque, CSS-like matcher; interpreted by agents only
    pub selector: String,

    pub allowed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
}

/// Free-form behavioral instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionGuideline {
    pub directive: Directive,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<String>,
}

/// An agent access-policy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocument {
    pub metadata: PolicyMetadata,

    pub resource_rules: Vec<ResourceRule>,

    pub action_guidelines: Vec<ActionGuideline>,
}

impl PolicyDocument {
    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
