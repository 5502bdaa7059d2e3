//! # Policy Document Module
//!
//! This module defines the agent access-policy document and the two pure
//! functions around it: building a document from a few owner-facing toggles,
//! and parsing arbitrary JSON into a best-effort, explainable policy.
//!
//! ## Key Components
//!
//! - `PolicyDocument`: The canonical schema (metadata, resource rules, guidelines)
//! - `Verb` / `Directive`: Closed vocabularies with serialized tokens and labels
//! - `build_policy`: Toggles to document; always round-trips through the parser
//! - `parse_policy`: Untrusted JSON to `ParsedPolicy`, dropping malformed entries
//! - `fetch_existing_policy`: Looks for a policy the site already publishes

mod builder;
mod error;
mod parser;
mod schema;
mod well_known;

pub use builder::{PolicyConfig, RateLimitPreset, build_policy, build_policy_at};
pub use error::PolicyError;
pub use parser::{
    ParsedGuideline, ParsedPolicy, ParsedRule, parse_policy, parse_policy_value, read_policy_file,
};
pub use schema::{
    ActionGuideline, Directive, Modifiers, PolicyDocument, PolicyMetadata, RateLimit, ResourceRule,
    SCHEMA_VERSION, Verb,
};
pub use well_known::{ExistingPolicy, WELL_KNOWN_PATH, fetch_existing_policy, well_known_url};

/// JSON Schema describing [`PolicyDocument`]
pub fn policy_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(PolicyDocument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_vocabulary() {
        let schema = serde_json::to_string(&policy_json_schema()).unwrap();

        assert!(schema.contains("resource_rules"));
        assert!(schema.contains("copy_to_clipboard"));
        assert!(schema.contains("MUST NOT"));
    }
}
