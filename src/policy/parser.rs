//! Tolerant parsing of policy documents from untrusted JSON
//!
//! Entries that fail the minimal shape checks are dropped silently. The result
//! is meant for explaining a document to a person, not for strict validation.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::PolicyError;
use super::schema::{Directive, Verb};

/// A resource rule that passed the shape check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRule {
    /// Verb token; may be outside the known vocabulary
    pub verb: String,
    pub selector: String,
    pub allowed: bool,
    /// Passed through without validation
    pub modifiers: Option<Value>,
}

/// An action guideline that passed the shape check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedGuideline {
    /// Directive token; may be outside the known vocabulary
    pub directive: String,
    pub description: String,
    pub exceptions: Option<String>,
}

/// Best-effort view of a policy document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedPolicy {
    pub metadata: Option<Map<String, Value>>,
    pub resource_rules: Vec<ParsedRule>,
    pub action_guidelines: Vec<ParsedGuideline>,
}

/// Parse a policy document from raw JSON text
///
/// Fails only when the text is not JSON at all.
pub fn parse_policy(raw: &str) -> Result<ParsedPolicy, PolicyError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(parse_policy_value(&value))
}

/// Filter an already-decoded JSON value into a policy
///
/// Non-object input yields an empty policy.
pub fn parse_policy_value(value: &Value) -> ParsedPolicy {
    let metadata = value.get("metadata").and_then(Value::as_object).cloned();

    let resource_rules: Vec<ParsedRule> = entries(value, "resource_rules")
        .filter_map(parse_rule)
        .collect();
    let action_guidelines: Vec<ParsedGuideline> = entries(value, "action_guidelines")
        .filter_map(parse_guideline)
        .collect();

    debug!(
        "Parsed policy with {} rules and {} guidelines",
        resource_rules.len(),
        action_guidelines.len()
    );

    ParsedPolicy {
        metadata,
        resource_rules,
        action_guidelines,
    }
}

/// Read a policy file from disk and parse it
pub async fn read_policy_file(path: &Path) -> Result<ParsedPolicy, PolicyError> {
    let raw = tokio::fs::read_to_string(path).await?;
    parse_policy(&raw)
}

fn entries<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn parse_rule(entry: &Value) -> Option<ParsedRule> {
    let entry = entry.as_object()?;
    Some(ParsedRule {
        verb: entry.get("verb")?.as_str()?.to_string(),
        selector: entry.get("selector")?.as_str()?.to_string(),
        allowed: entry.get("allowed")?.as_bool()?,
        modifiers: entry.get("modifiers").filter(|m| !m.is_null()).cloned(),
    })
}

fn parse_guideline(entry: &Value) -> Option<ParsedGuideline> {
    let entry = entry.as_object()?;
    Some(ParsedGuideline {
        directive: entry.get("directive")?.as_str()?.to_string(),
        description: entry.get("description")?.as_str()?.to_string(),
        exceptions: entry
            .get("exceptions")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

impl ParsedRule {
    /// The verb, if it belongs to the known vocabulary
    pub fn known_verb(&self) -> Option<Verb> {
        Verb::from_token(&self.verb)
    }

    /// Label, selector and recognizable modifiers, without the verdict
    pub fn describe(&self) -> String {
        let label = self
            .known_verb()
            .map(|verb| verb.label().to_string())
            .unwrap_or_else(|| self.verb.clone());
        let mut text = format!("{} on `{}`", label, self.selector);

        let notes = self.modifier_notes();
        if !notes.is_empty() {
            text.push_str(&format!(" ({})", notes.join("; ")));
        }
        text
    }

    fn modifier_notes(&self) -> Vec<String> {
        let Some(modifiers) = self.modifiers.as_ref().and_then(Value::as_object) else {
            return Vec::new();
        };

        let mut notes = Vec::new();
        if let Some(rate_limit) = modifiers.get("rate_limit") {
            let max = rate_limit.get("max_requests").and_then(Value::as_f64);
            let window = rate_limit.get("window_seconds").and_then(Value::as_f64);
            if let (Some(max), Some(window)) = (max, window) {
                notes.push(format!("at most {} requests per {} s", max, window));
            }
        }
        if modifiers.get("human_in_the_loop").and_then(Value::as_bool) == Some(true) {
            notes.push("requires human approval".to_string());
        }
        if let Some(burst) = modifiers.get("burst").and_then(Value::as_f64) {
            notes.push(format!("burst of {}", burst));
        }
        if let Some(window) = modifiers.get("time_window").and_then(Value::as_str) {
            notes.push(format!("only during {}", window));
        }
        notes
    }
}

impl ParsedGuideline {
    /// The directive, if it belongs to the known vocabulary
    pub fn known_directive(&self) -> Option<Directive> {
        Directive::from_token(&self.directive)
    }

    /// `DIRECTIVE: description (exceptions: ...)`
    pub fn describe(&self) -> String {
        match &self.exceptions {
            Some(exceptions) => format!(
                "{}: {} (exceptions: {})",
                self.directive, self.description, exceptions
            ),
            None => format!("{}: {}", self.directive, self.description),
        }
    }
}

impl ParsedPolicy {
    /// True when no rule or guideline survived filtering
    pub fn is_empty(&self) -> bool {
        self.resource_rules.is_empty() && self.action_guidelines.is_empty()
    }

    /// Plain-text explanation, one line per rule and guideline
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        if let Some(author) = self
            .metadata
            .as_ref()
            .and_then(|m| m.get("author"))
            .and_then(Value::as_str)
        {
            lines.push(format!("Policy for {}", author));
        }

        for rule in &self.resource_rules {
            let verdict = if rule.allowed { "Allowed" } else { "Blocked" };
            lines.push(format!("{}: {}", verdict, rule.describe()));
        }
        for guideline in &self.action_guidelines {
            lines.push(guideline.describe());
        }

        if lines.is_empty() {
            return "No recognizable rules or guidelines.".to_string();
        }
        lines.join("\n")
    }
}
