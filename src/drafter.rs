//! Drafting a policy with a language model
//!
//! The model only ever sees sanitized page content: the summary produced by the
//! crawler, never the raw response body.

use rig::agent::{Agent, AgentBuilder};
use rig::completion::{CompletionModel, Prompt};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::analysis::SiteAnalysis;
use crate::crawler::{CrawlLogEntry, PageSummary};
use crate::error::Error as CrateError;
use crate::policy::{
    ParsedPolicy, PolicyConfig, PolicyDocument, PolicyError, build_policy, parse_policy,
};
use crate::robots::RuleSet;

/// System instructions for the drafting agent
pub const PREAMBLE: &str = "You write agent access-policy documents for websites. \
Answer with a single JSON object and nothing else. The object has three keys: \
\"metadata\" (schema_version, last_updated, optional author), \
\"resource_rules\" (objects with verb, selector, allowed and optional modifiers) and \
\"action_guidelines\" (objects with directive, description and optional exceptions). \
Verbs are read_content, read_metadata, follow_link, click_element, scroll_page, \
set_input_value, submit_form, execute_script, play_media, pause_media, mute_media, \
unmute_media, upload_file, download_file and copy_to_clipboard. \
Directives are \"MUST NOT\", \"MUST\", \"SHOULD\" and \"SHOULD NOT\". \
Start from the baseline policy, keep execute_script and upload_file disallowed, \
and tailor selectors and guidelines to the page snapshot and robots rules.";

/// Error type for drafting
#[derive(Debug, Error)]
pub enum DraftError {
    /// The model call failed
    #[error("Model error: {0}")]
    Model(String),

    /// The model answered with something that is not a policy
    #[error("Model output is not a policy: {0}")]
    InvalidOutput(#[from] PolicyError),
}

impl From<DraftError> for CrateError {
    fn from(err: DraftError) -> Self {
        CrateError::Draft(err.to_string())
    }
}

/// A model-drafted policy
#[derive(Debug, Clone)]
pub struct Draft {
    /// The model's answer with code fences removed
    pub raw: String,

    /// The answer parsed with the tolerant policy parser
    pub policy: ParsedPolicy,
}

/// Drafts policies from site analyses
pub struct PolicyDrafter<M: CompletionModel> {
    agent: Agent<M>,
}

impl<M: CompletionModel> PolicyDrafter<M> {
    pub fn new(model: M) -> Self {
        Self {
            agent: AgentBuilder::new(model).preamble(PREAMBLE).build(),
        }
    }

    /// Ask the model for a policy tailored to `analysis`
    #[instrument(skip_all, fields(target = %analysis.target))]
    pub async fn draft(
        &self,
        analysis: &SiteAnalysis,
        baseline: &PolicyConfig,
    ) -> Result<Draft, DraftError> {
        let prompt = render_site_context(analysis, &build_policy(baseline));
        debug!("Prompt is {} characters", prompt.len());

        let answer = self
            .agent
            .prompt(prompt)
            .await
            .map_err(|e| DraftError::Model(e.to_string()))?;

        let raw = strip_code_fences(&answer).to_string();
        let policy = parse_policy(&raw)?;
        info!(
            "Drafted {} rules and {} guidelines",
            policy.resource_rules.len(),
            policy.action_guidelines.len()
        );

        Ok(Draft { raw, policy })
    }
}

/// Render everything the model needs as plain text sections
pub fn render_site_context(analysis: &SiteAnalysis, baseline: &PolicyDocument) -> String {
    let mut sections = vec![format!("## Target\n{}", analysis.target)];

    sections.push(format!(
        "## Robots rules\n{}",
        render_rules(analysis.rules.as_ref())
    ));

    sections.push(format!(
        "## Published policy\n{}",
        analysis
            .existing_policy
            .as_ref()
            .map(|policy| policy.to_text())
            .unwrap_or_else(|| "None published.".to_string())
    ));

    sections.push(format!("## Crawl log\n{}", render_log(&analysis.crawl.log)));

    sections.push(match analysis.crawl.page() {
        Some(page) => render_page(page),
        None => "## Page snapshot\nNo page content could be retrieved.".to_string(),
    });

    let baseline_json =
        serde_json::to_string_pretty(baseline).unwrap_or_else(|e| format!("unavailable: {}", e));
    sections.push(format!("## Baseline policy\n{}", baseline_json));

    sections.join("\n\n")
}

fn render_rules(rules: Option<&RuleSet>) -> String {
    let Some(rules) = rules else {
        return "No robots.txt found; no restrictions apply.".to_string();
    };
    if rules.is_empty() {
        return "robots.txt has no directives for this agent.".to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    lines.extend(rules.allow.iter().map(|p| format!("Allow: {}", p)));
    lines.extend(rules.disallow.iter().map(|p| format!("Disallow: {}", p)));
    if let Some(delay) = rules.crawl_delay {
        lines.push(format!("Crawl-delay: {}", delay));
    }
    lines.join("\n")
}

fn render_log(log: &[CrawlLogEntry]) -> String {
    if log.is_empty() {
        return "No fetch attempted.".to_string();
    }
    log.iter()
        .map(|entry| {
            let status = entry
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{} [{}] {}",
                entry.url,
                status,
                entry.reason.as_deref().unwrap_or("")
            )
            .trim_end()
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_page(page: &PageSummary) -> String {
    let mut lines = vec![
        "## Page snapshot".to_string(),
        format!("URL: {}", page.url),
        format!("Title: {}", page.title.as_deref().unwrap_or("(none)")),
        format!("Word count: {}", page.word_count),
        format!("Has forms: {}", page.has_forms),
        format!("Has search: {}", page.has_search),
        format!("Contains login: {}", page.contains_login),
    ];
    if page.is_text_truncated {
        lines.push("Note: page text was truncated.".to_string());
    }
    if page.is_html_truncated {
        lines.push("Note: page HTML was truncated.".to_string());
    }
    lines.push(format!("\n### Text\n{}", page.text_content));
    lines.push(format!("\n### HTML\n{}", page.html_content));
    lines.join("\n")
}

/// Remove a surrounding Markdown code fence, if the model added one
pub fn strip_code_fences(answer: &str) -> &str {
    let trimmed = answer.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CrawlOutcome, SNAPSHOT_NOTE};
    use crate::model::mock_model::MockCompletionModel;
    use crate::policy::ExistingPolicy;
    use url::Url;

    fn analysis() -> SiteAnalysis {
        SiteAnalysis {
            target: Url::parse("https://example.com/").unwrap(),
            rules: Some(RuleSet {
                disallow: vec!["/admin".to_string()],
                allow: vec!["/admin/help".to_string()],
                crawl_delay: Some(2.0),
            }),
            existing_policy: None,
            crawl: CrawlOutcome {
                pages: vec![PageSummary {
                    url: "https://example.com/".to_string(),
                    title: Some("Example".to_string()),
                    text_content: "Welcome to Example".to_string(),
                    html_content: "<h1>Welcome to Example</h1>".to_string(),
                    is_text_truncated: false,
                    is_html_truncated: true,
                    word_count: 3,
                    has_forms: true,
                    has_search: true,
                    contains_login: false,
                }],
                log: vec![CrawlLogEntry {
                    url: "https://example.com/".to_string(),
                    status: Some(200),
                    reason: Some(SNAPSHOT_NOTE.to_string()),
                }],
            },
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  {\"a\":1}\n"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("```"), "");
    }

    #[test]
    fn test_render_site_context_sections() {
        let baseline = build_policy(&PolicyConfig::default());
        let context = render_site_context(&analysis(), &baseline);

        assert!(context.contains("## Target\nhttps://example.com/"));
        assert!(context.contains("Allow: /admin/help\nDisallow: /admin\nCrawl-delay: 2"));
        assert!(context.contains("None published."));
        assert!(context.contains(&format!("https://example.com/ [200] {}", SNAPSHOT_NOTE)));
        assert!(context.contains("Title: Example"));
        assert!(context.contains("Has search: true"));
        assert!(context.contains("Note: page HTML was truncated."));
        assert!(!context.contains("Note: page text was truncated."));
        assert!(context.contains("### Text\nWelcome to Example"));
        assert!(context.contains("\"resource_rules\""));
    }

    #[test]
    fn test_render_without_page_or_rules() {
        let mut analysis = analysis();
        analysis.rules = None;
        analysis.crawl = CrawlOutcome::default();
        analysis.existing_policy = Some(ExistingPolicy::Raw("be nice".to_string()));
        let context = render_site_context(&analysis, &build_policy(&PolicyConfig::default()));

        assert!(context.contains("No robots.txt found"));
        assert!(context.contains("## Published policy\nbe nice"));
        assert!(context.contains("No fetch attempted."));
        assert!(context.contains("No page content could be retrieved."));
    }

    #[tokio::test]
    async fn test_draft_parses_fenced_answer() {
        let mock = MockCompletionModel::new();
        mock.set_text_response(
            "```json\n{\"resource_rules\":[{\"verb\":\"read_content\",\"selector\":\"main\",\"allowed\":true}],\
             \"action_guidelines\":[{\"directive\":\"SHOULD\",\"description\":\"Honor crawl-delay\"}]}\n```",
        )
        .await;

        let drafter = PolicyDrafter::new(mock.clone());
        let draft = drafter
            .draft(&analysis(), &PolicyConfig::default())
            .await
            .unwrap();

        assert!(draft.raw.starts_with('{'));
        assert_eq!(draft.policy.resource_rules[0].selector, "main");
        assert_eq!(draft.policy.action_guidelines.len(), 1);
        assert_eq!(mock.calls().await, 1);
    }

    #[tokio::test]
    async fn test_draft_rejects_prose_answer() {
        let mock = MockCompletionModel::new();
        mock.set_text_response("I cannot help with that.").await;

        let drafter = PolicyDrafter::new(mock);
        let result = drafter.draft(&analysis(), &PolicyConfig::default()).await;

        assert!(matches!(result, Err(DraftError::InvalidOutput(_))));
    }
}
