//! Block-scoped parser for robots directive text

use super::RuleSet;
use tracing::trace;

/// Parse raw robots text into the rules that apply to `agent_token`
///
/// A `user-agent` line opens a block. The block applies when its value is `*`
/// or contains the agent token (case-insensitive). Directives outside an
/// applicable block, unknown directives and lines without a colon are ignored.
///
/// # Arguments
///
/// * `raw` - The robots file body
/// * `agent_token` - The product token identifying this agent
///
/// # Returns
///
/// The rule set for the agent, empty when nothing applies
pub fn parse_robots(raw: &str, agent_token: &str) -> RuleSet {
    let token = agent_token.to_lowercase();
    let mut rules = RuleSet::default();
    let mut applies = false;

    for line in raw.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                applies = value == "*" || value.to_lowercase().contains(&token);
            }
            "disallow" if applies && !value.is_empty() => rules.disallow.push(value.to_string()),
            "allow" if applies && !value.is_empty() => rules.allow.push(value.to_string()),
            "crawl-delay" if applies => match value.parse::<f64>() {
                Ok(delay) if delay.is_finite() && delay >= 0.0 => rules.crawl_delay = Some(delay),
                _ => trace!("Ignoring crawl-delay value '{}'", value),
            },
            _ => {}
        }
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: &str = "agent-permissions";

    #[test]
    fn test_wildcard_block() {
        let rules = parse_robots(
            "User-agent: *\nDisallow: /private\nAllow: /private/open\nDisallow: /tmp",
            AGENT,
        );

        assert_eq!(rules.disallow, vec!["/private", "/tmp"]);
        assert_eq!(rules.allow, vec!["/private/open"]);
        assert_eq!(rules.crawl_delay, None);
    }

    #[test]
    fn test_other_agent_block_does_not_leak() {
        let rules = parse_robots(
            "User-agent: other-bot\nDisallow: /\nAllow: /x\nCrawl-delay: 10",
            AGENT,
        );

        assert!(rules.disallow.is_empty());
        assert!(rules.allow.is_empty());
        assert!(rules.crawl_delay.is_none());
    }

    #[test]
    fn test_directives_before_user_agent_are_ignored() {
        let rules = parse_robots("Disallow: /early\nUser-agent: *\nDisallow: /late", AGENT);
        assert_eq!(rules.disallow, vec!["/late"]);
    }

    #[test]
    fn test_agent_token_matches_case_insensitively() {
        let rules = parse_robots(
            "User-agent: Googlebot\nDisallow: /g\n\nUser-agent: Agent-Permissions/0.1\nDisallow: /ours",
            AGENT,
        );
        assert_eq!(rules.disallow, vec!["/ours"]);
    }

    #[test]
    fn test_new_user_agent_line_closes_block() {
        let rules = parse_robots(
            "User-agent: *\nDisallow: /a\nUser-agent: other-bot\nDisallow: /b",
            AGENT,
        );
        assert_eq!(rules.disallow, vec!["/a"]);
    }

    #[test]
    fn test_comments_blank_and_malformed_lines() {
        let raw = "# comment\n\n   \nUser-agent: *\nnonsense line\nSitemap: https://example.com/sitemap.xml\nDisallow:\nDisallow: /x";
        let rules = parse_robots(raw, AGENT);

        assert_eq!(rules.disallow, vec!["/x"]);
        assert!(rules.allow.is_empty());
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let rules = parse_robots("USER-AGENT: *\nDISALLOW: /Upper\nALLOW: /Upper/ok", AGENT);
        assert_eq!(rules.disallow, vec!["/Upper"]);
        assert_eq!(rules.allow, vec!["/Upper/ok"]);
    }

    #[test]
    fn test_crawl_delay_last_finite_value_wins() {
        let rules = parse_robots(
            "User-agent: *\nCrawl-delay: 1\nCrawl-delay: soon\nCrawl-delay: 3.5\nCrawl-delay: inf",
            AGENT,
        );
        assert_eq!(rules.crawl_delay, Some(3.5));
    }

    #[test]
    fn test_value_keeps_colons_after_first() {
        let rules = parse_robots("User-agent: *\nDisallow: /a:b", AGENT);
        assert_eq!(rules.disallow, vec!["/a:b"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_robots("", AGENT), RuleSet::default());
    }
}
