//! Path checks against a [`RuleSet`]

use super::RuleSet;

/// Decide whether `path` may be fetched under `rules`
///
/// Allow patterns are checked first and the first match wins; then disallow
/// patterns, first match wins; otherwise the path is allowed. This deliberately
/// differs from the longest-match precedence of RFC 9309: an allow pattern
/// beats any disallow pattern regardless of length.
pub fn is_allowed(path: &str, rules: Option<&RuleSet>) -> bool {
    let Some(rules) = rules else {
        return true;
    };
    let path = if path.is_empty() { "/" } else { path };

    if rules.allow.iter().any(|pattern| matches_rule(path, pattern)) {
        return true;
    }
    !rules
        .disallow
        .iter()
        .any(|pattern| matches_rule(path, pattern))
}

/// Literal prefix match, with `$` anchoring an exact match
///
/// `""` and `"/"` match every path. No wildcard expansion is performed.
pub fn matches_rule(path: &str, pattern: &str) -> bool {
    if pattern.is_empty() || pattern == "/" {
        return true;
    }
    match pattern.strip_suffix('$') {
        Some(exact) => path == exact,
        None => path.starts_with(pattern),
    }
}
