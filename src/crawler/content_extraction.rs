//! Content extraction functionality for the crawler module

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::crawler::PageSummary;
use crate::crawler::config::ExtractOptions;
use crate::crawler::error::CrawlError;

/// Suffix appended to content that was cut at its ceiling
pub const TRUNCATION_MARKER: &str = "...";

/// Elements whose content never reaches the summary
const STRIPPED_ELEMENTS: &str = "script, style, noscript";

fn login_pattern() -> Result<&'static Regex, CrawlError> {
    static LOGIN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    LOGIN
        .get_or_init(|| Regex::new(r"(?i)\blog\s?in\b"))
        .as_ref()
        .map_err(|e| CrawlError::Pattern(e.to_string()))
}

fn selector(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css)
        .map_err(|e| CrawlError::HtmlParse(format!("Failed to parse selector '{}': {}", css, e)))
}

/// Extract a sanitized summary from an HTML page
///
/// # Arguments
///
/// * `url` - The URL of the page
/// * `html` - The HTML of the page
/// * `options` - Truncation ceilings for markup and text
///
/// # Returns
///
/// The page summary
pub fn extract_page(
    url: &str,
    html: &str,
    options: &ExtractOptions,
) -> Result<PageSummary, CrawlError> {
    let mut document = Html::parse_document(html);
    strip_elements(&mut document, STRIPPED_ELEMENTS)?;

    let title = document
        .select(&selector("title")?)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty());

    let body = document.select(&selector("body")?).next();
    let body_html = body.map(|b| b.inner_html()).unwrap_or_default();
    let body_text = body
        .map(|b| collapse_whitespace(&b.text().collect::<String>()))
        .unwrap_or_default();

    let (html_content, is_html_truncated) = truncate_chars(&body_html, options.max_html_chars);
    let (text_content, is_text_truncated) = truncate_chars(&body_text, options.max_text_chars);
    let word_count = body_text.split_whitespace().count();

    let forms: Vec<ElementRef> = document.select(&selector("form")?).collect();
    let input = selector("input")?;
    let has_forms = !forms.is_empty();
    let has_search = forms
        .iter()
        .any(|form| form.select(&input).any(|el| input_type_is(el, "search")));
    let has_password = document
        .select(&input)
        .any(|el| input_type_is(el, "password"));
    let login_form = forms.iter().any(|form| {
        form.value()
            .attr("id")
            .is_some_and(|id| id.to_lowercase().contains("login"))
    });
    let contains_login =
        has_forms && (has_password || login_form || login_pattern()?.is_match(&body_text));

    Ok(PageSummary {
        url: url.to_string(),
        title,
        text_content,
        html_content,
        is_text_truncated,
        is_html_truncated,
        word_count,
        has_forms,
        has_search,
        contains_login,
    })
}

/// Detach every element matching `css` from the document tree
fn strip_elements(document: &mut Html, css: &str) -> Result<(), CrawlError> {
    let selector = selector(css)?;
    let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    Ok(())
}

fn input_type_is(input: ElementRef, kind: &str) -> bool {
    input
        .value()
        .attr("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(kind))
}

/// Collapse whitespace runs to one space and trim
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `value` to `max_chars` characters, appending the marker when cut
fn truncate_chars(value: &str, max_chars: usize) -> (String, bool) {
    match value.char_indices().nth(max_chars) {
        Some((end, _)) => (format!("{}{}", &value[..end], TRUNCATION_MARKER), true),
        None => (value.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/";

    fn options(max_html_chars: usize, max_text_chars: usize) -> ExtractOptions {
        ExtractOptions {
            max_html_chars,
            max_text_chars,
        }
    }

    #[test]
    fn test_strips_script_style_noscript() {
        let html = r#"<html><head><title>T</title><style>.a{color:red}</style></head>
            <body><p>Visible</p><script>var secret = 1;</script>
            <noscript>Enable JS</noscript></body></html>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();

        assert_eq!(page.text_content, "Visible");
        assert!(!page.html_content.contains("script"));
        assert!(!page.html_content.contains("secret"));
        assert!(!page.html_content.contains("noscript"));
        assert!(!page.html_content.contains("color:red"));
    }

    #[test]
    fn test_title_is_trimmed_or_absent() {
        let page = extract_page(
            URL,
            "<html><head><title>  Hello World \n</title></head><body></body></html>",
            &options(100, 100),
        )
        .unwrap();
        assert_eq!(page.title.as_deref(), Some("Hello World"));

        let page = extract_page(
            URL,
            "<html><head><title>   </title></head><body>x</body></html>",
            &options(100, 100),
        )
        .unwrap();
        assert!(page.title.is_none());

        let page = extract_page(URL, "<p>no title</p>", &options(100, 100)).unwrap();
        assert!(page.title.is_none());
    }

    #[test]
    fn test_text_under_ceiling_is_not_truncated() {
        let html = "<body><h1>Welcome</h1>\n\n   <p>to   the\tsite</p></body>";
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();

        assert!(!page.is_text_truncated);
        assert_eq!(page.text_content, "Welcome to the site");
        assert_eq!(page.word_count, 4);
    }

    #[test]
    fn test_text_over_ceiling_is_truncated_with_marker() {
        let html = "<body><p>one two three four five six</p></body>";
        let page = extract_page(URL, html, &options(1000, 10)).unwrap();

        assert!(page.is_text_truncated);
        assert_eq!(page.text_content, "one two th...");
        assert_eq!(page.text_content.chars().count(), 10 + TRUNCATION_MARKER.len());
        assert_eq!(page.word_count, 6);
    }

    #[test]
    fn test_text_exactly_at_ceiling_is_not_truncated() {
        let page = extract_page(URL, "<body>abcde</body>", &options(1000, 5)).unwrap();
        assert!(!page.is_text_truncated);
        assert_eq!(page.text_content, "abcde");
    }

    #[test]
    fn test_html_truncation() {
        let html = "<body><div>0123456789</div></body>";
        let page = extract_page(URL, html, &options(8, 1000)).unwrap();

        assert!(page.is_html_truncated);
        assert_eq!(page.html_content, "<div>012...");
        assert!(!page.is_text_truncated);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let (cut, truncated) = truncate_chars("héllo wörld", 7);
        assert!(truncated);
        assert_eq!(cut, "héllo w...");
    }

    #[test]
    fn test_empty_body() {
        let page = extract_page(URL, "<html><body>   </body></html>", &options(10, 10)).unwrap();
        assert_eq!(page.text_content, "");
        assert_eq!(page.word_count, 0);
        assert!(!page.has_forms);
    }

    #[test]
    fn test_search_form_detection() {
        let html = r#"<body><form action="/search"><input type="Search" name="q"></form></body>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();

        assert!(page.has_forms);
        assert!(page.has_search);
        assert!(!page.contains_login);
    }

    #[test]
    fn test_search_input_outside_form_does_not_count() {
        let html = r#"<body><input type="search"><form><input type="text"></form></body>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();

        assert!(page.has_forms);
        assert!(!page.has_search);
    }

    #[test]
    fn test_login_by_password_field() {
        let html = r#"<body><form><input type="email"><input type="password"></form></body>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();
        assert!(page.contains_login);
    }

    #[test]
    fn test_login_by_text() {
        let html = r#"<body><p>Please Log In</p><form><input type="text"></form></body>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();
        assert!(page.contains_login);
    }

    #[test]
    fn test_login_by_form_id() {
        let html = r#"<body><form id="UserLoginForm"><input type="text"></form></body>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();
        assert!(page.contains_login);
    }

    #[test]
    fn test_login_requires_a_form() {
        let html = r#"<body><a href="/login">Login</a><input type="password"></body>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();

        assert!(!page.has_forms);
        assert!(!page.contains_login);
    }

    #[test]
    fn test_login_text_detected_beyond_text_ceiling() {
        let html = r#"<body><p>aaaaaaaaaa bbbbbbbbbb login</p><form></form></body>"#;
        let page = extract_page(URL, html, &options(1000, 5)).unwrap();

        assert!(page.is_text_truncated);
        assert!(page.contains_login);
    }

    #[test]
    fn test_blog_index_is_not_login() {
        let html = r#"<body><p>Our blog index</p><form><input type="text"></form></body>"#;
        let page = extract_page(URL, html, &options(1000, 1000)).unwrap();
        assert!(!page.contains_login);
    }
}
