//! HTML extraction of link targets and item content
//!
//! Everything here is a pure function of its inputs. A `SelectionRule` is a
//! compiled CSS selector; it either targets anchors directly or targets
//! containers whose descendant anchors are wanted.

use crate::{ConfigError, HarvestError};
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use url::Url;

/// A compiled, page-specific CSS selection rule
#[derive(Clone)]
pub struct SelectionRule {
    selector: Selector,
    source: String,
}

impl SelectionRule {
    /// Compiles a CSS selector
    ///
    /// # Example
    ///
    /// ```
    /// use job_harvest::crawler::SelectionRule;
    ///
    /// assert!(SelectionRule::parse(".more.mt-4.mb-4").is_ok());
    /// assert!(SelectionRule::parse("div[[").is_err());
    /// ```
    pub fn parse(css: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
            selector: css.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            selector,
            source: css.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for SelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SelectionRule").field(&self.source).finish()
    }
}

/// Decodes a fetched body into markup text
///
/// The HTML parser accepts any text, so the only unparsable input is a
/// body that is not valid UTF-8.
pub fn decode_markup(url: &str, body: Vec<u8>) -> Result<String, HarvestError> {
    String::from_utf8(body).map_err(|e| HarvestError::Parse {
        url: url.to_string(),
        message: format!("body is not valid UTF-8: {}", e.utf8_error()),
    })
}

/// Extracts the link targets matched by `rule`, in document order
///
/// A matched element that carries an `href` contributes it directly; any
/// other matched element contributes the `href` of each anchor inside it.
/// Targets are resolved against `base_url`. No match yields an empty list.
///
/// # Example
///
/// ```
/// use job_harvest::crawler::{extract_links, SelectionRule};
/// use url::Url;
///
/// let html = r#"<div class="more"><a href="/jobs/engineering">Engineering</a></div>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let rule = SelectionRule::parse(".more").unwrap();
/// assert_eq!(extract_links(html, &base, &rule), vec!["https://example.com/jobs/engineering"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, rule: &SelectionRule) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for element in document.select(&rule.selector) {
        for href in hrefs_within(element) {
            if let Some(absolute_url) = resolve_link(href, base_url) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Returns the inner markup of the first element matched by `rule`
///
/// `None` when nothing matches or the match has only whitespace inside.
pub fn extract_content(html: &str, rule: &SelectionRule) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&rule.selector)
        .next()
        .map(|element| element.inner_html())
        .filter(|content| !content.trim().is_empty())
}

fn hrefs_within(element: ElementRef<'_>) -> Vec<&str> {
    if let Some(href) = element.value().attr("href") {
        return vec![href];
    }

    // Selector::parse only fails on invalid input; this one is static
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    element
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
