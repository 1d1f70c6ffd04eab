//! Section discovery from the root listing page

use crate::crawler::fetcher::fetch_page;
use crate::crawler::job::Section;
use crate::crawler::parser::{decode_markup, extract_links, SelectionRule};
use crate::url::parse_url;
use crate::HarvestError;
use reqwest::Client;

/// Fetches the root page once and returns its sections in document order
///
/// An empty result is a valid "no sections found" outcome. Links whose
/// category cannot be derived are logged and skipped.
///
/// # Errors
///
/// `Network`, `HttpStatus` or `Read` if the root page cannot be fetched,
/// `Parse` if its body cannot be decoded, `Url` if `root_url` is malformed.
pub async fn discover_sections(
    client: &Client,
    root_url: &str,
    rule: &SelectionRule,
) -> Result<Vec<Section>, HarvestError> {
    tracing::info!(url = root_url, "Discovering sections");

    let base = parse_url(root_url)?;
    let body = fetch_page(client, root_url).await?;
    let html = decode_markup(root_url, body)?;

    let mut sections = Vec::new();
    for link in extract_links(&html, &base, rule) {
        match Section::from_url(&link) {
            Ok(section) => sections.push(section),
            Err(e) => tracing::warn!(url = %link, error = %e, "Skipping section link"),
        }
    }

    tracing::info!(
        count = sections.len(),
        selector = rule.as_str(),
        "Sections found"
    );
    Ok(sections)
}
