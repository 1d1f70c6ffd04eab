//! Path-segment rules for category and artifact names

use url::Url;

/// Non-empty path segments, usable as a single file-system name
fn usable_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty() && *s != "." && *s != "..")
                .collect()
        })
        .unwrap_or_default()
}

/// Derives the category label of a section URL: its last path segment
///
/// A trailing slash is ignored, so `/jobs/engineering/` and
/// `/jobs/engineering` name the same category.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use job_harvest::url::category_of;
///
/// let url = Url::parse("https://example.com/jobs/engineering").unwrap();
/// assert_eq!(category_of(&url), Some("engineering".to_string()));
///
/// let root = Url::parse("https://example.com/").unwrap();
/// assert_eq!(category_of(&root), None);
/// ```
pub fn category_of(url: &Url) -> Option<String> {
    usable_segments(url).last().map(|s| s.to_string())
}

/// Derives an item's artifact name: the second-to-last path segment
///
/// # Examples
///
/// ```
/// use url::Url;
/// use job_harvest::url::artifact_stem;
///
/// let url = Url::parse("https://example.com/jobs/engineering/123/apply").unwrap();
/// assert_eq!(artifact_stem(&url), Some("123".to_string()));
/// ```
pub fn artifact_stem(url: &Url) -> Option<String> {
    let segments = usable_segments(url);
    segments
        .len()
        .checked_sub(2)
        .map(|idx| segments[idx].to_string())
}
