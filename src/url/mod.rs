//! URL handling module for Job-Harvest
//!
//! Categories and artifact names are both derived from URL path structure:
//! a section URL's last segment names its category, an item URL's
//! second-to-last segment names its artifact.

mod segments;

use crate::{UrlError, UrlResult};
use std::path::{Path, PathBuf};
use url::Url;

pub use segments::{artifact_stem, category_of};

/// Parses an absolute URL, accepting only HTTP and HTTPS
///
/// # Examples
///
/// ```
/// use job_harvest::url::parse_url;
///
/// assert!(parse_url("https://example.com/jobs").is_ok());
/// assert!(parse_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Builds `<root>/<category>/<stem>.<extension>`
pub fn artifact_path(root: &Path, category: &str, stem: &str, extension: &str) -> PathBuf {
    root.join(category).join(format!("{}.{}", stem, extension))
}

/// Derives the destination of an item's artifact from its URL
pub fn artifact_path_for(
    root: &Path,
    category: &str,
    item_url: &str,
    extension: &str,
) -> UrlResult<PathBuf> {
    let url = parse_url(item_url)?;
    let stem = artifact_stem(&url).ok_or_else(|| UrlError::MissingSegment {
        url: item_url.to_string(),
        segment: "second-to-last",
    })?;
    Ok(artifact_path(root, category, &stem, extension))
}
