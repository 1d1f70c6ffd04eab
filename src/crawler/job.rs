//! Units of work: discovered sections and the jobs queued from them

use crate::url::{category_of, parse_url};
use crate::UrlError;
use std::fmt;
use url::Url;

/// A discovered listing page representing one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    url: Url,
    category: String,
}

impl Section {
    /// Builds a section, deriving its category from the URL's last segment
    pub fn from_url(url_str: &str) -> Result<Self, UrlError> {
        let url = parse_url(url_str)?;
        let category = category_of(&url).ok_or_else(|| UrlError::MissingSegment {
            url: url_str.to_string(),
            segment: "last",
        })?;
        Ok(Self { url, category })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// One item page to fetch and persist, tagged with its category
///
/// Identity is structural; duplicates are processed independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Job {
    pub url: String,
    pub category: String,
}

impl Job {
    pub fn new(url: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            category: category.into(),
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.url, self.category)
    }
}
