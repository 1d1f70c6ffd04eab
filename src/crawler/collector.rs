//! Job collection: one concurrent task per section
//!
//! Each task fetches its section page, extracts item links and appends jobs
//! to a list shared under a mutex. The caller waits for every task; a failed
//! section only contributes zero jobs.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::job::{Job, Section};
use crate::crawler::parser::{decode_markup, extract_links, SelectionRule};
use crate::HarvestError;
use reqwest::Client;
use std::sync::{Arc, Mutex, PoisonError};

/// Case-insensitive URL keyword filter applied before a job is queued
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    keywords: Vec<String>,
}

impl JobFilter {
    pub fn new(keywords: &[String]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Returns the first keyword found in `url`, if any
    pub fn excluded_by(&self, url: &str) -> Option<&str> {
        let url = url.to_lowercase();
        self.keywords
            .iter()
            .find(|k| url.contains(k.as_str()))
            .map(|k| k.as_str())
    }
}

/// A section whose job collection failed
#[derive(Debug)]
pub struct SectionFailure {
    pub section_url: String,
    pub category: String,
    pub error: HarvestError,
}

/// Outcome of the collection phase
#[derive(Debug, Default)]
pub struct JobCollection {
    /// Every job discovered, in append order across sections
    pub jobs: Vec<Job>,

    /// Links dropped by the keyword filter
    pub skipped: usize,

    pub failures: Vec<SectionFailure>,
}

/// Collects jobs from all sections concurrently
///
/// One task is spawned per section; there is no pool bound because the
/// section count is set by the root page.
pub async fn collect_jobs(
    client: &Client,
    sections: Vec<Section>,
    rule: &SelectionRule,
    filter: &JobFilter,
) -> JobCollection {
    let jobs: Arc<Mutex<Vec<Job>>> = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::with_capacity(sections.len());

    for section in sections {
        tracing::info!(
            url = %section.url(),
            category = section.category(),
            "Scraping jobs for section"
        );

        let client = client.clone();
        let rule = rule.clone();
        let filter = filter.clone();
        let jobs = Arc::clone(&jobs);
        let url = section.url().to_string();
        let category = section.category().to_string();

        let handle = tokio::spawn(async move {
            collect_section(&client, &section, &rule, &filter, &jobs).await
        });
        handles.push((url, category, handle));
    }

    let mut collection = JobCollection::default();
    for (section_url, category, handle) in handles {
        match handle.await {
            Ok(Ok(outcome)) => {
                tracing::debug!(
                    url = %section_url,
                    category = %category,
                    added = outcome.added,
                    skipped = outcome.skipped,
                    "Section collected"
                );
                collection.skipped += outcome.skipped;
            }
            Ok(Err(error)) => {
                tracing::error!(
                    url = %section_url,
                    category = %category,
                    phase = error.phase(),
                    error = %error,
                    "Failed to collect jobs for section"
                );
                collection.failures.push(SectionFailure {
                    section_url,
                    category,
                    error,
                });
            }
            Err(join_error) => {
                tracing::error!(
                    url = %section_url,
                    category = %category,
                    error = %join_error,
                    "Section task panicked"
                );
                collection.failures.push(SectionFailure {
                    section_url,
                    category,
                    error: HarvestError::Task(join_error.to_string()),
                });
            }
        }
    }

    // Every task has been joined, so this is the last handle to the list
    collection.jobs = match Arc::try_unwrap(jobs) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
    };

    tracing::info!(
        jobs = collection.jobs.len(),
        skipped = collection.skipped,
        failed_sections = collection.failures.len(),
        "Job collection finished"
    );
    collection
}

struct SectionOutcome {
    added: usize,
    skipped: usize,
}

async fn collect_section(
    client: &Client,
    section: &Section,
    rule: &SelectionRule,
    filter: &JobFilter,
    jobs: &Mutex<Vec<Job>>,
) -> Result<SectionOutcome, HarvestError> {
    let url = section.url().as_str();
    let body = fetch_page(client, url).await?;
    let html = decode_markup(url, body)?;

    let mut outcome = SectionOutcome {
        added: 0,
        skipped: 0,
    };

    for link in extract_links(&html, section.url(), rule) {
        if let Some(keyword) = filter.excluded_by(&link) {
            tracing::info!(url = %link, keyword, "Skipping job matching excluded keyword");
            outcome.skipped += 1;
            continue;
        }

        let job = Job::new(link, section.category());
        tracing::debug!(url = %job.url, category = %job.category, "Job URL added");
        jobs.lock().unwrap_or_else(PoisonError::into_inner).push(job);
        outcome.added += 1;
    }

    Ok(outcome)
}
