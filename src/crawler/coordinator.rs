//! Harvest coordinator - pipeline orchestration
//!
//! Owns all run state explicitly and threads it through the phases:
//! discovery → category folders → job collection → worker pool.
//! Failures below this level are logged and abandon only their own unit of
//! work; only setup errors are returned.

use crate::config::Config;
use crate::crawler::collector::{collect_jobs, JobCollection, JobFilter, SectionFailure};
use crate::crawler::discovery::discover_sections;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::job::{Job, Section};
use crate::crawler::parser::SelectionRule;
use crate::crawler::pool::{run_workers, JobFailure, WorkerContext};
use crate::storage::{ensure_category_storage, Persister};
use crate::HarvestError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Compiled selection rules for the three page kinds
struct Rules {
    section: SelectionRule,
    item: SelectionRule,
    content: SelectionRule,
}

impl Rules {
    fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Ok(Self {
            section: SelectionRule::parse(&config.source.section_selector)?,
            item: SelectionRule::parse(&config.source.item_selector)?,
            content: SelectionRule::parse(&config.source.content_selector)?,
        })
    }
}

/// End-of-run account of a harvest
#[derive(Debug, Default)]
pub struct HarvestSummary {
    /// Set when the root page itself could not be used
    pub root_error: Option<HarvestError>,

    pub sections: usize,
    pub categories_ready: usize,
    pub category_failures: Vec<(String, HarvestError)>,
    pub section_failures: Vec<SectionFailure>,

    pub jobs_queued: usize,
    pub jobs_skipped: usize,
    pub succeeded: usize,
    pub job_failures: Vec<JobFailure>,

    pub elapsed: Duration,
}

impl HarvestSummary {
    /// True when any unit of work at any phase was abandoned
    pub fn has_failures(&self) -> bool {
        self.root_error.is_some()
            || !self.category_failures.is_empty()
            || !self.section_failures.is_empty()
            || !self.job_failures.is_empty()
    }
}

/// Runs a complete harvest
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `persister` - Produces each artifact; normally a `CommandConverter`
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - The run completed, possibly with abandoned work
/// * `Err(HarvestError)` - The selectors or HTTP client could not be set up
pub async fn run_harvest(
    config: Config,
    persister: Arc<dyn Persister>,
) -> Result<HarvestSummary, HarvestError> {
    let start = Instant::now();
    let rules = Rules::from_config(&config)?;
    let client = build_http_client(&config.http)?;
    let output_root = PathBuf::from(&config.output.directory);

    let mut summary = HarvestSummary::default();

    let sections = match discover_sections(&client, &config.source.root_url, &rules.section).await {
        Ok(sections) => sections,
        Err(error) => {
            tracing::error!(
                url = %config.source.root_url,
                phase = error.phase(),
                error = %error,
                "Failed to get job sections; continuing with none"
            );
            summary.root_error = Some(error);
            Vec::new()
        }
    };
    summary.sections = sections.len();

    let folders = ensure_category_storage(&output_root, &sections);
    summary.categories_ready = folders.ready();
    summary.category_failures = folders.failed;

    let collection = collect(&client, sections, &rules, &config).await;
    summary.jobs_queued = collection.jobs.len();
    summary.jobs_skipped = collection.skipped;
    summary.section_failures = collection.failures;

    let ctx = WorkerContext {
        client,
        content_rule: rules.content,
        output_root,
        extension: config.output.extension.clone(),
        persister,
    };
    let report = run_workers(collection.jobs, ctx, &config.pipeline).await;
    summary.succeeded = report.succeeded;
    summary.job_failures = report.failures;

    summary.elapsed = start.elapsed();
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.job_failures.len(),
        elapsed = ?summary.elapsed,
        "Harvest finished"
    );
    Ok(summary)
}

/// Runs discovery and collection only, touching nothing on disk
///
/// A root page failure yields an empty list, as in a full run.
pub async fn discover_jobs(config: &Config) -> Result<Vec<Job>, HarvestError> {
    let rules = Rules::from_config(config)?;
    let client = build_http_client(&config.http)?;

    let sections = discover_sections(&client, &config.source.root_url, &rules.section)
        .await
        .unwrap_or_else(|error| {
            tracing::error!(
                url = %config.source.root_url,
                error = %error,
                "Failed to get job sections"
            );
            Vec::new()
        });

    Ok(collect(&client, sections, &rules, config).await.jobs)
}

async fn collect(
    client: &Client,
    sections: Vec<Section>,
    rules: &Rules,
    config: &Config,
) -> JobCollection {
    let filter = JobFilter::new(&config.source.exclude_keywords);
    collect_jobs(client, sections, &rules.item, &filter).await
}
