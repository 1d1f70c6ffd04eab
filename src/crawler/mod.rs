//! Crawler module for the two-phase harvesting pipeline
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching and link/content extraction
//! - Section discovery from the root page
//! - Concurrent job collection per section
//! - The dispatch queue and worker pool
//! - Overall run coordination

mod collector;
mod coordinator;
mod discovery;
mod fetcher;
mod job;
mod parser;
mod pool;

pub use collector::{collect_jobs, JobCollection, JobFilter, SectionFailure};
pub use coordinator::{discover_jobs, run_harvest, HarvestSummary};
pub use discovery::discover_sections;
pub use fetcher::{build_http_client, fetch_page};
pub use job::{Job, Section};
pub use parser::{decode_markup, extract_content, extract_links, SelectionRule};
pub use pool::{run_workers, CompletionTracker, JobFailure, PoolReport, WorkerContext};
