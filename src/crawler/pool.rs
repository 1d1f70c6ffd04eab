//! Dispatch queue and fixed-size worker pool
//!
//! A single producer feeds a bounded `mpsc` channel; N workers share its
//! receiver and each dequeued job goes to exactly one of them. Completion is
//! tracked with a wait-group style counter: +1 before each send, -1 after
//! each job finishes, whatever the outcome.

use crate::config::PipelineConfig;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::job::Job;
use crate::crawler::parser::{decode_markup, extract_content, SelectionRule};
use crate::storage::Persister;
use crate::url::artifact_path_for;
use crate::HarvestError;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};

/// Wait-group counter gating pipeline termination
///
/// The counter never goes negative: a `done` without a matching `add` is
/// refused and reported.
#[derive(Debug, Default)]
pub struct CompletionTracker {
    pending: AtomicUsize,
    zero: Notify,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `n` units of work
    pub fn add(&self, n: usize) {
        self.pending.fetch_add(n, Ordering::AcqRel);
    }

    /// Marks one unit of work as finished
    ///
    /// Returns `false` if there was nothing pending.
    pub fn done(&self) -> bool {
        let previous = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        match previous {
            Ok(1) => {
                self.zero.notify_waiters();
                true
            }
            Ok(_) => true,
            Err(_) => {
                tracing::error!("Completion counter underflow refused");
                false
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Resolves once no work is pending
    pub async fn wait(&self) {
        loop {
            // Registered before the check so a concurrent final `done` is not missed
            let notified = self.zero.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Everything a worker needs to process a job
#[derive(Clone)]
pub struct WorkerContext {
    pub client: Client,
    pub content_rule: SelectionRule,
    pub output_root: PathBuf,
    pub extension: String,
    pub persister: Arc<dyn Persister>,
}

/// A job that was abandoned
#[derive(Debug)]
pub struct JobFailure {
    pub job: Job,
    pub error: HarvestError,
}

/// Outcome of draining the queue
#[derive(Debug, Default)]
pub struct PoolReport {
    pub succeeded: usize,
    pub failures: Vec<JobFailure>,
}

impl PoolReport {
    fn merge(&mut self, other: PoolReport) {
        self.succeeded += other.succeeded;
        self.failures.extend(other.failures);
    }
}

/// Runs `jobs` through a pool of `config.workers` workers
///
/// Workers are started before the first job is enqueued. Returns once the
/// queue is closed, the completion counter is back at zero and every worker
/// has exited.
pub async fn run_workers(
    jobs: Vec<Job>,
    ctx: WorkerContext,
    config: &PipelineConfig,
) -> PoolReport {
    let (tx, rx) = mpsc::channel::<Job>(config.queue_capacity.max(1));
    let rx = Arc::new(Mutex::new(rx));
    let tracker = Arc::new(CompletionTracker::new());

    let worker_count = config.workers.max(1);
    let mut handles = Vec::with_capacity(worker_count);
    for worker_id in 0..worker_count {
        let rx = Arc::clone(&rx);
        let tracker = Arc::clone(&tracker);
        let ctx = ctx.clone();
        handles.push(tokio::spawn(worker(worker_id, rx, tracker, ctx)));
    }

    let mut report = PoolReport::default();
    for job in jobs {
        tracing::info!(url = %job.url, category = %job.category, "Queueing job");
        tracker.add(1);
        if let Err(mpsc::error::SendError(job)) = tx.send(job).await {
            tracker.done();
            tracing::error!(
                url = %job.url,
                category = %job.category,
                "Queue closed before job could be sent"
            );
            report.failures.push(JobFailure {
                error: HarvestError::Task("dispatch queue closed".to_string()),
                job,
            });
        }
    }
    drop(tx);

    tracker.wait().await;

    for handle in handles {
        match handle.await {
            Ok(worker_report) => report.merge(worker_report),
            Err(e) => tracing::error!(error = %e, "Worker task panicked"),
        }
    }

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "Worker pool drained"
    );
    report
}

async fn worker(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    tracker: Arc<CompletionTracker>,
    ctx: WorkerContext,
) -> PoolReport {
    let mut report = PoolReport::default();

    loop {
        let job = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };

        let Some(job) = job else {
            break;
        };

        // A panic inside one job must not take the worker or the counter down
        let outcome = match tokio::spawn(process_job(ctx.clone(), job.clone())).await {
            Ok(result) => result,
            Err(join_error) => Err(HarvestError::Task(format!(
                "job processing panicked: {}",
                join_error
            ))),
        };

        match outcome {
            Ok(path) => {
                tracing::info!(
                    worker = worker_id,
                    url = %job.url,
                    category = %job.category,
                    path = %path.display(),
                    "Artifact created"
                );
                report.succeeded += 1;
            }
            Err(error) => {
                tracing::error!(
                    worker = worker_id,
                    url = %job.url,
                    category = %job.category,
                    phase = error.phase(),
                    error = %error,
                    "Job abandoned"
                );
                report.failures.push(JobFailure { job, error });
            }
        }

        tracker.done();
    }

    tracing::debug!(worker = worker_id, "Queue closed, worker exiting");
    report
}

/// Fetch, extract, persist: the only ordered sequence in the pool
async fn process_job(ctx: WorkerContext, job: Job) -> Result<PathBuf, HarvestError> {
    let body = fetch_page(&ctx.client, &job.url).await?;
    let html = decode_markup(&job.url, body)?;

    let content = extract_content(&html, &ctx.content_rule).ok_or_else(|| HarvestError::Parse {
        url: job.url.clone(),
        message: format!("no content under '{}'", ctx.content_rule.as_str()),
    })?;

    let path = artifact_path_for(&ctx.output_root, &job.category, &job.url, &ctx.extension)?;
    ctx.persister.persist(&content, &path).await?;
    Ok(path)
}
