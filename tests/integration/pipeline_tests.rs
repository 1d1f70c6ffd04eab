//! Integration tests for the harvesting pipeline
//!
//! These tests use wiremock to serve root, section and item pages and run
//! the full discover → collect → dispatch → persist cycle end-to-end.

use async_trait::async_trait;
use job_harvest::config::Config;
use job_harvest::crawler::{discover_jobs, run_harvest, HarvestSummary};
use job_harvest::storage::{CommandConverter, Persister};
use job_harvest::HarvestError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.source.root_url = format!("{}/", base_url);
    config.pipeline.workers = 3;
    config.pipeline.queue_capacity = 2;
    config.output.directory = output_dir.display().to_string();
    config.converter.program = "sh".to_string();
    config.converter.args = vec![
        "-c".to_string(),
        r#"cat > "$0""#.to_string(),
        "{output}".to_string(),
    ];
    config
}

fn converter(config: &Config) -> Arc<dyn Persister> {
    Arc::new(CommandConverter::new(&config.converter))
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn section_link(href: &str) -> String {
    format!(r#"<div class="more mt-4 mb-4"><a href="{}">Open</a></div>"#, href)
}

fn item_links(hrefs: &[&str]) -> String {
    hrefs
        .iter()
        .map(|h| format!(r#"<div class="more"><a href="{}">Apply</a></div>"#, h))
        .collect()
}

fn item_page(title: &str) -> String {
    format!(
        r#"<header>Site</header><div class="content"><h1>{}</h1><p>Details</p></div>"#,
        title
    )
}

/// Mounts the engineering scenario: one section with the given item ids
async fn mount_engineering(server: &MockServer, ids: &[&str]) {
    mount_page(server, "/", &section_link("/jobs/engineering")).await;

    let hrefs: Vec<String> = ids
        .iter()
        .map(|id| format!("/jobs/engineering/{}/apply", id))
        .collect();
    let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_page(server, "/jobs/engineering", &item_links(&hrefs)).await;
}

/// Records destinations instead of converting
#[derive(Default)]
struct RecordingPersister {
    written: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl Persister for RecordingPersister {
    async fn persist(&self, _content: &str, destination: &Path) -> Result<(), HarvestError> {
        self.written.lock().unwrap().push(destination.to_path_buf());
        Ok(())
    }
}

/// Panics on one artifact and succeeds for every other
struct PanicOnStem(&'static str);

#[async_trait]
impl Persister for PanicOnStem {
    async fn persist(&self, _content: &str, destination: &Path) -> Result<(), HarvestError> {
        if destination.file_stem().and_then(|s| s.to_str()) == Some(self.0) {
            panic!("converter binding crashed");
        }
        Ok(())
    }
}

fn failed_urls(summary: &HarvestSummary) -> Vec<String> {
    summary
        .job_failures
        .iter()
        .map(|f| f.job.url.clone())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_single_category() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_engineering(&server, &["123", "456"]).await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;
    mount_page(&server, "/jobs/engineering/456/apply", &item_page("Frontend")).await;

    let config = create_test_config(&server.uri(), out.path());
    let persister = converter(&config);
    let summary = run_harvest(config, persister).await.unwrap();

    assert!(summary.root_error.is_none());
    assert_eq!(summary.sections, 1);
    assert_eq!(summary.categories_ready, 1);
    assert_eq!(summary.jobs_queued, 2);
    assert_eq!(summary.succeeded, 2);
    assert!(summary.job_failures.is_empty());

    let category = out.path().join("engineering");
    assert!(category.is_dir());

    let backend = std::fs::read_to_string(category.join("123.docx")).unwrap();
    assert!(backend.contains("<h1>Backend</h1>"));
    assert!(!backend.contains("Site"));

    let frontend = std::fs::read_to_string(category.join("456.docx")).unwrap();
    assert!(frontend.contains("<h1>Frontend</h1>"));
}

#[tokio::test]
async fn test_item_server_error_is_isolated() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_engineering(&server, &["123", "456", "789"]).await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;
    mount_page(&server, "/jobs/engineering/456/apply", &item_page("Frontend")).await;
    mount_status(&server, "/jobs/engineering/789/apply", 500).await;

    let config = create_test_config(&server.uri(), out.path());
    let persister = converter(&config);
    let summary = run_harvest(config, persister).await.unwrap();

    assert_eq!(summary.jobs_queued, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.job_failures.len(), 1);
    assert!(matches!(
        summary.job_failures[0].error,
        HarvestError::HttpStatus { status: 500, .. }
    ));
    assert!(failed_urls(&summary)[0].ends_with("/789/apply"));

    let category = out.path().join("engineering");
    assert!(category.join("123.docx").exists());
    assert!(category.join("456.docx").exists());
    assert!(!category.join("789.docx").exists());
}

#[tokio::test]
async fn test_root_page_failure_completes_with_zero_jobs() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_status(&server, "/", 503).await;

    let config = create_test_config(&server.uri(), out.path());
    let persister = converter(&config);
    let summary = run_harvest(config, persister).await.unwrap();

    assert!(matches!(
        summary.root_error,
        Some(HarvestError::HttpStatus { status: 503, .. })
    ));
    assert_eq!(summary.sections, 0);
    assert_eq!(summary.jobs_queued, 0);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_root_without_sections_is_not_an_error() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&server, "/", "<p>No openings right now</p>").await;

    let config = create_test_config(&server.uri(), out.path());
    let persister = converter(&config);
    let summary = run_harvest(config, persister).await.unwrap();

    assert!(summary.root_error.is_none());
    assert_eq!(summary.sections, 0);
    assert!(!summary.has_failures());
}

#[tokio::test]
async fn test_failed_section_contributes_no_jobs() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let root = format!(
        "{}{}",
        section_link("/jobs/engineering"),
        section_link("/jobs/sales")
    );
    mount_page(&server, "/", &root).await;
    mount_page(
        &server,
        "/jobs/engineering",
        &item_links(&["/jobs/engineering/123/apply"]),
    )
    .await;
    mount_status(&server, "/jobs/sales", 404).await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;

    let config = create_test_config(&server.uri(), out.path());
    let persister = converter(&config);
    let summary = run_harvest(config, persister).await.unwrap();

    assert_eq!(summary.sections, 2);
    assert_eq!(summary.categories_ready, 2);
    assert_eq!(summary.section_failures.len(), 1);
    assert_eq!(summary.section_failures[0].category, "sales");
    assert_eq!(summary.jobs_queued, 1);
    assert_eq!(summary.succeeded, 1);
    assert!(out.path().join("sales").is_dir());
    assert!(out.path().join("engineering/123.docx").exists());
}

#[tokio::test]
async fn test_missing_content_node_fails_job() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_engineering(&server, &["123", "456"]).await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;
    mount_page(&server, "/jobs/engineering/456/apply", "<p>Position closed</p>").await;

    let config = create_test_config(&server.uri(), out.path());
    let persister = converter(&config);
    let summary = run_harvest(config, persister).await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.job_failures.len(), 1);
    assert_eq!(summary.job_failures[0].error.phase(), "extract");
    assert!(!out.path().join("engineering/456.docx").exists());
}

#[tokio::test]
async fn test_converter_failure_is_reported_per_job() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_engineering(&server, &["123", "456"]).await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;
    mount_page(&server, "/jobs/engineering/456/apply", &item_page("Frontend")).await;

    let mut config = create_test_config(&server.uri(), out.path());
    config.converter.args = vec![
        "-c".to_string(),
        "cat > /dev/null; exit 1".to_string(),
        "{output}".to_string(),
    ];
    let persister = converter(&config);
    let summary = run_harvest(config, persister).await.unwrap();

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.job_failures.len(), 2);
    assert!(summary
        .job_failures
        .iter()
        .all(|f| matches!(f.error, HarvestError::Conversion { .. })));
}

#[tokio::test]
async fn test_duplicate_links_are_processed_independently() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_engineering(&server, &["123", "123"]).await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;

    let config = create_test_config(&server.uri(), out.path());
    let recorder = Arc::new(RecordingPersister::default());
    let summary = run_harvest(config, recorder.clone()).await.unwrap();

    assert_eq!(summary.jobs_queued, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(recorder.written.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_many_jobs_through_small_queue() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let ids: Vec<String> = (0..40).map(|i| i.to_string()).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    mount_engineering(&server, &id_refs).await;
    for id in &ids {
        mount_page(
            &server,
            &format!("/jobs/engineering/{}/apply", id),
            &item_page(id),
        )
        .await;
    }

    let mut config = create_test_config(&server.uri(), out.path());
    config.pipeline.workers = 4;
    config.pipeline.queue_capacity = 1;
    let recorder = Arc::new(RecordingPersister::default());
    let summary = run_harvest(config, recorder.clone()).await.unwrap();

    assert_eq!(summary.jobs_queued, 40);
    assert_eq!(summary.succeeded, 40);

    let mut written: Vec<PathBuf> = recorder.written.lock().unwrap().clone();
    written.sort();
    written.dedup();
    assert_eq!(written.len(), 40, "every job persisted exactly once");
}

#[tokio::test]
async fn test_jobs_from_many_sections_are_all_collected() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let categories = ["engineering", "sales", "design", "support", "finance"];
    let root: String = categories
        .iter()
        .map(|c| section_link(&format!("/jobs/{}", c)))
        .collect();
    mount_page(&server, "/", &root).await;

    for category in &categories {
        let hrefs: Vec<String> = (0..5)
            .map(|i| format!("/jobs/{}/{}/apply", category, i))
            .collect();
        let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
        mount_page(&server, &format!("/jobs/{}", category), &item_links(&hrefs)).await;
    }

    let config = create_test_config(&server.uri(), out.path());
    let jobs = discover_jobs(&config).await.unwrap();

    assert_eq!(jobs.len(), 25);
    for category in &categories {
        assert_eq!(jobs.iter().filter(|j| j.category == *category).count(), 5);
    }
    // Discovery alone never touches the output directory
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_excluded_keywords_are_not_queued() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_page(&server, "/", &section_link("/jobs/engineering")).await;
    mount_page(
        &server,
        "/jobs/engineering",
        &item_links(&[
            "/jobs/engineering/123/apply",
            "/jobs/engineering/engineer-in-qatar-9/apply",
        ]),
    )
    .await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;

    let mut config = create_test_config(&server.uri(), out.path());
    config.source.exclude_keywords = vec!["Qatar".to_string()];
    let recorder = Arc::new(RecordingPersister::default());
    let summary = run_harvest(config, recorder.clone()).await.unwrap();

    assert_eq!(summary.jobs_queued, 1);
    assert_eq!(summary.jobs_skipped, 1);
    assert_eq!(summary.succeeded, 1);
}

#[tokio::test]
async fn test_panicking_job_does_not_stall_the_pool() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_engineering(&server, &["123", "456"]).await;
    mount_page(&server, "/jobs/engineering/123/apply", &item_page("Backend")).await;
    mount_page(&server, "/jobs/engineering/456/apply", &item_page("Frontend")).await;

    let mut config = create_test_config(&server.uri(), out.path());
    config.pipeline.workers = 1;
    let summary = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        run_harvest(config, Arc::new(PanicOnStem("123"))),
    )
    .await
    .expect("harvest should finish after a job panics")
    .unwrap();

    assert_eq!(summary.jobs_queued, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.job_failures.len(), 1);
    assert!(failed_urls(&summary)[0].ends_with("/123/apply"));
    assert!(matches!(
        summary.job_failures[0].error,
        HarvestError::Task(_)
    ));
}
