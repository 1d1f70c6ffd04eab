use serde::Deserialize;

/// Main configuration structure for Job-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub http: HttpConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
    pub converter: ConverterConfig,
}

/// Where to start and which elements to follow
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Root listing page holding the section links
    pub root_url: String,

    /// Rule selecting section links on the root page
    pub section_selector: String,

    /// Rule selecting item links on each section page
    pub item_selector: String,

    /// Rule selecting the node whose markup is persisted for each item
    pub content_selector: String,

    /// Item URLs containing any of these words (case-insensitive) are skipped
    pub exclude_keywords: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root_url: "https://rsrglobal.org/".to_string(),
            section_selector: ".more.mt-4.mb-4".to_string(),
            item_selector: ".more".to_string(),
            content_selector: ".content".to_string(),
            exclude_keywords: Vec::new(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Idle connections kept alive per host
    pub max_idle_per_host: usize,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            max_idle_per_host: 10,
            user_agent: format!("job-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Number of concurrent workers draining the job queue
    pub workers: usize,

    /// Capacity of the dispatch queue; the producer waits when it is full
    pub queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 15,
            queue_capacity: 50,
        }
    }
}

/// Output location and artifact naming
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory under which one folder per category is created
    pub directory: String,

    /// Artifact file extension, without the dot
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            extension: "docx".to_string(),
        }
    }
}

/// External document converter invocation
///
/// `{output}` in `args` expands to the destination path and `{title}` to the
/// artifact name. The item markup is written to the program's stdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConverterConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
            args: [
                "--from",
                "html",
                "--to",
                "docx",
                "--metadata",
                "title={title}",
                "--output",
                "{output}",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
