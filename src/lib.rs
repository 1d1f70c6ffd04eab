//! Job-Harvest: a categorized listing scraper
//!
//! This crate discovers categorized item pages from a root listing page and
//! persists each item's content to disk through an external document
//! converter, using a bounded worker pool.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Job-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request to {url} failed: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Read { url: String, source: reqwest::Error },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Conversion to {path} failed: {message}")]
    Conversion { path: PathBuf, message: String },

    #[error("Failed to create storage location {path}: {source}")]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Task failed: {0}")]
    Task(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl HarvestError {
    /// Short name of the pipeline phase an error belongs to, for reporting
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Read { .. } => "fetch",
            Self::Parse { .. } | Self::Url(_) => "extract",
            Self::Conversion { .. } => "persist",
            Self::Storage { .. } => "storage",
            Self::Task(_) => "runtime",
            Self::Config(_) | Self::Client(_) => "setup",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL {url} has no {segment} path segment")]
    MissingSegment { url: String, segment: &'static str },
}

/// Result type alias for Job-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_harvest, HarvestSummary, Job, Section};
pub use storage::{CommandConverter, Persister};
