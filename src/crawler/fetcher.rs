//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building one shared client with timeouts and a capped idle pool
//! - GET requests returning the raw body
//! - Error classification into network, status and read failures
//!
//! There is no retry logic; a failed fetch abandons the unit of work that
//! issued it.

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use job_harvest::config::HttpConfig;
/// use job_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(config.max_idle_per_host)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body bytes
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connect failure, timeout, bad URL | `Network` |
/// | Non-2xx status | `HttpStatus` |
/// | Body interrupted | `Read` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &str) -> Result<Vec<u8>, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|source| HarvestError::Read {
        url: url.to_string(),
        source,
    })?;

    tracing::debug!(url, bytes = body.len(), "Fetched page");
    Ok(body.to_vec())
}
