//! HTTP client for the external crawl service
//!
//! One `POST /crawl` per invocation. There is no retry here: a failed
//! attempt is returned to the caller, which decides what failure means.

use crate::config::ServiceConfig;
use crate::crawler::types::{CrawlRequest, CrawlResponse, HealthStatus};
use crate::CrawlServiceError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with the configured timeouts
pub fn build_http_client(config: &ServiceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("crawl-ingest/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the crawl service
#[derive(Debug, Clone)]
pub struct CrawlClient {
    client: Client,
    base_url: String,
}

impl CrawlClient {
    /// Creates a client for the service described by `config`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlClient)` - Client ready to dispatch crawls
    /// * `Err(CrawlServiceError)` - Endpoint is not a URL or the HTTP client failed to build
    pub fn new(config: &ServiceConfig) -> Result<Self, CrawlServiceError> {
        Url::parse(&config.endpoint)
            .map_err(|e| CrawlServiceError::Endpoint(format!("{}: {}", config.endpoint, e)))?;

        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Dispatches a crawl and waits for the service to finish it
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResponse)` - The service answered 2xx with a well-formed body
    /// * `Err(CrawlServiceError)` - Transport failure, non-2xx status, or unparseable body
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<CrawlResponse, CrawlServiceError> {
        let url = format!("{}/crawl", self.base_url);
        tracing::debug!(
            url = request.start_url(),
            depth = request.depth(),
            max_pages = request.max_pages(),
            "Dispatching crawl request to {}",
            url
        );

        let resp = self
            .client
            .post(&url)
            .json(&request.to_body())
            .send()
            .await?;

        let response: CrawlResponse = decode(resp).await?;
        tracing::debug!(
            pages = response.pages.len(),
            total_count = ?response.total_count,
            success_count = ?response.success_count,
            "Crawl service replied"
        );

        Ok(response)
    }

    /// Queries `GET /health` on the crawl service
    pub async fn health(&self) -> Result<HealthStatus, CrawlServiceError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }
}

/// Checks the status and parses the JSON body of a service reply
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, CrawlServiceError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(CrawlServiceError::Status {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}
