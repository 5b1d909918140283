//! Crawl-Ingest: turns an external crawl into knowledge-base documents
//!
//! This crate asks an external crawl service to fetch and render a site, then
//! shapes every returned page into a normalized `Document` record and persists
//! it under the document storage tree for the indexing subsystem.

pub mod config;
pub mod crawler;
pub mod document;
pub mod output;
pub mod pipeline;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Crawl-Ingest operations
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Crawl service error: {0}")]
    CrawlService(#[from] CrawlServiceError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
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
}

/// Rejections of a crawl request, raised before any network call
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Depth must be at least 1, got {0}")]
    Depth(u32),

    #[error("Max pages must be at least 1, got {0}")]
    MaxPages(u32),
}

/// Failures talking to the external crawl service
#[derive(Debug, Error)]
pub enum CrawlServiceError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Crawl service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid crawl service endpoint: {0}")]
    Endpoint(String),
}

/// Failures writing documents to storage
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize document {id}: {source}")]
    Serialize {
        id: String,
        source: serde_json::Error,
    },

    #[error("Persistence task failed: {0}")]
    Task(String),
}

/// Result type alias for Crawl-Ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for request validation
pub type RequestResult<T> = std::result::Result<T, RequestError>;

/// Result type alias for persistence operations
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlClient, CrawlRequest, CrawlResponse, RawPage};
pub use document::{estimate_tokens, transform_page, Document};
pub use pipeline::{CrawlPipeline, IngestOutcome, PipelineState};
pub use storage::{DocumentStore, FsDocumentStore, OutputDir};
pub use crate::url::{derive_filename, derive_output_folder, slugify};
