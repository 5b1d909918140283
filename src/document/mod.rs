//! Document records and the page-to-document transformation
//!
//! A `Document` is the unit handed to the indexing subsystem: one per crawled
//! page that carried content. It is created once and never mutated.

mod tokens;
mod transform;

pub use tokens::estimate_tokens;
pub use transform::{transform_page, SkipReason};

use serde::{Deserialize, Serialize};

/// Author recorded on every document produced by this ingestion path
pub const DOC_AUTHOR: &str = "Crawl4AI Bot";

/// Source recorded on every document produced by this ingestion path
pub const DOC_SOURCE: &str = "Crawl4AI Web Scraper";

/// A normalized, persisted knowledge-base document
///
/// Serialized field names follow the document storage format consumed by
/// the indexing subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Fresh UUID v4
    pub id: String,

    /// Local reference, `file://<filename>`
    pub url: String,

    pub title: String,

    pub doc_author: String,

    pub description: String,

    pub doc_source: String,

    /// Pointer back to the crawled page, `link://<original url>`
    pub chunk_source: String,

    /// Capture time, local and human-readable
    pub published: String,

    pub word_count: usize,

    /// Markdown body exactly as returned by the crawl service
    pub page_content: String,

    #[serde(rename = "token_count_estimate")]
    pub token_count_estimate: usize,

    /// Crawler-supplied fingerprint, passed through unverified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl Document {
    /// Returns the original crawled URL recorded in `chunk_source`
    pub fn source_url(&self) -> &str {
        self.chunk_source
            .strip_prefix("link://")
            .unwrap_or(&self.chunk_source)
    }
}
