use crate::crawler::RawPage;
use crate::document::{estimate_tokens, Document, DOC_AUTHOR, DOC_SOURCE};
use crate::url::derive_filename;
use chrono::Local;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Why a crawled page did not become a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("page has no markdown content")]
    EmptyContent,

    #[error("page URL is not parseable: {0}")]
    InvalidUrl(String),
}

/// Converts one crawled page into a `Document`
///
/// Pure apart from the fresh id and capture timestamp: no network or disk
/// access. Pages without markdown are skipped, as are pages whose URL cannot
/// be parsed (there is no way to name them).
pub fn transform_page(page: &RawPage) -> Result<Document, SkipReason> {
    let markdown = match page.markdown.as_deref() {
        Some(m) if !m.is_empty() => m,
        _ => return Err(SkipReason::EmptyContent),
    };

    let page_url =
        Url::parse(&page.url).map_err(|e| SkipReason::InvalidUrl(format!("{}: {}", page.url, e)))?;
    let safe_filename = derive_filename(&page_url);

    let title = page
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| safe_filename.clone());

    Ok(Document {
        id: Uuid::new_v4().to_string(),
        url: format!("file://{}", safe_filename),
        title,
        doc_author: DOC_AUTHOR.to_string(),
        description: format!("Crawled content from {}", page.url),
        doc_source: DOC_SOURCE.to_string(),
        chunk_source: format!("link://{}", page.url),
        published: Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        word_count: markdown.split_whitespace().count(),
        page_content: markdown.to_string(),
        token_count_estimate: estimate_tokens(markdown),
        content_hash: page.content_hash.clone(),
    })
}
