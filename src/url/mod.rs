//! URL handling module for Crawl-Ingest
//!
//! This module validates the start URL of a crawl request and derives the
//! filesystem names (output folder, page filenames) used for produced documents.

mod naming;
mod slug;

use crate::{RequestError, RequestResult};
use url::Url;

// Re-export main functions
pub use naming::{derive_filename, derive_output_folder, random_suffix, FILE_EXTENSION, SUFFIX_LEN};
pub use slug::{slugify, MAX_SLUG_LEN};

/// Parses and validates a crawl start URL
///
/// The URL must be absolute, use `http` or `https`, and carry a host.
/// No normalization is applied: the crawl service receives the URL as given.
///
/// # Examples
///
/// ```
/// use crawl_ingest::url::parse_start_url;
///
/// assert!(parse_start_url("https://example.com/docs").is_ok());
/// assert!(parse_start_url("example.com").is_err());
/// assert!(parse_start_url("ftp://example.com").is_err());
/// ```
pub fn parse_start_url(url_str: &str) -> RequestResult<Url> {
    let url = Url::parse(url_str).map_err(|e| RequestError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(RequestError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(RequestError::MissingHost(url_str.to_string()));
    }

    Ok(url)
}
