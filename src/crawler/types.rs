use crate::url::parse_start_url;
use crate::{RequestError, RequestResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// One crawl invocation, validated on construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    start_url: String,
    url: Url,
    depth: u32,
    max_pages: u32,
}

impl CrawlRequest {
    /// Builds a request, rejecting malformed URLs and zero limits
    ///
    /// # Examples
    ///
    /// ```
    /// use crawl_ingest::CrawlRequest;
    ///
    /// let request = CrawlRequest::new("https://example.com", 1, 20).unwrap();
    /// assert_eq!(request.max_pages(), 20);
    ///
    /// assert!(CrawlRequest::new("https://example.com", 0, 20).is_err());
    /// ```
    pub fn new(url: &str, depth: u32, max_pages: u32) -> RequestResult<Self> {
        let start_url = url.to_string();
        let url = parse_start_url(url)?;

        if depth < 1 {
            return Err(RequestError::Depth(depth));
        }

        if max_pages < 1 {
            return Err(RequestError::MaxPages(max_pages));
        }

        Ok(Self {
            start_url,
            url,
            depth,
            max_pages,
        })
    }

    /// The start URL exactly as the caller gave it
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// The parsed start URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Returns the JSON body sent to `POST /crawl`
    pub(crate) fn to_body(&self) -> CrawlRequestBody<'_> {
        CrawlRequestBody {
            url: &self.start_url,
            depth: self.depth,
            max_pages: self.max_pages,
            bypass_cache: true,
        }
    }
}

/// Wire form of a crawl request
///
/// `bypass_cache` is always set so the service never answers from an older crawl.
#[derive(Debug, Serialize)]
pub(crate) struct CrawlRequestBody<'a> {
    pub url: &'a str,
    pub depth: u32,
    pub max_pages: u32,
    pub bypass_cache: bool,
}

/// Reply of the crawl service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlResponse {
    /// Crawled pages in the order the service returned them
    #[serde(default)]
    pub pages: Vec<RawPage>,

    /// Number of pages the service attempted
    #[serde(default)]
    pub total_count: Option<u64>,

    /// Number of pages the service crawled successfully
    #[serde(default)]
    pub success_count: Option<u64>,
}

/// A single crawled page as returned by the service
///
/// Everything here is untrusted; a page without markdown is skipped later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPage {
    pub url: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub markdown: Option<String>,

    #[serde(default)]
    pub content_hash: Option<String>,

    /// Site category detected by the service (spa, cms, documentation, ...)
    #[serde(default)]
    pub website_type: Option<String>,
}

impl RawPage {
    /// Returns true if the page carries non-empty markdown
    pub fn has_content(&self) -> bool {
        self.markdown.as_deref().is_some_and(|m| !m.is_empty())
    }
}

/// Reply of the crawl service health endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
