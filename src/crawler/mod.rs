//! Crawler module for talking to the external crawl service
//!
//! The crawl service does all fetching, rendering, link following and
//! markdown extraction. This module holds:
//! - The request/response wire types
//! - The HTTP client that dispatches a crawl and validates the reply

mod client;
mod types;

pub use client::{build_http_client, CrawlClient};
pub use types::{CrawlRequest, CrawlResponse, HealthStatus, RawPage};
