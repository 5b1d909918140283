//! Pipeline module orchestrating one crawl-to-documents run
//!
//! `CrawlPipeline` composes the crawl client, the page transformer and the
//! document store. Runs are independent: each writes to its own uniquely
//! named output directory, so several may execute concurrently.

mod coordinator;
mod state;

pub use coordinator::{CrawlPipeline, IngestOutcome};
pub use state::PipelineState;
