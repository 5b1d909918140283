//! Output module for reporting ingestion runs
//!
//! Each pipeline run produces an `IngestReport` alongside its documents.
//! This module holds the report type and its console rendering.

mod report;

pub use report::{format_report, print_report, IngestReport};
