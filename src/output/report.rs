//! Per-run ingestion report

use crate::pipeline::PipelineState;
use std::path::PathBuf;

/// Counters and outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// The crawl start URL
    pub start_url: String,

    /// Directory documents were (or would have been) written to
    pub output_dir: PathBuf,

    /// Pages returned by the crawl service
    pub pages_received: usize,

    /// Pages dropped because they had no markdown
    pub pages_skipped_empty: usize,

    /// Pages dropped because their URL could not be parsed
    pub pages_skipped_invalid_url: usize,

    /// Documents created from the received pages
    pub documents_produced: usize,

    /// Documents written to storage
    pub documents_persisted: usize,

    /// Documents that failed to write and were left out of the result
    pub persistence_failures: usize,

    /// State the run ended in
    pub final_state: PipelineState,
}

impl IngestReport {
    /// Creates an empty report for a run that has not started
    pub fn new(start_url: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_url: start_url.into(),
            output_dir: output_dir.into(),
            pages_received: 0,
            pages_skipped_empty: 0,
            pages_skipped_invalid_url: 0,
            documents_produced: 0,
            documents_persisted: 0,
            persistence_failures: 0,
            final_state: PipelineState::Idle,
        }
    }

    /// Total pages that did not become documents
    pub fn pages_skipped(&self) -> usize {
        self.pages_skipped_empty + self.pages_skipped_invalid_url
    }

    /// Percentage of received pages that ended up persisted
    pub fn success_rate(&self) -> f64 {
        if self.pages_received == 0 {
            return 0.0;
        }
        (self.documents_persisted as f64 / self.pages_received as f64) * 100.0
    }
}

/// Formats a report as human-readable text
pub fn format_report(report: &IngestReport) -> String {
    let mut out = String::new();

    out.push_str("=== Ingestion Report ===\n\n");
    out.push_str(&format!("Start URL: {}\n", report.start_url));
    out.push_str(&format!("Output directory: {}\n", report.output_dir.display()));
    out.push_str(&format!("Final state: {}\n\n", report.final_state));

    out.push_str("Pages:\n");
    out.push_str(&format!("  Received: {}\n", report.pages_received));
    out.push_str(&format!("  Skipped (empty): {}\n", report.pages_skipped_empty));
    out.push_str(&format!(
        "  Skipped (invalid URL): {}\n\n",
        report.pages_skipped_invalid_url
    ));

    out.push_str("Documents:\n");
    out.push_str(&format!("  Produced: {}\n", report.documents_produced));
    out.push_str(&format!("  Persisted: {}\n", report.documents_persisted));
    out.push_str(&format!("  Failed: {}\n\n", report.persistence_failures));

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages persisted)\n",
        report.success_rate(),
        report.documents_persisted,
        report.pages_received
    ));

    out
}

/// Prints a report to stderr, keeping stdout free for document output
pub fn print_report(report: &IngestReport) {
    eprint!("{}", format_report(report));
}
