/// Pipeline state definitions for tracking an ingestion run
///
/// A run moves strictly forward through these states. The only failure exit
/// is from `AwaitingCrawlResponse`; once pages are in hand the run always
/// reaches `Completed`.
use std::fmt;

/// Represents the current stage of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Run has not started
    Idle,

    /// Computing the output directory for this run
    ResolvingOutputPath,

    /// Crawl request dispatched, waiting on the service
    AwaitingCrawlResponse,

    /// Turning crawled pages into documents
    TransformingPages,

    /// Writing documents to storage
    Persisting,

    // ===== Terminal States =====
    /// Run finished, possibly with zero documents
    Completed,

    /// Crawl service failed; the run produced nothing
    Failed,
}

impl PipelineState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the run may move from `self` to `next`
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::ResolvingOutputPath)
                | (Self::ResolvingOutputPath, Self::AwaitingCrawlResponse)
                | (Self::AwaitingCrawlResponse, Self::TransformingPages)
                | (Self::AwaitingCrawlResponse, Self::Failed)
                | (Self::TransformingPages, Self::Persisting)
                | (Self::Persisting, Self::Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ResolvingOutputPath => "resolving_output_path",
            Self::AwaitingCrawlResponse => "awaiting_crawl_response",
            Self::TransformingPages => "transforming_pages",
            Self::Persisting => "persisting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
