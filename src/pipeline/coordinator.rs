//! Pipeline coordinator - crawl-to-document orchestration
//!
//! One run:
//! 1. Validates the request and resolves its output directory
//! 2. Dispatches the crawl and waits for the service (the only suspension point)
//! 3. Transforms every returned page, dropping pages without content
//! 4. Persists the documents in parallel, dropping those that fail to write
//! 5. Returns the surviving documents in crawler order

use crate::config::Config;
use crate::crawler::{CrawlClient, CrawlRequest, CrawlResponse};
use crate::document::{transform_page, Document, SkipReason};
use crate::output::IngestReport;
use crate::pipeline::state::PipelineState;
use crate::storage::{DocumentStore, FsDocumentStore, OutputDir};
use crate::url::derive_output_folder;
use crate::{IngestError, PersistenceError, PersistenceResult};
use futures::future::join_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Documents and report produced by one run
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub documents: Vec<Document>,
    pub report: IngestReport,
}

/// Main ingestion pipeline
pub struct CrawlPipeline {
    config: Config,
    client: CrawlClient,
    store: Arc<dyn DocumentStore>,
}

impl CrawlPipeline {
    /// Creates a pipeline that writes JSON records to the filesystem
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlPipeline)` - Pipeline ready to run
    /// * `Err(IngestError)` - The crawl client could not be built
    pub fn new(config: Config) -> Result<Self, IngestError> {
        Self::with_store(config, Arc::new(FsDocumentStore::new()))
    }

    /// Creates a pipeline with a custom document store
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Result<Self, IngestError> {
        let client = CrawlClient::new(&config.service)?;
        Ok(Self {
            config,
            client,
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &CrawlClient {
        &self.client
    }

    /// Runs one ingestion and returns the produced documents
    ///
    /// Never fails: an invalid request or a crawl service failure is logged
    /// and yields an empty list, and documents that fail to persist are left
    /// out of the result.
    pub async fn run(&self, start_url: &str, depth: u32, max_pages: u32) -> Vec<Document> {
        match self.try_run(start_url, depth, max_pages).await {
            Ok(outcome) => outcome.documents,
            Err(e) => {
                tracing::error!("Crawl failed for {}: {}", start_url, e);
                Vec::new()
            }
        }
    }

    /// Runs one ingestion, surfacing request and crawl service errors
    ///
    /// # Returns
    ///
    /// * `Ok(IngestOutcome)` - The run completed, possibly with zero documents
    /// * `Err(IngestError::InvalidRequest)` - The start URL or limits were rejected before any network call
    /// * `Err(IngestError::CrawlService)` - The crawl service failed; nothing was written
    pub async fn try_run(
        &self,
        start_url: &str,
        depth: u32,
        max_pages: u32,
    ) -> Result<IngestOutcome, IngestError> {
        let request = CrawlRequest::new(start_url, depth, max_pages)?;
        let mut run = RunTracker::new();

        run.advance(PipelineState::ResolvingOutputPath);
        let output_dir = self
            .config
            .storage
            .documents_dir()
            .join(derive_output_folder(request.url()));
        let mut report = IngestReport::new(start_url, &output_dir);

        tracing::info!(
            "Starting crawl for {} (depth: {}, max pages: {})",
            start_url,
            depth,
            max_pages
        );

        run.advance(PipelineState::AwaitingCrawlResponse);
        let response = match self.client.crawl(&request).await {
            Ok(response) => response,
            Err(e) => {
                run.advance(PipelineState::Failed);
                return Err(e.into());
            }
        };
        tracing::info!("Received {} pages from crawl service", response.pages.len());

        run.advance(PipelineState::TransformingPages);
        let documents = transform_pages(response, &mut report);

        run.advance(PipelineState::Persisting);
        let documents = self.persist_all(documents, &output_dir, &mut report).await;

        run.advance(PipelineState::Completed);
        report.final_state = run.state();
        tracing::info!(
            "Successfully saved {} documents to {}",
            documents.len(),
            output_dir.display()
        );

        Ok(IngestOutcome { documents, report })
    }

    /// Writes every document, returning only those that were written
    ///
    /// Documents are grouped by target file name. Groups are written in
    /// parallel; within a group documents are written in crawler order so
    /// the later page wins the file.
    async fn persist_all(
        &self,
        documents: Vec<Document>,
        output_dir: &Path,
        report: &mut IngestReport,
    ) -> Vec<Document> {
        if documents.is_empty() {
            return documents;
        }

        let dir = match OutputDir::acquire(output_dir) {
            Ok(dir) => dir,
            Err(e) => {
                tracing::error!("Cannot persist any document: {}", e);
                report.persistence_failures = documents.len();
                return Vec::new();
            }
        };

        let documents = Arc::new(documents);
        let groups = group_by_file_name(self.store.as_ref(), &documents);

        let tasks = groups.into_iter().map(|indices| {
            let documents = Arc::clone(&documents);
            let store = Arc::clone(&self.store);
            let dir = dir.clone();
            let task_indices = indices.clone();

            let handle = tokio::task::spawn_blocking(move || {
                task_indices
                    .into_iter()
                    .map(|i| (i, store.persist(&documents[i], &dir)))
                    .collect::<Vec<(usize, PersistenceResult<PathBuf>)>>()
            });

            async move {
                match handle.await {
                    Ok(results) => results,
                    Err(e) => indices
                        .into_iter()
                        .map(|i| (i, Err(PersistenceError::Task(e.to_string()))))
                        .collect(),
                }
            }
        });

        let mut persisted = vec![false; documents.len()];
        for (index, result) in join_all(tasks).await.into_iter().flatten() {
            match result {
                Ok(_) => persisted[index] = true,
                Err(e) => {
                    tracing::warn!(
                        "Dropping document {} ({}): {}",
                        documents[index].id,
                        documents[index].source_url(),
                        e
                    );
                    report.persistence_failures += 1;
                }
            }
        }

        let documents = Arc::try_unwrap(documents).unwrap_or_else(|shared| (*shared).clone());
        let kept: Vec<Document> = documents
            .into_iter()
            .zip(persisted)
            .filter_map(|(doc, ok)| ok.then_some(doc))
            .collect();

        report.documents_persisted = kept.len();
        kept
    }
}

/// Transforms crawled pages into documents, preserving order
fn transform_pages(response: CrawlResponse, report: &mut IngestReport) -> Vec<Document> {
    report.pages_received = response.pages.len();

    let mut documents = Vec::with_capacity(response.pages.len());
    for page in &response.pages {
        match transform_page(page) {
            Ok(doc) => documents.push(doc),
            Err(SkipReason::EmptyContent) => {
                tracing::debug!("Skipping {}: no content", page.url);
                report.pages_skipped_empty += 1;
            }
            Err(reason @ SkipReason::InvalidUrl(_)) => {
                tracing::warn!("Skipping page: {}", reason);
                report.pages_skipped_invalid_url += 1;
            }
        }
    }

    report.documents_produced = documents.len();
    documents
}

/// Groups document indices by the file name the store will write them to
fn group_by_file_name(store: &dyn DocumentStore, documents: &[Document]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (i, doc) in documents.iter().enumerate() {
        let name = store.file_name(doc);
        match by_name.get(&name) {
            Some(&group) => groups[group].push(i),
            None => {
                by_name.insert(name, groups.len());
                groups.push(vec![i]);
            }
        }
    }

    groups
}

/// Tracks the state of a single run
struct RunTracker {
    state: PipelineState,
}

impl RunTracker {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
        }
    }

    fn state(&self) -> PipelineState {
        self.state
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid pipeline transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("Pipeline state: {} -> {}", self.state, next);
        self.state = next;
    }
}
