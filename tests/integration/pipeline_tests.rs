//! Integration tests for the ingestion pipeline
//!
//! These tests use wiremock to stand in for the crawl service and a
//! temporary directory as the storage root, then drive full runs end-to-end.

use crawl_ingest::config::{Config, CrawlDefaults, ServiceConfig, StorageConfig};
use crawl_ingest::storage::{document_file_name, DocumentStore, FsDocumentStore, OutputDir};
use crawl_ingest::{
    CrawlPipeline, CrawlServiceError, Document, IngestError, PersistenceError, PersistenceResult,
    PipelineState,
};
use serde_json::json;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock service and a temp storage root
fn create_test_config(endpoint: &str, storage_root: &Path) -> Config {
    Config {
        service: ServiceConfig {
            endpoint: endpoint.to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        },
        storage: StorageConfig {
            storage_root: storage_root.to_path_buf(),
            dev_mode: false,
        },
        crawl: CrawlDefaults::default(),
    }
}

/// Mounts a `POST /crawl` mock answering with the given pages
async fn mount_pages(server: &MockServer, pages: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pages": pages })))
        .mount(server)
        .await;
}

/// Lists every file under `<root>/documents`, recursively
fn persisted_files(root: &Path) -> Vec<PathBuf> {
    fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(&path, out);
            } else {
                out.push(path);
            }
        }
    }

    let mut files = Vec::new();
    walk(&root.join("documents"), &mut files);
    files.sort();
    files
}

fn read_document(path: &Path) -> Document {
    let content = std::fs::read_to_string(path).expect("Failed to read persisted document");
    serde_json::from_str(&content).expect("Persisted document is not valid JSON")
}

#[tokio::test]
async fn test_single_page_becomes_document() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    mount_pages(
        &mock_server,
        json!([{ "url": "https://example.com/a", "title": "A", "markdown": "hello world" }]),
    )
    .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let documents = pipeline.run("https://example.com", 1, 5).await;

    assert_eq!(documents.len(), 1);
    let doc = &documents[0];
    assert_eq!(doc.word_count, 2);
    assert_eq!(doc.chunk_source, "link://https://example.com/a");
    assert_eq!(doc.page_content, "hello world");
    assert_eq!(doc.title, "A");
    assert_eq!(doc.url, "file://example.com_a.md");
    assert_eq!(doc.doc_author, "Crawl4AI Bot");
    assert_eq!(doc.doc_source, "Crawl4AI Web Scraper");

    let files = persisted_files(storage.path());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name().unwrap(), "A.json");

    let folder = files[0].parent().unwrap().file_name().unwrap().to_string_lossy();
    assert!(folder.starts_with("example.com-"), "unexpected folder {}", folder);
    assert_eq!(folder.len(), "example.com-".len() + 4);

    assert_eq!(&read_document(&files[0]), doc);
}

#[tokio::test]
async fn test_request_body_shape() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .and(body_json(json!({
            "url": "https://example.com",
            "depth": 3,
            "max_pages": 7,
            "bypass_cache": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pages": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let outcome = pipeline
        .try_run("https://example.com", 3, 7)
        .await
        .expect("Request body did not match");

    assert!(outcome.documents.is_empty());
    assert_eq!(outcome.report.final_state, PipelineState::Completed);
}

#[tokio::test]
async fn test_empty_markdown_produces_nothing() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    mount_pages(
        &mock_server,
        json!([{ "url": "https://example.com/empty", "markdown": "" }]),
    )
    .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let outcome = pipeline.try_run("https://example.com", 1, 5).await.unwrap();

    assert!(outcome.documents.is_empty());
    assert_eq!(outcome.report.pages_received, 1);
    assert_eq!(outcome.report.pages_skipped_empty, 1);
    assert_eq!(outcome.report.final_state, PipelineState::Completed);
    assert!(persisted_files(storage.path()).is_empty());
}

#[tokio::test]
async fn test_mixed_pages_keep_crawler_order() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    mount_pages(
        &mock_server,
        json!([
            { "url": "https://example.com/one", "title": "One", "markdown": "first page" },
            { "url": "https://example.com/skip" },
            { "url": "https://example.com/two", "title": "Two", "markdown": "second page", "content_hash": "h2" },
            { "url": "https://example.com/blank", "title": "Blank", "markdown": "" },
            { "url": "https://example.com/three", "title": "Three", "markdown": "third page here" }
        ]),
    )
    .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let outcome = pipeline.try_run("https://example.com", 2, 10).await.unwrap();

    let titles: Vec<&str> = outcome.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
    assert_eq!(outcome.documents[1].content_hash.as_deref(), Some("h2"));
    assert_eq!(outcome.documents[2].word_count, 3);

    let ids: HashSet<&str> = outcome.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids.len(), outcome.documents.len());

    assert_eq!(outcome.report.pages_received, 5);
    assert_eq!(outcome.report.pages_skipped_empty, 2);
    assert_eq!(outcome.report.documents_persisted, 3);
    assert_eq!(persisted_files(storage.path()).len(), 3);
}

#[tokio::test]
async fn test_many_pages_have_distinct_ids() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    let pages: Vec<serde_json::Value> = (0..40)
        .map(|i| {
            json!({
                "url": format!("https://example.com/page/{}", i),
                "markdown": format!("content of page {}", i)
            })
        })
        .collect();
    mount_pages(&mock_server, json!(pages)).await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let documents = pipeline.run("https://example.com", 1, 40).await;

    assert_eq!(documents.len(), 40);
    let ids: HashSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids.len(), 40);

    for (i, doc) in documents.iter().enumerate() {
        assert_eq!(doc.chunk_source, format!("link://https://example.com/page/{}", i));
    }
    assert_eq!(persisted_files(storage.path()).len(), 40);
}

#[tokio::test]
async fn test_service_error_returns_empty() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Crawl failed: boom"))
        .mount(&mock_server)
        .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();

    let documents = pipeline.run("https://example.com", 1, 5).await;
    assert!(documents.is_empty());
    assert!(persisted_files(storage.path()).is_empty());

    let result = pipeline.try_run("https://example.com", 1, 5).await;
    match result {
        Err(IngestError::CrawlService(CrawlServiceError::Status { status, message })) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Crawl failed: boom");
        }
        other => panic!("Expected status error, got {:?}", other.map(|o| o.report)),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_service_error() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let result = pipeline.try_run("https://example.com", 1, 5).await;

    assert!(matches!(
        result,
        Err(IngestError::CrawlService(CrawlServiceError::Decode(_)))
    ));
    assert!(pipeline.run("https://example.com", 1, 5).await.is_empty());
}

#[tokio::test]
async fn test_unreachable_service_is_http_error() {
    let storage = TempDir::new().unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let uri = format!("http://127.0.0.1:{}", port);

    let pipeline = CrawlPipeline::new(create_test_config(&uri, storage.path())).unwrap();
    let result = pipeline.try_run("https://example.com", 1, 5).await;

    assert!(matches!(
        result,
        Err(IngestError::CrawlService(CrawlServiceError::Http(_)))
    ));
}

#[tokio::test]
async fn test_invalid_start_url_makes_no_request() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pages": [] })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();

    assert!(pipeline.run("not a url", 1, 5).await.is_empty());
    assert!(matches!(
        pipeline.try_run("ftp://example.com", 1, 5).await,
        Err(IngestError::InvalidRequest(_))
    ));
    assert!(matches!(
        pipeline.try_run("https://example.com", 1, 0).await,
        Err(IngestError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_filename_collision_keeps_later_content() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    mount_pages(
        &mock_server,
        json!([
            { "url": "https://example.com/dup", "markdown": "earlier content" },
            { "url": "https://example.com/dup", "markdown": "later content" }
        ]),
    )
    .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let outcome = pipeline.try_run("https://example.com", 1, 5).await.unwrap();

    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.documents[0].page_content, "earlier content");
    assert_eq!(outcome.documents[1].page_content, "later content");
    assert_ne!(outcome.documents[0].id, outcome.documents[1].id);
    assert_eq!(outcome.report.documents_persisted, 2);

    let files = persisted_files(storage.path());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name().unwrap(), "example.com_dup.md.json");
    assert_eq!(read_document(&files[0]).page_content, "later content");
}

#[tokio::test]
async fn test_unwritable_storage_drops_documents() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();
    let blocker = storage.path().join("not-a-dir");
    std::fs::write(&blocker, "occupied").unwrap();

    mount_pages(
        &mock_server,
        json!([
            { "url": "https://example.com/a", "title": "A", "markdown": "alpha" },
            { "url": "https://example.com/b", "title": "B", "markdown": "beta" }
        ]),
    )
    .await;

    let pipeline = CrawlPipeline::new(create_test_config(&mock_server.uri(), &blocker)).unwrap();
    let outcome = pipeline.try_run("https://example.com", 1, 5).await.unwrap();

    assert!(outcome.documents.is_empty());
    assert_eq!(outcome.report.documents_produced, 2);
    assert_eq!(outcome.report.persistence_failures, 2);
    assert_eq!(outcome.report.final_state, PipelineState::Completed);
}

/// Store that refuses documents with a given title and writes everything else
struct FailingStore {
    refuse_title: &'static str,
    inner: FsDocumentStore,
}

impl DocumentStore for FailingStore {
    fn persist(&self, document: &Document, dir: &OutputDir) -> PersistenceResult<PathBuf> {
        if document.title == self.refuse_title {
            return Err(PersistenceError::Write {
                path: dir.path().join(document_file_name(document)),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.persist(document, dir)
    }

    fn file_name(&self, document: &Document) -> String {
        self.inner.file_name(document)
    }
}

#[tokio::test]
async fn test_single_write_failure_does_not_stop_others() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    mount_pages(
        &mock_server,
        json!([
            { "url": "https://example.com/a", "title": "A", "markdown": "alpha" },
            { "url": "https://example.com/b", "title": "Broken", "markdown": "beta" },
            { "url": "https://example.com/c", "title": "C", "markdown": "gamma" }
        ]),
    )
    .await;

    let store = Arc::new(FailingStore {
        refuse_title: "Broken",
        inner: FsDocumentStore::new(),
    });
    let pipeline = CrawlPipeline::with_store(
        create_test_config(&mock_server.uri(), storage.path()),
        store,
    )
    .unwrap();
    let outcome = pipeline.try_run("https://example.com", 1, 5).await.unwrap();

    let titles: Vec<&str> = outcome.documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C"]);
    assert_eq!(outcome.report.persistence_failures, 1);
    assert_eq!(outcome.report.documents_persisted, 2);
    assert_eq!(persisted_files(storage.path()).len(), 2);
}

#[tokio::test]
async fn test_concurrent_runs_use_separate_folders() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    mount_pages(
        &mock_server,
        json!([{ "url": "https://example.com/a", "title": "A", "markdown": "alpha" }]),
    )
    .await;

    let pipeline = Arc::new(
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.try_run("https://example.com", 1, 5).await })
        })
        .collect();

    let mut folders = HashSet::new();
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.documents.len(), 1);
        folders.insert(outcome.report.output_dir);
    }

    // Runs share a folder only when their 4-hex-char suffixes collide
    for folder in &folders {
        let name = folder.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("example.com-"), "unexpected folder {}", name);
    }
    assert_eq!(persisted_files(storage.path()).len(), folders.len());
}

#[tokio::test]
async fn test_long_names_still_persist() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    let deep_url = format!("https://example.com/{}", "segment/".repeat(40));
    mount_pages(
        &mock_server,
        json!([
            { "url": "https://example.com/long", "title": "Very Long Title ".repeat(20), "markdown": "long title" },
            { "url": deep_url, "markdown": "deep path" }
        ]),
    )
    .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let outcome = pipeline.try_run("https://example.com", 1, 5).await.unwrap();

    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.report.persistence_failures, 0);

    let files = persisted_files(storage.path());
    assert_eq!(files.len(), 2);
    for file in &files {
        assert!(file.file_name().unwrap().len() < 255);
    }
}

#[tokio::test]
async fn test_health_probe() {
    let mock_server = MockServer::start().await;
    let storage = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "service": "Crawl4AI",
            "version": "2.0"
        })))
        .mount(&mock_server)
        .await;

    let pipeline =
        CrawlPipeline::new(create_test_config(&mock_server.uri(), storage.path())).unwrap();
    let health = pipeline.client().health().await.unwrap();

    assert!(health.is_healthy());
    assert_eq!(health.service.as_deref(), Some("Crawl4AI"));
    assert_eq!(health.version.as_deref(), Some("2.0"));
}
