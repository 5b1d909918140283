//! Storage module for persisting produced documents
//!
//! This module handles all writes of the ingestion pipeline:
//! - Scoped acquisition of a crawl's output directory
//! - One JSON record per document, named from the document title
//! - Overwrite semantics when two documents map to the same file

mod fs;
mod traits;

pub use fs::{document_file_name, FsDocumentStore, RECORD_EXTENSION};
pub use traits::{DocumentStore, OutputDir};
