//! Filesystem document store
//!
//! Each document becomes `<slug(title)>.json` holding the full record,
//! pretty-printed with four-space indentation.

use crate::document::Document;
use crate::storage::traits::{DocumentStore, OutputDir};
use crate::url::slugify;
use crate::{PersistenceError, PersistenceResult};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::PathBuf;

/// Extension of persisted document records
pub const RECORD_EXTENSION: &str = "json";

/// File name a document is persisted under
///
/// Falls back to the document id when the title slugifies to nothing.
pub fn document_file_name(document: &Document) -> String {
    let mut stem = slugify(&document.title);
    if stem.is_empty() {
        stem = document.id.clone();
    }
    format!("{}.{}", stem, RECORD_EXTENSION)
}

/// Writes documents as JSON files
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentStore;

impl FsDocumentStore {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for FsDocumentStore {
    fn persist(&self, document: &Document, dir: &OutputDir) -> PersistenceResult<PathBuf> {
        let path = dir.path().join(self.file_name(document));

        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        document
            .serialize(&mut ser)
            .map_err(|source| PersistenceError::Serialize {
                id: document.id.clone(),
                source,
            })?;

        std::fs::write(&path, &buf).map_err(|source| PersistenceError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote document {} to {}", document.id, path.display());
        Ok(path)
    }

    fn file_name(&self, document: &Document) -> String {
        document_file_name(document)
    }
}
