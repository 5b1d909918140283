//! Storage traits and the output directory handle

use crate::document::Document;
use crate::{PersistenceError, PersistenceResult};
use std::path::{Path, PathBuf};

/// An output directory that is known to exist
///
/// Acquiring creates the directory (and any missing parents) or reuses it
/// when it is already there. Holding an `OutputDir` is the only way to
/// persist documents, so writes never race directory creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Creates `path` recursively if absent and returns a handle to it
    pub fn acquire(path: impl Into<PathBuf>) -> PersistenceResult<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path).map_err(|source| PersistenceError::CreateDir {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trait for document storage backends
///
/// Implementations must be usable from several blocking tasks at once; each
/// call writes exactly one document and never touches any other.
pub trait DocumentStore: Send + Sync {
    /// Persists one document into `dir`
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Location the document was written to
    /// * `Err(PersistenceError)` - The document could not be written
    fn persist(&self, document: &Document, dir: &OutputDir) -> PersistenceResult<PathBuf>;

    /// Name of the entry `document` will occupy inside its output directory
    ///
    /// Documents sharing a name overwrite one another.
    fn file_name(&self, document: &Document) -> String;
}
