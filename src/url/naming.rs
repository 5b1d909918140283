use crate::url::slug::{slugify, MAX_SLUG_LEN};
use url::Url;
use uuid::Uuid;

/// Extension of the derived page filename, which also becomes the document's local reference
pub const FILE_EXTENSION: &str = "md";

/// Length of the random token appended to output folder names
pub const SUFFIX_LEN: usize = 4;

/// Returns a short random token drawn from a fresh UUID v4
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..SUFFIX_LEN].to_string()
}

/// Derives the per-crawl output folder name for a start URL
///
/// The folder is the slugified, lowercased hostname followed by a random
/// suffix, so repeated crawls of the same site never share a directory.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawl_ingest::url::derive_output_folder;
///
/// let url = Url::parse("https://Docs.Example.com/start").unwrap();
/// let folder = derive_output_folder(&url);
/// assert!(folder.starts_with("docs.example.com-"));
/// assert_eq!(folder.len(), "docs.example.com-".len() + 4);
/// ```
pub fn derive_output_folder(url: &Url) -> String {
    output_folder_with_suffix(url, &random_suffix())
}

fn output_folder_with_suffix(url: &Url, suffix: &str) -> String {
    let mut host = slugify(url.host_str().unwrap_or_default());
    host.truncate(MAX_SLUG_LEN.saturating_sub(suffix.len() + 1));
    slugify(&format!("{}-{}", host, suffix)).to_lowercase()
}

/// Derives the filename for one crawled page
///
/// Hostname and percent-decoded path are joined with every `/` replaced by
/// `_`, slugified, and given the fixed [`FILE_EXTENSION`]. Two pages that
/// decode to the same hostname and path share a filename.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawl_ingest::url::derive_filename;
///
/// let url = Url::parse("https://example.com/docs/getting%20started").unwrap();
/// assert_eq!(derive_filename(&url), "example.com_docs_getting-started.md");
/// ```
pub fn derive_filename(page_url: &Url) -> String {
    let host = page_url.host_str().unwrap_or_default();
    let path = page_url.path();
    let decoded = urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());

    let mut stem = slugify(&format!("{}{}", host, decoded.replace('/', "_")));
    if stem.is_empty() {
        stem = "page".to_string();
    }

    format!("{}.{}", stem, FILE_EXTENSION)
}
