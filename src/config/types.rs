use serde::Deserialize;
use std::path::PathBuf;

/// Storage root used when `dev-mode` is enabled, relative to the working directory
pub const DEV_STORAGE_ROOT: &str = "../server/storage";

/// Main configuration structure for Crawl-Ingest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub crawl: CrawlDefaults,
}

/// External crawl service connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the crawl service (the client appends `/crawl`)
    pub endpoint: String,

    /// Timeout for a whole crawl request, in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Timeout for establishing the connection, in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:11235".to_string(),
            timeout_secs: 300,
            connect_timeout_secs: 10,
        }
    }
}

/// Where produced documents are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base output directory; documents land in `<root>/documents/<folder>/`
    #[serde(rename = "storage-root")]
    pub storage_root: PathBuf,

    /// Use the fixed development root instead of `storage_root`
    #[serde(rename = "dev-mode")]
    pub dev_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./storage"),
            dev_mode: false,
        }
    }
}

impl StorageConfig {
    /// Returns the effective storage root
    pub fn root(&self) -> PathBuf {
        if self.dev_mode {
            PathBuf::from(DEV_STORAGE_ROOT)
        } else {
            self.storage_root.clone()
        }
    }

    /// Returns the directory that holds every crawl's document folder
    pub fn documents_dir(&self) -> PathBuf {
        self.root().join("documents")
    }
}

/// Defaults applied when the caller does not give depth or page limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlDefaults {
    #[serde(rename = "default-depth")]
    pub default_depth: u32,

    #[serde(rename = "default-max-pages")]
    pub default_max_pages: u32,
}

impl Default for CrawlDefaults {
    fn default() -> Self {
        Self {
            default_depth: 1,
            default_max_pages: 20,
        }
    }
}
