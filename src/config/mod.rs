//! Configuration module for Crawl-Ingest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a pipeline can also be built from
//! `Config::default()` without touching the filesystem.
//!
//! # Example
//!
//! ```no_run
//! use crawl_ingest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ingest.toml")).unwrap();
//! println!("Crawl service: {}", config.service.endpoint);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlDefaults, ServiceConfig, StorageConfig, DEV_STORAGE_ROOT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
