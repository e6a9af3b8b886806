//! Configuration module for the UN/LOCODE crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so running without a config file crawls the
//! public UNECE index into `./data`.
//!
//! # Example
//!
//! ```no_run
//! use unlocode_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Index page: {}", config.crawler.index_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_INDEX_URL};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
