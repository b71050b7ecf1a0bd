//! Shared types, error model, and configuration for reconmap.
//!
//! This crate is the foundation depended on by every other reconmap crate.
//! It provides:
//! - [`ScanError`] — the unified error type
//! - Domain types ([`ScanResult`], [`BaselineInfo`], [`NormalizeOptions`], [`CrawlNode`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{AppConfig, CrawlPolicyConfig, DefaultsConfig, config_dir, config_file_path, init_config, load_config, load_config_from};
pub use error::{Result, ScanError};
pub use types::{BaselineInfo, CrawlNode, HeadlessResult, NormalizeOptions, QueryNormalization, ScanResult};
