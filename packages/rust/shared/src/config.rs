//! Application configuration for reconmap.
//!
//! User config lives at `~/.reconmap/reconmap.toml`. CLI flags override
//! config file values, which override the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "reconmap.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".reconmap";

// ---------------------------------------------------------------------------
// Config structs (matching reconmap.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// `[defaults]` — scan-wide defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// `[crawl]` — BFS crawler policy.
    #[serde(default)]
    pub crawl: CrawlPolicyConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Concurrent fuzz probes (§5: bounded by a semaphore of this capacity).
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Per-request rate-limit base, in milliseconds (§4.6 step 3).
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// Run the endpoint extractor when the baseline looks like an SPA.
    #[serde(default = "default_true")]
    pub enable_spa: bool,

    /// Pick a random browser User-Agent per probe instead of the fixed one.
    #[serde(default)]
    pub random_ua: bool,

    /// Verbosity level (0 = info, 1 = debug, 2+ = trace).
    #[serde(default)]
    pub verbose: u8,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            rate_limit_ms: default_rate_limit_ms(),
            enable_spa: default_true(),
            random_ua: false,
            verbose: 0,
        }
    }
}

fn default_threads() -> u32 {
    20
}
fn default_rate_limit_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}

/// `[crawl]` section — BFS crawler bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlPolicyConfig {
    /// Maximum BFS depth from the seed URL(s).
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Hard cap on the number of URLs visited in one crawl.
    #[serde(default = "default_max_urls")]
    pub max_urls: u32,
}

impl Default for CrawlPolicyConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_urls: default_max_urls(),
        }
    }
}

fn default_max_depth() -> u32 {
    3
}
fn default_max_urls() -> u32 {
    500
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.reconmap/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| ScanError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.reconmap/reconmap.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ScanError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ScanError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| ScanError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ScanError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("threads"));
        assert!(toml_str.contains("max_depth"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.threads, 20);
        assert_eq!(parsed.crawl.max_depth, 3);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
threads = 50
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.threads, 50);
        assert_eq!(config.defaults.rate_limit_ms, 100);
        assert_eq!(config.crawl.max_urls, 500);
    }
}
