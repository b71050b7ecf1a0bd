//! Core domain types shared by every reconmap stage.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ScanResult
// ---------------------------------------------------------------------------

/// A single discovered endpoint: `(url, status, is_spa_route)`.
///
/// `url` is always canonical. `is_spa_route` is true exactly when `url`'s
/// path originated from the endpoint extractor rather than the wordlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub url: String,
    pub status: u16,
    pub is_spa_route: bool,
}

// ---------------------------------------------------------------------------
// BaselineInfo
// ---------------------------------------------------------------------------

/// Reference fingerprints captured once per scan, before fuzzing starts.
///
/// `is_spa` holds iff `not_found_hash == home_hash`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineInfo {
    pub not_found_hash: String,
    pub home_hash: String,
    /// May be empty: the forbidden probe is best-effort (§4.3 step 3).
    pub forbidden_hash: String,
    pub not_found_length: usize,
    pub is_spa: bool,
    pub spa_markers: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// NormalizeOptions
// ---------------------------------------------------------------------------

/// How `canonicalize` treats host case, default ports, index-file suffixes,
/// fragments, and query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryNormalization {
    /// Parse the query, sort by key then value, re-emit (duplicates kept).
    Sort,
    /// Drop the query entirely.
    Remove,
    /// Leave the query exactly as given.
    Preserve,
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub ignore_hash: bool,
    pub lowercase_host: bool,
    pub remove_default_port: bool,
    pub strip_index_html: bool,
    pub normalize_query: QueryNormalization,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            ignore_hash: true,
            lowercase_host: true,
            remove_default_port: true,
            strip_index_html: true,
            normalize_query: QueryNormalization::Sort,
        }
    }
}

// ---------------------------------------------------------------------------
// CrawlNode
// ---------------------------------------------------------------------------

/// One entry in the BFS crawler's queue. Lifetime equals one `crawl` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlNode {
    pub url: String,
    pub depth: u32,
}

// ---------------------------------------------------------------------------
// HeadlessResult
// ---------------------------------------------------------------------------

/// The shape produced by an external headless-browser collaborator.
///
/// reconmap's core does not implement headless browsing; this struct exists
/// so a caller holding `(url, links, api_requests, status)` tuples from such
/// a collaborator can feed them into [`crate::ScanResult`] merging via the
/// same canonicalize-and-dedupe path used everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessResult {
    pub url: String,
    pub links: Vec<String>,
    pub api_requests: Vec<String>,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_result_serialization() {
        let r = ScanResult {
            url: "https://example.com/admin".into(),
            status: 200,
            is_spa_route: false,
        };
        let json = serde_json::to_string(&r).expect("serialize");
        let parsed: ScanResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, r);
    }

    #[test]
    fn baseline_default_is_not_spa() {
        let baseline = BaselineInfo::default();
        assert!(!baseline.is_spa);
        assert!(baseline.spa_markers.is_empty());
    }

    #[test]
    fn normalize_options_default_matches_spec() {
        let opts = NormalizeOptions::default();
        assert!(opts.ignore_hash);
        assert!(opts.lowercase_host);
        assert!(opts.remove_default_port);
        assert!(opts.strip_index_html);
        assert_eq!(opts.normalize_query, QueryNormalization::Sort);
    }
}
