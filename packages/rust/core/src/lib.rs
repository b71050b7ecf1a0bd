//! Scan orchestration: wires the normalizer, baseline fingerprinter,
//! endpoint extractor, fuzzer, and BFS crawler into the control flow from
//! §2 — `baseline → extract (if SPA) → fuzz → (optional) BFS → merge+dedup`.

mod output;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use reconmap_baseline::{build_client, fingerprint, load_or_create_wordlist, random_user_agent, FIXED_USER_AGENT};
use reconmap_crawl::{crawl, CrawlOptions, CrawlProgress};
use reconmap_extract::extract_endpoints;
use reconmap_fuzz::{fuzz, FuzzOptions, FuzzProgress};
use reconmap_shared::{BaselineInfo, Result, ScanResult};
use tracing::info;

pub use output::{dedup_urls, merge_headless, write_urls_file};

/// Per-scan configuration, assembled by the CLI from flags/config-file
/// values (§4.6/§4.7). `base_url` is trailing-slash-stripped by [`scan`].
pub struct ScanOptions {
    pub wordlist_path: PathBuf,
    pub threads: usize,
    pub enable_spa: bool,
    pub random_ua: bool,
    pub enable_analysis: bool,
    pub secrets_file: PathBuf,
    pub rate_limit_ms: u64,
    pub crawl: bool,
    pub max_depth: u32,
    pub max_urls: usize,
}

/// What a completed scan produced: the merged result set, the computed
/// baseline (useful for a summary line), and the raw `spa_routes` list
/// (needed by the CLI to seed the output file per `saveResultsWithDedup`).
pub struct ScanOutcome {
    pub results: Vec<ScanResult>,
    pub baseline: BaselineInfo,
    pub spa_routes: Vec<String>,
}

/// Reports scan-wide progress, fanning phase changes and the two
/// sub-component progress streams (fuzzer, crawler) out to one sink.
pub trait ScanProgress: Send + Sync {
    fn phase(&self, name: &str);
    fn fuzz_progress(&self, completed: usize, total: usize, found: usize);
    fn crawl_progress(&self, visited: usize, max_urls: usize, depth: u32, url: &str);
    fn done(&self) {}
}

/// No-op progress sink for library/test callers that don't render one.
pub struct SilentProgress;
impl ScanProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn fuzz_progress(&self, _completed: usize, _total: usize, _found: usize) {}
    fn crawl_progress(&self, _visited: usize, _max_urls: usize, _depth: u32, _url: &str) {}
}

struct ScanFuzzProgress<'a> {
    inner: &'a dyn ScanProgress,
}
impl FuzzProgress for ScanFuzzProgress<'_> {
    fn update(&self, completed: usize, total: usize, found: usize) {
        self.inner.fuzz_progress(completed, total, found);
    }
}

struct ScanCrawlProgress<'a> {
    inner: &'a dyn ScanProgress,
}
impl CrawlProgress for ScanCrawlProgress<'_> {
    fn update(&self, visited: usize, max_urls: usize, depth: u32, url: &str) {
        self.inner.crawl_progress(visited, max_urls, depth, url);
    }
}

/// Run a full scan of `base_url` and return the merged result set.
///
/// Fatal per §7: wordlist load/create failure, baseline 404/home fetch
/// failure — both propagate as [`reconmap_shared::ScanError`] via `?`.
/// Everything past the baseline stage degrades gracefully (empty
/// `spa_routes`, partial fuzz/crawl results) rather than aborting.
pub async fn scan(base_url: &str, opts: &ScanOptions, progress: &dyn ScanProgress) -> Result<ScanOutcome> {
    let base_url = base_url.trim_end_matches('/').to_string();
    let user_agent = if opts.random_ua { random_user_agent() } else { FIXED_USER_AGENT };
    let client = build_client(Duration::from_secs(15))?;

    progress.phase("Loading wordlist");
    let wordlist = load_or_create_wordlist(&opts.wordlist_path)?;
    info!(count = wordlist.len(), "wordlist loaded");

    progress.phase("Fingerprinting baseline");
    let baseline = fingerprint(&client, &base_url, user_agent).await?;
    info!(is_spa = baseline.is_spa, markers = ?baseline.spa_markers, "baseline fingerprinted");

    let mut spa_routes = Vec::new();
    if opts.enable_spa && baseline.is_spa {
        progress.phase("Extracting endpoints");
        spa_routes = extract_endpoints(&client, &base_url, user_agent).await;
        info!(count = spa_routes.len(), "endpoints extracted");
    }

    progress.phase("Fuzzing");
    let mut paths = wordlist;
    paths.extend(spa_routes.iter().cloned());
    let fuzz_opts = FuzzOptions {
        threads: opts.threads,
        rate_limit_ms: opts.rate_limit_ms,
        random_ua: opts.random_ua,
        enable_analysis: opts.enable_analysis,
        secrets_file: opts.secrets_file.clone(),
    };
    let fuzz_progress = ScanFuzzProgress { inner: progress };
    let mut results = fuzz(&client, &base_url, &paths, &spa_routes, &baseline, &fuzz_opts, &fuzz_progress).await;
    info!(count = results.len(), "fuzzing complete");

    if opts.crawl {
        progress.phase("Crawling");
        let mut seeds = vec![format!("{base_url}/")];
        seeds.extend(spa_routes.iter().cloned());
        let crawl_opts = CrawlOptions {
            max_depth: opts.max_depth,
            max_urls: opts.max_urls,
            rate_limit_ms: opts.rate_limit_ms,
        };
        let crawl_progress = ScanCrawlProgress { inner: progress };
        let bfs_results = crawl(&client, &base_url, &seeds, &crawl_opts, &crawl_progress).await;

        let mut seen: HashSet<String> = results.iter().map(|r| r.url.clone()).collect();
        let new_count = bfs_results.iter().filter(|r| !seen.contains(&r.url)).count();
        for result in bfs_results {
            if seen.insert(result.url.clone()) {
                results.push(result);
            }
        }
        info!(new_count, "BFS crawl complete");
    }

    progress.done();
    Ok(ScanOutcome { results, baseline, spa_routes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path as path_matcher};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn scan_plain_site_finds_wordlist_hit() {
        let server = MockServer::start().await;

        // Unmatched paths (the randomized synthetic-404/forbidden probes)
        // fall through to wiremock's default 404 response.
        Mock::given(method("GET"))
            .and(path_matcher("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("home page"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_matcher("/api/"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_matcher("/admin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("admin panel, totally distinct"))
            .mount(&server)
            .await;

        let wordlist_path = std::env::temp_dir().join("reconmap-core-scan-test-wordlist.txt");
        std::fs::write(&wordlist_path, "/admin\n").unwrap();

        let opts = ScanOptions {
            wordlist_path: wordlist_path.clone(),
            threads: 4,
            enable_spa: true,
            random_ua: false,
            enable_analysis: false,
            secrets_file: std::env::temp_dir().join("reconmap-core-scan-test-secrets.txt"),
            rate_limit_ms: 0,
            crawl: false,
            max_depth: 2,
            max_urls: 50,
        };

        let outcome = scan(&server.uri(), &opts, &SilentProgress).await.unwrap();
        assert!(outcome.results.iter().any(|r| r.url.ends_with("/admin") && r.status == 200));
        assert!(!outcome.baseline.is_spa);

        std::fs::remove_file(&wordlist_path).ok();
    }
}
