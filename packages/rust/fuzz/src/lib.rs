//! Concurrent fuzzer (§4.6): bounded-parallel probing of
//! `wordlist ∪ spa_routes`, with rate-limit jitter, per-path dedup, and the
//! optional response-analysis hook.

mod analysis;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use reconmap_baseline::{classify, md5_hex, random_user_agent, FIXED_USER_AGENT};
use reconmap_normalize::{canonicalize, NormalizeOptions};
use reconmap_shared::{BaselineInfo, ScanResult};
use reqwest::Client;
use tokio::sync::{Mutex, Semaphore};
use tracing::{trace, warn};

pub use analysis::{append_finding, scan as analyze_response};

/// Per-probe network deadline (§4.6 step 4), distinct from the client's
/// overall timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Reports fuzzer progress without coupling this crate to any particular
/// rendering backend (indicatif, plain stderr, a test spy, ...).
pub trait FuzzProgress: Send + Sync {
    /// Called after every probe completes, in the exact wording of §4.6:
    /// `"Progress: c/t (p%) | Found: f"`.
    fn update(&self, completed: usize, total: usize, found: usize);
    fn done(&self) {}
}

/// A no-op progress sink, used by callers (and tests) that don't render one.
pub struct NullProgress;
impl FuzzProgress for NullProgress {
    fn update(&self, _completed: usize, _total: usize, _found: usize) {}
}

pub struct FuzzOptions {
    pub threads: usize,
    pub rate_limit_ms: u64,
    pub random_ua: bool,
    pub enable_analysis: bool,
    pub secrets_file: PathBuf,
}

struct Shared {
    found: Mutex<HashSet<String>>,
    results: Mutex<Vec<ScanResult>>,
    completed: Mutex<usize>,
}

/// Run the fuzzer to completion and return every accepted [`ScanResult`].
///
/// `paths` is `wordlist ⧺ spa_routes`; `spa_routes` is used only to decide
/// `is_spa_route` on acceptance (§3 `Result` invariant).
pub async fn fuzz(
    client: &Client,
    base_url: &str,
    paths: &[String],
    spa_routes: &[String],
    baseline: &BaselineInfo,
    opts: &FuzzOptions,
    progress: &dyn FuzzProgress,
) -> Vec<ScanResult> {
    let total = paths.len();
    let semaphore = Arc::new(Semaphore::new(opts.threads.max(1)));
    let shared = Arc::new(Shared {
        found: Mutex::new(HashSet::new()),
        results: Mutex::new(Vec::new()),
        completed: Mutex::new(0),
    });
    let spa_route_set: Arc<HashSet<String>> = Arc::new(spa_routes.iter().cloned().collect());

    let mut tasks = tokio::task::JoinSet::new();

    for path in paths.iter().cloned() {
        let semaphore = Arc::clone(&semaphore);
        let shared = Arc::clone(&shared);
        let spa_route_set = Arc::clone(&spa_route_set);
        let client = client.clone();
        let base_url = base_url.to_string();
        let baseline = baseline.clone();
        let rate_limit_ms = opts.rate_limit_ms;
        let random_ua = opts.random_ua;
        let enable_analysis = opts.enable_analysis;
        let secrets_file = opts.secrets_file.clone();

        tasks.spawn(async move {
            let _permit = semaphore.acquire().await.expect("semaphore never closed");

            if rate_limit_ms > 0 {
                let jitter = rand::thread_rng().gen_range(0..=(rate_limit_ms / 2));
                tokio::time::sleep(Duration::from_millis(rate_limit_ms + jitter)).await;
            }

            probe_one(
                &client,
                &base_url,
                &path,
                &baseline,
                random_ua,
                enable_analysis,
                &secrets_file,
                &spa_route_set,
                &shared,
            )
            .await;
        });
    }

    while tasks.join_next().await.is_some() {
        let completed = *shared.completed.lock().await;
        let found_count = shared.results.lock().await.len();
        progress.update(completed, total, found_count);
    }
    progress.done();

    Arc::try_unwrap(shared)
        .unwrap_or_else(|_| unreachable!("all tasks joined before this point"))
        .results
        .into_inner()
}

#[allow(clippy::too_many_arguments)]
async fn probe_one(
    client: &Client,
    base_url: &str,
    path: &str,
    baseline: &BaselineInfo,
    random_ua: bool,
    enable_analysis: bool,
    secrets_file: &std::path::Path,
    spa_route_set: &HashSet<String>,
    shared: &Shared,
) {
    // Wordlist entries are bare paths ("/admin"); spa_routes entries are
    // already-absolute canonical URLs ("https://t/user/test") produced by
    // the extractor — used as-is rather than re-prefixed onto base_url.
    let (full_url, path_with_slash) = if path.starts_with("http") {
        (path.to_string(), path.to_string())
    } else {
        let with_slash = if path.starts_with('/') { path.to_string() } else { format!("/{path}") };
        (format!("{base_url}{with_slash}"), with_slash)
    };
    let canonical = canonicalize(&full_url, &NormalizeOptions::default());

    {
        let found = shared.found.lock().await;
        if found.contains(&canonical) {
            return;
        }
    }

    let user_agent = if random_ua { random_user_agent() } else { FIXED_USER_AGENT };

    let request = client.get(&full_url).header("User-Agent", user_agent).send();
    let response = match tokio::time::timeout(PROBE_TIMEOUT, request).await {
        Ok(Ok(resp)) => resp,
        Ok(Err(e)) => {
            warn!(url = %full_url, error = %e, "probe request failed");
            bump_completed(shared).await;
            return;
        }
        Err(_) => {
            warn!(url = %full_url, "probe timed out");
            bump_completed(shared).await;
            return;
        }
    };

    let status = response.status().as_u16();
    let body = match response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            warn!(url = %full_url, error = %e, "failed to read probe body");
            bump_completed(shared).await;
            return;
        }
    };

    let hash = md5_hex(&body);

    if enable_analysis {
        let text = String::from_utf8_lossy(&body);
        let hits = analyze_response(&text);
        if !hits.is_empty() {
            if let Err(e) = append_finding(secrets_file, &full_url, &hits) {
                warn!(error = %e, "failed to write secrets file");
            }
        }
    }

    bump_completed(shared).await;

    if classify(status, &hash, &path_with_slash, baseline) {
        let mut found = shared.found.lock().await;
        if found.insert(canonical.clone()) {
            let is_spa_route = spa_route_set.contains(&canonical);
            let mut results = shared.results.lock().await;
            results.push(ScanResult {
                url: canonical,
                status,
                is_spa_route,
            });
            trace!(url = %full_url, status, "found");
        }
    }
}

async fn bump_completed(shared: &Shared) {
    let mut completed = shared.completed.lock().await;
    *completed += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconmap_shared::BaselineInfo;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn baseline(is_spa: bool) -> BaselineInfo {
        BaselineInfo {
            not_found_hash: "N".into(),
            home_hash: "H".into(),
            forbidden_hash: String::new(),
            not_found_length: 0,
            is_spa,
            spa_markers: Default::default(),
        }
    }

    #[tokio::test]
    async fn fuzz_accepts_distinct_hash_hit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/admin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("unique admin page"))
            .mount(&server)
            .await;

        let client = Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap();
        let opts = FuzzOptions {
            threads: 4,
            rate_limit_ms: 0,
            random_ua: false,
            enable_analysis: false,
            secrets_file: std::env::temp_dir().join("reconmap-fuzz-test-secrets.txt"),
        };

        let results = fuzz(
            &client,
            &server.uri(),
            &["/admin".to_string()],
            &[],
            &baseline(false),
            &opts,
            &NullProgress,
        )
        .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, 200);
        assert!(!results[0].is_spa_route);
    }

    #[tokio::test]
    async fn fuzz_dedupes_query_variants_to_one_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/p"))
            .respond_with(ResponseTemplate::new(200).set_body_string("distinct page"))
            .mount(&server)
            .await;

        let client = Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap();
        let opts = FuzzOptions {
            threads: 4,
            rate_limit_ms: 0,
            random_ua: false,
            enable_analysis: false,
            secrets_file: std::env::temp_dir().join("reconmap-fuzz-test-secrets2.txt"),
        };

        let paths = vec!["/p?a=1&b=2".to_string(), "/p?b=2&a=1".to_string()];
        let results = fuzz(&client, &server.uri(), &paths, &[], &baseline(false), &opts, &NullProgress).await;

        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn fuzz_rejects_spa_soft_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/foo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("shell"))
            .mount(&server)
            .await;

        let mut b = baseline(true);
        b.not_found_hash = reconmap_baseline::md5_hex(b"shell");
        b.home_hash = b.not_found_hash.clone();

        let client = Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap();
        let opts = FuzzOptions {
            threads: 2,
            rate_limit_ms: 0,
            random_ua: false,
            enable_analysis: false,
            secrets_file: std::env::temp_dir().join("reconmap-fuzz-test-secrets3.txt"),
        };

        let results = fuzz(&client, &server.uri(), &["/foo".to_string()], &[], &b, &opts, &NullProgress).await;
        assert!(results.is_empty());
    }
}
