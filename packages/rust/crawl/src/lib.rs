//! Scope-bounded BFS crawler (§4.7): single-threaded, enqueue-on-discover
//! link traversal from one or more seed URLs within one origin.

mod patterns;

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use reconmap_normalize::{canonicalize, in_scope, to_absolute, NormalizeOptions};
use reconmap_shared::ScanResult;
use reqwest::Client;
use tracing::warn;

pub use patterns::extract_links;

pub struct CrawlOptions {
    pub max_depth: u32,
    pub max_urls: usize,
    pub rate_limit_ms: u64,
}

/// Reports crawl progress without coupling this crate to a rendering
/// backend.
pub trait CrawlProgress: Send + Sync {
    /// Called once per dequeued node, before it's fetched.
    fn update(&self, visited: usize, max_urls: usize, depth: u32, url: &str);
    fn done(&self) {}
}

/// A no-op progress sink, used by callers (and tests) that don't render one.
pub struct NullProgress;
impl CrawlProgress for NullProgress {
    fn update(&self, _visited: usize, _max_urls: usize, _depth: u32, _url: &str) {}
}

struct Node {
    url: String,
    depth: u32,
}

/// Crawl starting from `seeds`. `CrawlMultiple` from the reference design
/// collapses into this same function: every seed is enqueued at depth 0
/// before the loop begins, deduplicated through the same visited-set that
/// guards discovered links.
pub async fn crawl(
    client: &Client,
    base_url: &str,
    seeds: &[String],
    opts: &CrawlOptions,
    progress: &dyn CrawlProgress,
) -> Vec<ScanResult> {
    let norm_opts = NormalizeOptions::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<Node> = VecDeque::new();

    for seed in seeds {
        let canonical = canonicalize(seed, &norm_opts);
        if visited.insert(canonical) {
            queue.push_back(Node { url: seed.clone(), depth: 0 });
        }
    }

    let mut results = Vec::new();
    let mut visited_count = 0usize;

    while !queue.is_empty() && visited_count < opts.max_urls {
        let node = queue.pop_front().expect("queue non-empty by loop condition");

        if node.depth > opts.max_depth {
            continue;
        }

        visited_count += 1;
        progress.update(visited_count, opts.max_urls, node.depth, &node.url);

        let (links, status) = fetch_and_extract_links(client, &node.url).await;

        if status > 0 {
            results.push(ScanResult {
                url: canonicalize(&node.url, &norm_opts),
                status,
                is_spa_route: false,
            });
        }

        if node.depth < opts.max_depth {
            for link in links {
                let Some(absolute) = to_absolute(&link, &node.url) else { continue };
                if absolute.is_empty() {
                    continue;
                }
                if !in_scope(&absolute, base_url, "/") {
                    continue;
                }

                let canonical = canonicalize(&absolute, &norm_opts);
                if visited.insert(canonical) {
                    queue.push_back(Node { url: absolute, depth: node.depth + 1 });
                }
            }
        }

        if opts.rate_limit_ms > 0 {
            tokio::time::sleep(Duration::from_millis(opts.rate_limit_ms)).await;
        }
    }

    progress.done();
    results
}

async fn fetch_and_extract_links(client: &Client, url: &str) -> (Vec<String>, u16) {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(url, error = %e, "crawl request failed");
            return (Vec::new(), 0);
        }
    };

    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(b) => b,
        Err(e) => {
            warn!(url, error = %e, "failed to read crawl response body");
            return (Vec::new(), status);
        }
    };

    (extract_links(&body), status)
}
