//! Output-file writing and the headless-collaborator merge (§6).

use std::collections::HashSet;
use std::path::Path;

use reconmap_normalize::{canonicalize, in_scope, NormalizeOptions};
use reconmap_shared::{HeadlessResult, Result, ScanError, ScanResult};

/// Merge `results` with `spa_routes` (when SPA extraction ran), deduping on
/// canonical URL and preserving first-seen order — the reference
/// implementation's `saveResultsWithDedup`.
pub fn dedup_urls(results: &[ScanResult], spa_routes: &[String], enable_spa: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for result in results {
        if seen.insert(result.url.clone()) {
            out.push(result.url.clone());
        }
    }

    if enable_spa {
        for route in spa_routes {
            if seen.insert(route.clone()) {
                out.push(route.clone());
            }
        }
    }

    out
}

/// Write one canonical URL per line, no header (§6 output file format).
pub fn write_urls_file(path: &Path, urls: &[String]) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path).map_err(|e| ScanError::io(path, e))?;
    for url in urls {
        writeln!(file, "{url}").map_err(|e| ScanError::io(path, e))?;
    }
    Ok(())
}

/// `GetAllURLs`: fold a headless collaborator's page/link URLs into an
/// existing canonical URL list, in-scope filtered and deduplicated. The
/// headless component itself is out of scope (§6) — this only consumes the
/// `url`/`links` fields of whatever result it produced.
pub fn merge_headless(existing: &[String], headless: &[HeadlessResult], base_url: &str) -> Vec<String> {
    let opts = NormalizeOptions::default();
    let mut seen: HashSet<String> = existing.iter().cloned().collect();
    let mut out = existing.to_vec();

    for page in headless {
        push_in_scope(&mut out, &mut seen, &page.url, base_url, &opts);
        for link in &page.links {
            push_in_scope(&mut out, &mut seen, link, base_url, &opts);
        }
    }

    out
}

fn push_in_scope(out: &mut Vec<String>, seen: &mut HashSet<String>, raw: &str, base_url: &str, opts: &NormalizeOptions) {
    if !in_scope(raw, base_url, "/") {
        return;
    }
    let canonical = canonicalize(raw, opts);
    if seen.insert(canonical.clone()) {
        out.push(canonical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str) -> ScanResult {
        ScanResult { url: url.to_string(), status: 200, is_spa_route: false }
    }

    #[test]
    fn dedup_preserves_first_seen_order() {
        let results = vec![result("https://t/a"), result("https://t/b"), result("https://t/a")];
        let spa_routes = vec!["https://t/c".to_string(), "https://t/a".to_string()];
        let urls = dedup_urls(&results, &spa_routes, true);
        assert_eq!(urls, vec!["https://t/a", "https://t/b", "https://t/c"]);
    }

    #[test]
    fn dedup_omits_spa_routes_when_disabled() {
        let results = vec![result("https://t/a")];
        let spa_routes = vec!["https://t/c".to_string()];
        let urls = dedup_urls(&results, &spa_routes, false);
        assert_eq!(urls, vec!["https://t/a"]);
    }

    #[test]
    fn merge_headless_filters_out_of_scope_links() {
        let existing = vec!["https://t/a".to_string()];
        let headless = vec![HeadlessResult {
            url: "https://t/b".to_string(),
            links: vec!["https://t/c".to_string(), "https://other.com/x".to_string()],
            api_requests: vec![],
            status: 200,
        }];
        let merged = merge_headless(&existing, &headless, "https://t");
        assert!(merged.contains(&"https://t/b".to_string()));
        assert!(merged.contains(&"https://t/c".to_string()));
        assert!(!merged.iter().any(|u| u.contains("other.com")));
    }

    #[test]
    fn write_urls_file_writes_one_per_line() {
        let path = std::env::temp_dir().join("reconmap-core-output-test.txt");
        write_urls_file(&path, &["https://t/a".to_string(), "https://t/b".to_string()]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://t/a\nhttps://t/b\n");
        std::fs::remove_file(&path).ok();
    }
}
