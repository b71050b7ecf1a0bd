//! Endpoint extractor (§4.4): mines route/API candidates from the root HTML
//! and same-origin JavaScript, normalizes them, and hands back a
//! deduplicated, order-preserving `spa_routes` list.

mod patterns;
mod pipeline;

use std::collections::HashSet;

use reconmap_normalize::to_absolute;
use reqwest::Client;
use tracing::{debug, trace, warn};
use url::Url;

use patterns::{ENDPOINT_PATTERNS, JS_FILE_PATTERNS};
pub use pipeline::normalize_candidate;

/// Each JS file body is capped at this many bytes on read (§4.4, §5).
const MAX_JS_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Apply every candidate-route regex to `content`, returning raw capture
/// group 1 matches in encounter order (duplicates allowed — deduplication
/// happens after normalization).
fn extract_candidates(content: &str) -> Vec<String> {
    let mut out = Vec::new();
    for pattern in ENDPOINT_PATTERNS.iter() {
        for caps in pattern.captures_iter(content) {
            if let Some(m) = caps.get(1) {
                if !m.as_str().is_empty() {
                    out.push(m.as_str().to_string());
                }
            }
        }
    }
    out
}

/// Find every JS file reference in `html`, resolve to an absolute URL, and
/// keep only those on the same host as `base_url` (or hostless references).
fn find_same_origin_js_files(html: &str, base_url: &str) -> Vec<String> {
    let base_host = Url::parse(base_url).ok().and_then(|u| u.host_str().map(str::to_string));

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for pattern in JS_FILE_PATTERNS.iter() {
        for caps in pattern.captures_iter(html) {
            let Some(m) = caps.get(1) else { continue };
            let raw = m.as_str();

            let absolute = if raw.starts_with("http") {
                raw.to_string()
            } else {
                let with_slash = if raw.starts_with('/') { raw.to_string() } else { format!("/{raw}") };
                format!("{base_url}{with_slash}")
            };

            let Ok(parsed) = Url::parse(&absolute) else { continue };
            let host = parsed.host_str().map(str::to_string);
            if host.is_some() && host != base_host {
                trace!(url = %absolute, "skipping external JS file");
                continue;
            }

            if seen.insert(absolute.clone()) {
                out.push(absolute);
            }
        }
    }

    out
}

/// Fetch the root HTML and every same-origin JS file it references, mine
/// candidate routes from all of them, normalize, and return the
/// deduplicated `spa_routes` list in discovery order.
///
/// Per §4.4 this only runs when the caller has already confirmed
/// `enable_spa && baseline.is_spa`; this function itself is unconditional.
pub async fn extract_endpoints(client: &Client, base_url: &str, user_agent: &str) -> Vec<String> {
    let html = match fetch_text(client, base_url, user_agent).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "failed to fetch root page for extraction");
            return Vec::new();
        }
    };

    let mut raw_candidates = extract_candidates(&html);
    debug!(count = raw_candidates.len(), "candidates from root HTML");

    let js_files = find_same_origin_js_files(&html, base_url);
    debug!(count = js_files.len(), "same-origin JS files found");

    for (i, js_url) in js_files.iter().enumerate() {
        trace!(i, total = js_files.len(), url = %js_url, "fetching JS file");
        match fetch_bounded(client, js_url, user_agent).await {
            Ok(body) => raw_candidates.extend(extract_candidates(&body)),
            Err(e) => warn!(url = %js_url, error = %e, "failed to fetch JS file, skipping"),
        }
    }

    let mut spa_routes = Vec::new();
    let mut seen = HashSet::new();
    for candidate in raw_candidates {
        if let Some(normalized) = normalize_candidate(&candidate, base_url) {
            if seen.insert(normalized.clone()) {
                spa_routes.push(normalized);
            }
        }
    }

    debug!(count = spa_routes.len(), "normalized endpoint candidates");
    spa_routes
}

async fn fetch_text(client: &Client, url: &str, user_agent: &str) -> reqwest::Result<String> {
    let response = client.get(url).header("User-Agent", user_agent).send().await?;
    response.text().await
}

/// Fetch `url`, reading at most [`MAX_JS_BODY_BYTES`] of the body.
async fn fetch_bounded(client: &Client, url: &str, user_agent: &str) -> reqwest::Result<String> {
    let response = client.get(url).header("User-Agent", user_agent).send().await?;
    let body = response.bytes().await?;
    let capped = &body[..body.len().min(MAX_JS_BODY_BYTES)];
    Ok(String::from_utf8_lossy(capped).into_owned())
}

/// Resolve a relative or absolute href to an absolute same-origin URL, or
/// `None` if it can't be resolved. Exposed for callers that need to turn a
/// raw `<script src>` value into a fetchable URL outside this crate's own
/// JS-file discovery.
pub fn resolve(href: &str, base: &str) -> Option<String> {
    to_absolute(href, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn finds_js_files_same_origin_only() {
        let html = r#"
            <script src="/bundle.js"></script>
            <script src="https://cdn.example.com/vendor.js"></script>
            <a href="https://t/app.js">x</a>
        "#;
        let files = find_same_origin_js_files(html, "https://t");
        assert!(files.iter().any(|f| f.ends_with("/bundle.js")));
        assert!(!files.iter().any(|f| f.contains("cdn.example.com")));
    }

    #[test]
    fn extracts_react_router_path() {
        let html = r#"<Route path="/dashboard" component={Dashboard} />"#;
        let candidates = extract_candidates(html);
        assert!(candidates.contains(&"/dashboard".to_string()));
    }

    #[tokio::test]
    async fn extract_endpoints_end_to_end_with_mock_server() {
        let server = MockServer::start().await;

        let html = format!(
            r#"<html><body><div id="root"></div><script src="/app.js"></script></body></html>"#
        );
        let js = r#"fetch("/api/users"); const r = { path: "/admin" };"#;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(&html))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/app.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string(js))
            .mount(&server)
            .await;

        let client = Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap();
        let base = server.uri();
        let routes = extract_endpoints(&client, &base, "test-agent").await;

        assert!(routes.iter().any(|r| r.ends_with("/api/users")));
        assert!(routes.iter().any(|r| r.ends_with("/admin")));
    }
}
