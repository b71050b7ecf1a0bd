//! Baseline fingerprinting (§4.3): three GETs against the base origin that
//! establish the reference hashes the response classifier compares against.

use rand::Rng;
use reconmap_shared::{BaselineInfo, Result, ScanError};
use reqwest::Client;
use tracing::{debug, warn};

/// Fixed User-Agent used when `random_ua` is off. Renamed from the
/// reference implementation's tool name.
pub const FIXED_USER_AGENT: &str = "Mozilla/5.0 (compatible; reconmap/1.0)";

/// Pool of realistic browser User-Agent strings for `random_ua` mode.
pub const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:107.0) Gecko/20100101 Firefox/107.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Safari/605.1.15",
    "Mozilla/5.0 (Linux; Android 10; SM-G950F) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.101 Mobile Safari/537.36",
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
];

/// Pick a User-Agent uniformly at random from [`BROWSER_USER_AGENTS`].
pub fn random_user_agent() -> &'static str {
    let idx = rand::thread_rng().gen_range(0..BROWSER_USER_AGENTS.len());
    BROWSER_USER_AGENTS[idx]
}

/// MD5 over raw response bytes, lowercase hex. Not a security primitive —
/// used only for content-fingerprint comparisons, and specified (rather
/// than a stronger hash) for compatibility with saved baselines.
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

async fn get(client: &Client, url: &str, user_agent: &str) -> reqwest::Result<(u16, Vec<u8>)> {
    let response = client.get(url).header("User-Agent", user_agent).send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    Ok((status, body.to_vec()))
}

fn synthetic_not_found_path() -> String {
    let seconds = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("/nonexistent-{seconds}-{}", random_suffix(8))
}

fn random_suffix(len: usize) -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

/// Run the three baseline probes and build a [`BaselineInfo`].
///
/// Failure to fetch the synthetic-404 or home page is fatal; failure of the
/// forbidden probe is recoverable and leaves `forbidden_hash` empty.
pub async fn fingerprint(client: &Client, base_url: &str, user_agent: &str) -> Result<BaselineInfo> {
    let not_found_url = format!("{base_url}{}", synthetic_not_found_path());
    let (_, not_found_body) = get(client, &not_found_url, user_agent)
        .await
        .map_err(|e| ScanError::Network(e))?;
    let not_found_hash = md5_hex(&not_found_body);
    let not_found_length = not_found_body.len();

    let (_, home_body) = get(client, base_url, user_agent)
        .await
        .map_err(|e| ScanError::Network(e))?;
    let home_hash = md5_hex(&home_body);
    let home_text = String::from_utf8_lossy(&home_body).into_owned();

    let forbidden_url = format!("{base_url}/api/nonexistent-test-{}", random_suffix(8));
    let forbidden_hash = match get(client, &forbidden_url, user_agent).await {
        Ok((_, body)) => md5_hex(&body),
        Err(e) => {
            warn!(error = %e, "forbidden baseline probe failed, continuing without it");
            String::new()
        }
    };

    let is_spa = not_found_hash == home_hash;
    let spa_markers = detect_spa_markers(&home_text);

    if is_spa {
        debug!(?spa_markers, "SPA detected");
    }

    Ok(BaselineInfo {
        not_found_hash,
        home_hash,
        forbidden_hash,
        not_found_length,
        is_spa,
        spa_markers,
    })
}

/// Search `html` for any substring from each framework's marker list; a
/// framework is reported if any one of its patterns matches (§4.3).
fn detect_spa_markers(html: &str) -> std::collections::BTreeSet<String> {
    const CHECKS: &[(&str, &[&str])] = &[
        ("React", &["id=\"root\"", "ReactDOM", "__REACT", "react.production", "react-dom"]),
        ("Vue", &["id=\"app\"", "createApp", "Vue.", "vue.runtime", "_Vue"]),
        ("Angular", &["ng-app", "ng-version", "angular.js", "@angular/core"]),
        ("Svelte", &["svelte-", "__svelte", "svelte.internal"]),
        ("Next.js", &["__NEXT_DATA__", "_next/static", "next.js"]),
        ("Nuxt.js", &["__NUXT__", "_nuxt/", "nuxt.js"]),
        ("Gatsby", &["___gatsby", "gatsby-", ".cache/"]),
        ("Ember", &["ember-application", "Ember.", "ember.js"]),
    ];

    CHECKS
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| html.contains(p)))
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn md5_hex_is_lowercase_and_stable() {
        let a = md5_hex(b"hello world");
        let b = md5_hex(b"hello world");
        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn detect_spa_markers_finds_react() {
        let markers = detect_spa_markers(r#"<div id="root"></div><script>ReactDOM.render()</script>"#);
        assert!(markers.contains("React"));
    }

    #[test]
    fn detect_spa_markers_empty_for_plain_html() {
        let markers = detect_spa_markers("<html><body><h1>Hi</h1></body></html>");
        assert!(markers.is_empty());
    }

    #[tokio::test]
    async fn fingerprint_detects_spa_when_404_matches_home() {
        let server = MockServer::start().await;
        let shell = r#"<html><body><div id="root"></div></body></html>"#;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(shell))
            .mount(&server)
            .await;

        let client = Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap();
        let info = fingerprint(&client, &server.uri(), FIXED_USER_AGENT).await.unwrap();

        assert!(info.is_spa);
        assert_eq!(info.not_found_hash, info.home_hash);
        assert!(info.spa_markers.contains("React"));
    }
}
