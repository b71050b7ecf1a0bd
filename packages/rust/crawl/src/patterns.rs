//! Link-extraction regexes (§4.7): the five HTML attribute patterns the
//! crawler scrapes instead of running a full HTML parser.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static LINK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"<a[^>]+href=["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"<link[^>]+href=["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"<iframe[^>]+src=["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"<form[^>]+action=["']([^"']+)["']"#).unwrap(),
    ]
});

/// Apply every pattern to `html`, returning capture group 1 matches
/// deduplicated within the page, first-seen order preserved.
pub fn extract_links(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for pattern in LINK_PATTERNS.iter() {
        for caps in pattern.captures_iter(html) {
            let Some(m) = caps.get(1) else { continue };
            let link = m.as_str();
            if !link.is_empty() && seen.insert(link.to_string()) {
                links.push(link.to_string());
            }
        }
    }

    links
}
