//! URL normalization: the four pure operations every other reconmap stage
//! builds on — resolve-relative, canonicalize, origin, and scope-test.
//!
//! Ported from the reference implementation's `normalize.go`; every step
//! below follows that file's order exactly so canonical URLs stay
//! wire-compatible with existing saved baselines.

use url::Url;

/// How `canonicalize` should treat the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryNormalization {
    Sort,
    Remove,
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

/// Resolve `href` against `base` per RFC 3986. Returns `None` if either
/// fails to parse, the resulting scheme isn't `http`/`https`, or `href` is
/// empty.
pub fn to_absolute(href: &str, base: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    let base_url = Url::parse(base).ok()?;
    let resolved = base_url.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    Some(resolved.to_string())
}

/// Canonicalize a URL per the steps in order: drop userinfo, optionally
/// lowercase the host, optionally strip the default port, collapse `//` in
/// the path, optionally strip trailing `index.{html,htm,php}`, normalize
/// the query per `opts.normalize_query`, optionally drop the fragment.
///
/// On parse failure the input is returned unchanged.
pub fn canonicalize(href: &str, opts: &NormalizeOptions) -> String {
    let Ok(mut parsed) = Url::parse(href) else {
        return href.to_string();
    };

    let _ = parsed.set_username("");
    let _ = parsed.set_password(None);

    if opts.lowercase_host {
        if let Some(host) = parsed.host_str() {
            let lowered = host.to_lowercase();
            let _ = parsed.set_host(Some(&lowered));
        }
    }

    if opts.remove_default_port {
        let is_default = match (parsed.scheme(), parsed.port()) {
            ("http", Some(80)) => true,
            ("https", Some(443)) => true,
            _ => false,
        };
        if is_default {
            let _ = parsed.set_port(None);
        }
    }

    let collapsed = collapse_slashes(parsed.path());
    let mut path = if !collapsed.is_empty() && !collapsed.starts_with('/') {
        format!("/{collapsed}")
    } else {
        collapsed
    };

    if opts.strip_index_html {
        for suffix in ["/index.html", "/index.htm", "/index.php"] {
            if let Some(stripped) = path.strip_suffix(suffix) {
                path = format!("{stripped}/");
                break;
            }
        }
    }
    parsed.set_path(&path);

    match opts.normalize_query {
        QueryNormalization::Sort => {
            let sorted = sort_query_params(parsed.query());
            parsed.set_query(sorted.as_deref());
        }
        QueryNormalization::Remove => parsed.set_query(None),
        QueryNormalization::Preserve => {}
    }

    if opts.ignore_hash {
        parsed.set_fragment(None);
    }

    parsed.to_string()
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(ch);
    }
    out
}

/// Sort query parameters by key then value, stably, preserving duplicate
/// keys and every occurrence.
fn sort_query_params(query: Option<&str>) -> Option<String> {
    let query = query?;
    if query.is_empty() {
        return Some(String::new());
    }
    let mut pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let serialized: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Some(serialized)
}

/// `scheme://host[:port]`.
pub fn origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}

/// True iff `href`'s scheme, host, and port match `base`'s, and `href`'s
/// path equals `scope_path` (trailing `/` trimmed) or has it as a
/// `/`-delimited prefix. An empty or `/` `scope_path` accepts any path on
/// the same origin.
pub fn in_scope(href: &str, base: &str, scope_path: &str) -> bool {
    let (Ok(href_url), Ok(base_url)) = (Url::parse(href), Url::parse(base)) else {
        return false;
    };

    if href_url.scheme() != base_url.scheme()
        || href_url.host_str() != base_url.host_str()
        || href_url.port_or_known_default() != base_url.port_or_known_default()
    {
        return false;
    }

    let trimmed_scope = scope_path.trim_end_matches('/');
    if trimmed_scope.is_empty() {
        return true;
    }

    let path = href_url.path();
    path == trimmed_scope || path.starts_with(&format!("{trimmed_scope}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_absolute_resolves_relative() {
        assert_eq!(
            to_absolute("/a/b", "https://example.com/x").as_deref(),
            Some("https://example.com/a/b")
        );
    }

    #[test]
    fn to_absolute_rejects_non_http_scheme() {
        assert_eq!(to_absolute("javascript:void(0)", "https://example.com"), None);
    }

    #[test]
    fn to_absolute_rejects_empty_href() {
        assert_eq!(to_absolute("", "https://example.com"), None);
    }

    #[test]
    fn canonicalize_full_example_from_spec() {
        let out = canonicalize(
            "https://Example.COM:443/a//b/index.html?b=2&a=1#x",
            &NormalizeOptions::default(),
        );
        assert_eq!(out, "https://example.com/a/b/?a=1&b=2");
    }

    #[test]
    fn canonicalize_strips_default_http_port() {
        let out = canonicalize("http://host:80/", &NormalizeOptions::default());
        assert_eq!(out, "http://host/");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let opts = NormalizeOptions::default();
        let once = canonicalize("https://Example.com:443//a/index.htm?z=1&a=2#frag", &opts);
        let twice = canonicalize(&once, &opts);
        assert_eq!(once, twice);
    }

    #[test]
    fn canonicalize_scrambled_query_matches_sorted() {
        let opts = NormalizeOptions::default();
        let a = canonicalize("https://t/p?b=2&a=1", &opts);
        let b = canonicalize("https://t/p?a=1&b=2", &opts);
        assert_eq!(a, b);
    }

    #[test]
    fn canonicalize_returns_input_unchanged_on_parse_failure() {
        let out = canonicalize("not a url", &NormalizeOptions::default());
        assert_eq!(out, "not a url");
    }

    #[test]
    fn origin_formats_scheme_and_host() {
        assert_eq!(
            origin("https://example.com/a/b?c=1").as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn in_scope_exact_and_prefix() {
        assert!(in_scope("https://a.com/admin", "https://a.com", "/admin"));
        assert!(!in_scope("https://a.com/admin-x", "https://a.com", "/admin"));
        assert!(in_scope("https://a.com/admin/settings", "https://a.com", "/admin"));
    }

    #[test]
    fn in_scope_rejects_cross_origin() {
        assert!(!in_scope("https://other.com/a", "https://a.com", "/"));
    }

    #[test]
    fn in_scope_empty_scope_accepts_same_origin() {
        assert!(in_scope("https://a.com/anything/at/all", "https://a.com", "/"));
    }

    #[test]
    fn in_scope_rejects_mismatched_port() {
        assert!(!in_scope("https://a.com:8080/x", "https://a.com", "/"));
        assert!(in_scope("https://a.com:443/x", "https://a.com", "/"));
    }
}
