//! Response classifier (§4.5): decides whether a `(status, hash, path)`
//! triple is a real finding worth reporting.

use reconmap_shared::BaselineInfo;

/// Lowercase, leading-dot extensions treated as static assets.
const STATIC_EXTENSIONS: &[&str] = &[
    ".js", ".css", ".png", ".jpg", ".jpeg", ".gif", ".webp", ".ico", ".json", ".txt", ".xml",
    ".woff", ".woff2", ".ttf", ".eot", ".svg",
];

/// True if `path`'s extension (substring after the last `.`, trimmed at the
/// first `?`, lowercased) is in [`STATIC_EXTENSIONS`].
pub fn has_file_extension(path: &str) -> bool {
    let Some(dot) = path.rfind('.') else {
        return false;
    };
    let mut ext = path[dot..].to_lowercase();
    if let Some(q) = ext.find('?') {
        ext.truncate(q);
    }
    STATIC_EXTENSIONS.contains(&ext.as_str())
}

/// Alias kept for call-site clarity at the fuzzer/crawler boundary.
pub fn is_static_file(path: &str) -> bool {
    has_file_extension(path)
}

/// Decide whether `(status, hash, path)` is a real finding, given the
/// scan's [`BaselineInfo`].
pub fn classify(status: u16, hash: &str, path: &str, baseline: &BaselineInfo) -> bool {
    match status {
        403 => !(!baseline.forbidden_hash.is_empty() && hash == baseline.forbidden_hash),
        401 | 405 | 500 => true,
        301 | 302 => !baseline.is_spa,
        200 => {
            if is_static_file(path) {
                hash != baseline.home_hash && hash != baseline.not_found_hash
            } else if baseline.is_spa {
                hash != baseline.not_found_hash
            } else {
                hash != baseline.home_hash && hash != baseline.not_found_hash
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(is_spa: bool) -> BaselineInfo {
        BaselineInfo {
            not_found_hash: "N".into(),
            home_hash: "H".into(),
            forbidden_hash: "F".into(),
            not_found_length: 0,
            is_spa,
            spa_markers: Default::default(),
        }
    }

    #[test]
    fn has_file_extension_cases_from_spec() {
        assert!(has_file_extension("/foo.JSON"));
        assert!(!has_file_extension("/foo"));
        assert!(!has_file_extension("/foo.php"));
    }

    #[test]
    fn has_file_extension_trims_query() {
        assert!(has_file_extension("/bundle.js?v=2"));
    }

    #[test]
    fn classifier_generic_403_rejected_unique_403_accepted() {
        let b = baseline(false);
        assert!(!classify(403, "F", "/bar", &b));
        assert!(classify(403, "F2", "/baz", &b));
    }

    #[test]
    fn classifier_401_405_500_always_accepted() {
        let b = baseline(false);
        assert!(classify(401, "anything", "/x", &b));
        assert!(classify(405, "anything", "/x", &b));
        assert!(classify(500, "anything", "/x", &b));
    }

    #[test]
    fn classifier_redirects_filtered_on_spa_only() {
        assert!(!classify(301, "x", "/x", &baseline(true)));
        assert!(classify(302, "x", "/x", &baseline(false)));
    }

    #[test]
    fn classifier_200_home_hash_always_rejected() {
        assert!(!classify(200, "H", "/x", &baseline(true)));
        assert!(!classify(200, "H", "/x", &baseline(false)));
    }

    #[test]
    fn classifier_200_distinct_hash_on_static_file_accepted() {
        let b = baseline(false);
        assert!(classify(200, "distinct", "/x.js", &b));
    }

    #[test]
    fn classifier_spa_soft_404_rejected() {
        let b = baseline(true);
        assert!(!classify(200, "N", "/foo", &b));
    }

    #[test]
    fn classifier_other_status_rejected() {
        assert!(!classify(418, "x", "/x", &baseline(false)));
    }
}
